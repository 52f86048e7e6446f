use serde::{Deserialize, Serialize};

/// Estado de ejecución de un `TransformNode`.
///
/// Las transiciones válidas son:
/// - `Pending` -> `Scheduled` (al registrarse en el grafo)
/// - `Scheduled` -> `Running`
/// - `Running` -> `Completed`
/// - `Running` -> `Failed`
///
/// No se permiten reversiones ni saltos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionState {
    /// Creado pero aún no registrado en el grafo.
    Pending,
    /// Registrado; esperando al motor de ejecución.
    Scheduled,
    Running,
    /// Output disponible.
    Completed,
    Failed,
}

impl ExecutionState {
    pub fn can_transition_to(self, next: ExecutionState) -> bool {
        use ExecutionState::*;
        matches!((self, next),
                 (Pending, Scheduled) | (Scheduled, Running) | (Running, Completed) | (Running, Failed))
    }

    pub fn is_terminal(self) -> bool { matches!(self, ExecutionState::Completed | ExecutionState::Failed) }
}
