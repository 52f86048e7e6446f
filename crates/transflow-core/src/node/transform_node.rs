//! `TransformNode`: "correr la cadena T sobre un artifact del conjunto S".
//!
//! Los campos de identidad (cadena, artifact, dependencias extra) son
//! inmutables desde la creación. Sólo cambian el estado (monotónico) y el
//! resultado, que se fija una única vez.
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::fmt;

use super::NodeId;
use crate::errors::TransformError;
use crate::model::{ResolvedArtifact, WorkDependency};
use crate::step::{ExecutionState, TransformChain, TransformExecutor};

pub struct TransformNode {
    id: NodeId,
    chain: TransformChain,
    artifact: ResolvedArtifact,
    source: String,
    dependencies: Vec<WorkDependency>,
    state: Mutex<ExecutionState>,
    outcome: OnceCell<Result<Vec<ResolvedArtifact>, TransformError>>,
}

impl TransformNode {
    pub(crate) fn new(id: NodeId,
                      chain: TransformChain,
                      artifact: ResolvedArtifact,
                      source: String,
                      dependencies: Vec<WorkDependency>)
                      -> Self {
        Self { id,
               chain,
               artifact,
               source,
               dependencies,
               state: Mutex::new(ExecutionState::Pending),
               outcome: OnceCell::new() }
    }

    pub fn id(&self) -> NodeId { self.id }

    pub fn chain(&self) -> &TransformChain { &self.chain }

    /// Artifact de entrada (antes de transformar).
    pub fn artifact(&self) -> &ResolvedArtifact { &self.artifact }

    /// Nombre del conjunto fuente del que proviene el artifact.
    pub fn source_name(&self) -> &str { &self.source }

    /// Dependencias extra resueltas al crear el nodo.
    pub fn dependencies(&self) -> &[WorkDependency] { &self.dependencies }

    pub fn state(&self) -> ExecutionState { *self.state.lock() }

    pub fn is_complete(&self) -> bool { self.state() == ExecutionState::Completed }

    /// Avanza el estado; falla si la transición no es válida.
    pub fn transition(&self, next: ExecutionState) -> Result<(), TransformError> {
        let mut state = self.state.lock();
        if !state.can_transition_to(next) {
            return Err(TransformError::InvalidStateTransition { node: self.id.0, from: *state, to: next });
        }
        *state = next;
        Ok(())
    }

    /// Corre la cadena completa sobre el artifact del nodo: cada step recibe
    /// los outputs del anterior. El nodo debe estar `Scheduled`.
    pub fn execute(&self, executor: &dyn TransformExecutor) -> Result<&[ResolvedArtifact], TransformError> {
        self.transition(ExecutionState::Running)?;
        let mut guard = RunGuard { node: self, finished: false };
        let result = self.run_chain(executor);
        guard.finished = true;
        let next = if result.is_ok() { ExecutionState::Completed } else { ExecutionState::Failed };
        // sólo este hilo pasó a Running, así que el outcome sigue vacío
        let _ = self.outcome.set(result);
        self.transition(next)?;
        self.output()
    }

    fn run_chain(&self, executor: &dyn TransformExecutor) -> Result<Vec<ResolvedArtifact>, TransformError> {
        let mut current = vec![self.artifact.clone()];
        for step in self.chain.steps() {
            let mut next = Vec::with_capacity(current.len());
            for input in &current {
                next.extend(executor.transform(step, input)?);
            }
            current = next;
        }
        Ok(current)
    }

    /// Outputs transformados. Antes de completar devuelve
    /// `NodeNotYetProduced`; si la ejecución falló, el error registrado.
    pub fn output(&self) -> Result<&[ResolvedArtifact], TransformError> {
        match self.state() {
            ExecutionState::Completed | ExecutionState::Failed => match self.outcome.get() {
                Some(Ok(outputs)) => Ok(outputs),
                Some(Err(err)) => Err(err.clone()),
                None => Err(TransformError::NodeNotYetProduced { node: self.id.0 }),
            },
            _ => Err(TransformError::NodeNotYetProduced { node: self.id.0 }),
        }
    }
}

/// Si el executor hace panic, el nodo termina `Failed` en vez de quedar
/// `Running` para siempre.
struct RunGuard<'a> {
    node: &'a TransformNode,
    finished: bool,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let node = self.node;
        let _ = node.outcome.set(Err(TransformError::TransformFailed { transform: node.chain.to_string(),
                                                                       artifact: node.artifact.to_string(),
                                                                       reason: "executor panicked".to_string() }));
        let _ = node.transition(ExecutionState::Failed);
    }
}

impl fmt::Debug for TransformNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformNode")
         .field("id", &self.id)
         .field("chain", &self.chain.to_string())
         .field("artifact", &self.artifact.name)
         .field("state", &self.state())
         .finish()
    }
}

impl fmt::Display for TransformNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{} over {}", self.chain, self.artifact) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ComponentIdentifier;
    use crate::step::TransformStep;

    struct Suffix;

    impl TransformExecutor for Suffix {
        fn transform(&self, step: &TransformStep, input: &ResolvedArtifact) -> Result<Vec<ResolvedArtifact>, TransformError> {
            if step.transform_type() == "Boom" {
                return Err(TransformError::TransformFailed { transform: "Boom".into(),
                                                             artifact: input.to_string(),
                                                             reason: "boom".into() });
            }
            Ok(vec![input.derive(format!("{}.{}", input.name, step.transform_type()))])
        }
    }

    fn node(chain: TransformChain) -> TransformNode {
        let artifact = ResolvedArtifact::new(ComponentIdentifier::project(":lib"), "lib.jar");
        TransformNode::new(NodeId(7), chain, artifact, "artifacts of project :lib".into(), vec![])
    }

    #[test]
    fn output_before_completion_is_not_produced() {
        let n = node(TransformChain::single(TransformStep::of_type("a")));
        assert_eq!(n.output().unwrap_err(), TransformError::NodeNotYetProduced { node: 7 });
        n.transition(ExecutionState::Scheduled).unwrap();
        assert_eq!(n.output().unwrap_err(), TransformError::NodeNotYetProduced { node: 7 });
    }

    #[test]
    fn execute_runs_steps_in_order() {
        let n = node(TransformChain::single(TransformStep::of_type("a")).then(TransformStep::of_type("b")));
        n.transition(ExecutionState::Scheduled).unwrap();
        let out = n.execute(&Suffix).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "lib.jar.a.b");
        assert_eq!(n.state(), ExecutionState::Completed);
        // no se puede volver a ejecutar
        assert!(matches!(n.execute(&Suffix), Err(TransformError::InvalidStateTransition { .. })));
    }

    #[test]
    fn unscheduled_node_cannot_run() {
        let n = node(TransformChain::single(TransformStep::of_type("a")));
        let err = n.execute(&Suffix).unwrap_err();
        assert_eq!(err,
                   TransformError::InvalidStateTransition { node: 7,
                                                            from: ExecutionState::Pending,
                                                            to: ExecutionState::Running });
    }

    struct Panicking;

    impl TransformExecutor for Panicking {
        fn transform(&self, _step: &TransformStep, _input: &ResolvedArtifact) -> Result<Vec<ResolvedArtifact>, TransformError> {
            panic!("executor blew up")
        }
    }

    #[test]
    fn panicking_executor_leaves_node_failed() {
        let n = node(TransformChain::single(TransformStep::of_type("a")));
        n.transition(ExecutionState::Scheduled).unwrap();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| n.execute(&Panicking).map(|o| o.len())));
        assert!(result.is_err());
        assert_eq!(n.state(), ExecutionState::Failed);
        match n.output() {
            Err(TransformError::TransformFailed { reason, .. }) => assert_eq!(reason, "executor panicked"),
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn failed_node_reports_its_error() {
        let n = node(TransformChain::single(TransformStep::of_type("Boom")));
        n.transition(ExecutionState::Scheduled).unwrap();
        assert!(n.execute(&Suffix).is_err());
        assert_eq!(n.state(), ExecutionState::Failed);
        assert!(matches!(n.output(), Err(TransformError::TransformFailed { .. })));
    }
}
