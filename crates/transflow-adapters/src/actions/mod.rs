//! Acciones de transformación concretas y su registro por tipo.

mod digest;
mod explode;
mod extension;

pub use digest::DigestTransform;
pub use explode::ExplodeTransform;
pub use extension::ExtensionTransform;

use serde_json::Value;
use std::collections::HashMap;
use transflow_core::{ResolvedArtifact, TransformError, TransformExecutor, TransformStep};

/// Implementación de un tipo de step.
pub trait TransformAction: Send + Sync {
    /// Tipo que atiende (coincide con `TransformStep::transform_type`).
    fn transform_type(&self) -> &str;

    fn apply(&self, params: &Value, input: &ResolvedArtifact) -> Result<Vec<ResolvedArtifact>, TransformError>;
}

/// Acciones disponibles, indexadas por tipo.
#[derive(Default)]
pub struct TransformActions {
    actions: HashMap<String, Box<dyn TransformAction>>,
}

impl TransformActions {
    pub fn new() -> Self { Self::default() }

    /// Registro con las acciones incluidas en este crate.
    pub fn builtin() -> Self {
        Self::new().with(ExtensionTransform).with(ExplodeTransform).with(DigestTransform)
    }

    pub fn with(mut self, action: impl TransformAction + 'static) -> Self {
        self.actions.insert(action.transform_type().to_string(), Box::new(action));
        self
    }

    pub fn contains(&self, transform_type: &str) -> bool { self.actions.contains_key(transform_type) }
}

impl TransformExecutor for TransformActions {
    fn transform(&self, step: &TransformStep, input: &ResolvedArtifact) -> Result<Vec<ResolvedArtifact>, TransformError> {
        let action = self.actions
                         .get(step.transform_type())
                         .ok_or_else(|| TransformError::UnknownTransform(step.transform_type().to_string()))?;
        action.apply(step.parameters(), input)
    }
}

/// Lee un parámetro string obligatorio.
pub(crate) fn required_str<'a>(params: &'a Value,
                               name: &str,
                               transform: &str,
                               input: &ResolvedArtifact)
                               -> Result<&'a str, TransformError> {
    params.get(name).and_then(Value::as_str).ok_or_else(|| TransformError::TransformFailed {
        transform: transform.to_string(),
        artifact: input.to_string(),
        reason: format!("missing string parameter '{name}'"),
    })
}
