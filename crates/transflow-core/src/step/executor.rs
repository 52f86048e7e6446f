use super::TransformStep;
use crate::errors::TransformError;
use crate::model::ResolvedArtifact;

/// Interfaz con la que el motor de ejecución (externo) corre un step sobre
/// un artifact. Un step puede producir 0..n outputs.
pub trait TransformExecutor: Send + Sync {
    fn transform(&self, step: &TransformStep, input: &ResolvedArtifact) -> Result<Vec<ResolvedArtifact>, TransformError>;
}
