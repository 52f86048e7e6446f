//! Resolver de dependencias extra de un step (p. ej. su propio classpath).
//!
//! El registry lo invoca una vez por nodo creado, y sólo en la llamada que
//! crea la entrada: no forma parte de la clave de cache. Desde `resolve` no
//! se puede pedir al registry la misma clave que se está creando: esa
//! llamada devuelve `TransformError::ReentrantCreation`.
use crate::errors::TransformError;
use crate::model::{ResolvedArtifact, WorkDependency};
use crate::step::TransformChain;

pub trait ExtraDependenciesResolver: Send + Sync {
    fn resolve(&self, chain: &TransformChain, artifact: &ResolvedArtifact) -> Result<Vec<WorkDependency>, TransformError>;
}

impl<F> ExtraDependenciesResolver for F
    where F: Fn(&TransformChain, &ResolvedArtifact) -> Result<Vec<WorkDependency>, TransformError> + Send + Sync
{
    fn resolve(&self, chain: &TransformChain, artifact: &ResolvedArtifact) -> Result<Vec<WorkDependency>, TransformError> {
        self(chain, artifact)
    }
}

/// Ningún step declara dependencias extra.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExtraDependencies;

impl ExtraDependenciesResolver for NoExtraDependencies {
    fn resolve(&self, _chain: &TransformChain, _artifact: &ResolvedArtifact) -> Result<Vec<WorkDependency>, TransformError> {
        Ok(Vec::new())
    }
}

/// Las mismas dependencias para todos los nodos.
#[derive(Debug, Clone, Default)]
pub struct FixedDependencies(pub Vec<WorkDependency>);

impl ExtraDependenciesResolver for FixedDependencies {
    fn resolve(&self, _chain: &TransformChain, _artifact: &ResolvedArtifact) -> Result<Vec<WorkDependency>, TransformError> {
        Ok(self.0.clone())
    }
}
