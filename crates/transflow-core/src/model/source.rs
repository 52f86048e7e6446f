//! Conjuntos de artifacts fuente.
//!
//! `ArtifactSet` es el colaborador externo (posiblemente perezoso) que sabe
//! enumerar los artifacts de un productor/variante. `SourceArtifactSet` es el
//! handle que usa el core: compara y hashea por identidad del conjunto, nunca
//! por su contenido, de modo que dos conjuntos distintos con los mismos
//! ficheros jamás colapsan en una misma entrada de cache.
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::{ComponentIdentifier, ResolvedArtifact};
use crate::errors::TransformError;

pub trait ArtifactSet: Send + Sync {
    /// Nombre para diagnóstico.
    fn display_name(&self) -> String;

    /// Enumera los artifacts en orden estable. Puede fallar.
    fn artifacts(&self) -> Result<Vec<ResolvedArtifact>, TransformError>;
}

#[derive(Clone)]
pub struct SourceArtifactSet(Arc<dyn ArtifactSet>);

impl SourceArtifactSet {
    pub fn new(set: impl ArtifactSet + 'static) -> Self { Self(Arc::new(set)) }

    pub fn from_arc(set: Arc<dyn ArtifactSet>) -> Self { Self(set) }

    pub fn display_name(&self) -> String { self.0.display_name() }

    pub fn artifacts(&self) -> Result<Vec<ResolvedArtifact>, TransformError> { self.0.artifacts() }

    /// `true` si ambos handles apuntan al mismo conjunto.
    pub fn same_set(&self, other: &SourceArtifactSet) -> bool { self.identity() == other.identity() }

    fn identity(&self) -> *const () { Arc::as_ptr(&self.0) as *const () }
}

impl PartialEq for SourceArtifactSet {
    fn eq(&self, other: &Self) -> bool { self.same_set(other) }
}

impl Eq for SourceArtifactSet {}

impl Hash for SourceArtifactSet {
    fn hash<H: Hasher>(&self, state: &mut H) { self.identity().hash(state) }
}

impl fmt::Debug for SourceArtifactSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SourceArtifactSet").field(&self.display_name()).finish()
    }
}

/// Conjunto en memoria con una lista fija de artifacts.
#[derive(Debug, Clone)]
pub struct FixedArtifactSet {
    name: String,
    artifacts: Vec<ResolvedArtifact>,
}

impl FixedArtifactSet {
    pub fn new(name: impl Into<String>, artifacts: Vec<ResolvedArtifact>) -> Self {
        Self { name: name.into(), artifacts }
    }

    /// Atajo: un artifact por fichero, todos del mismo productor.
    pub fn of_files<I, P>(owner: ComponentIdentifier, files: I) -> Self
        where I: IntoIterator<Item = P>,
              P: Into<std::path::PathBuf>
    {
        let artifacts: Vec<ResolvedArtifact> = files.into_iter().map(|f| ResolvedArtifact::new(owner.clone(), f)).collect();
        Self { name: format!("artifacts of {owner}"), artifacts }
    }
}

impl ArtifactSet for FixedArtifactSet {
    fn display_name(&self) -> String { self.name.clone() }

    fn artifacts(&self) -> Result<Vec<ResolvedArtifact>, TransformError> { Ok(self.artifacts.clone()) }
}
