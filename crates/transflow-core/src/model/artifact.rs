//! Artifact resuelto: un fichero (o directorio) producido por un componente.
//!
//! El core nunca lee ni modifica el contenido: sólo lo enumera y lo entrega
//! al motor de ejecución.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use super::ComponentIdentifier;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedArtifact {
    pub owner: ComponentIdentifier,
    pub name: String,
    pub file: PathBuf,
}

impl ResolvedArtifact {
    /// Crea un artifact cuyo nombre es el último segmento de `file`.
    pub fn new(owner: ComponentIdentifier, file: impl Into<PathBuf>) -> Self {
        let file = file.into();
        let name = file.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        Self { owner, name, file }
    }

    pub fn file(&self) -> &Path { &self.file }

    /// Mismo productor, otro fichero. Usado por los steps para derivar outputs.
    pub fn derive(&self, file: impl Into<PathBuf>) -> Self { Self::new(self.owner.clone(), file) }
}

impl fmt::Display for ResolvedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{} ({})", self.name, self.owner) }
}
