//! Conjunto fuente respaldado por un directorio.
//!
//! La enumeración es perezosa: el directorio se lista cada vez que el core
//! lo pide (en la práctica una sola vez por clave, gracias al registry). Los
//! ficheros se ordenan por nombre para que el orden de los nodos sea estable.

use std::fs;
use std::path::PathBuf;
use transflow_core::{ArtifactSet, ComponentIdentifier, ResolvedArtifact, TransformError};

#[derive(Debug, Clone)]
pub struct DirectoryArtifactSet {
    owner: ComponentIdentifier,
    dir: PathBuf,
    extension: Option<String>,
}

impl DirectoryArtifactSet {
    pub fn new(owner: ComponentIdentifier, dir: impl Into<PathBuf>) -> Self {
        Self { owner, dir: dir.into(), extension: None }
    }

    /// Sólo ficheros con esta extensión.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }
}

impl ArtifactSet for DirectoryArtifactSet {
    fn display_name(&self) -> String { format!("{} files of {}", self.dir.display(), self.owner) }

    fn artifacts(&self) -> Result<Vec<ResolvedArtifact>, TransformError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| TransformError::source_enumeration(self.display_name(), e))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TransformError::source_enumeration(self.display_name(), e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(wanted) = &self.extension {
                if path.extension().map(|ext| ext != wanted.as_str()).unwrap_or(true) {
                    continue;
                }
            }
            files.push(path);
        }
        files.sort();
        Ok(files.into_iter().map(|f| ResolvedArtifact::new(self.owner.clone(), f)).collect())
    }
}
