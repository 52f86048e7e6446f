//! DigestTransform: etiqueta el fichero con un sha256 corto de su ruta y
//! parámetros (`lib.jar` -> `lib-1a2b3c4d.jar`). Determinista.

use serde_json::Value;
use sha2::{Digest, Sha256};
use transflow_core::hashing::to_canonical_json;
use transflow_core::{ResolvedArtifact, TransformError};

use super::TransformAction;

pub struct DigestTransform;

impl TransformAction for DigestTransform {
    fn transform_type(&self) -> &str { "Digest" }

    fn apply(&self, params: &Value, input: &ResolvedArtifact) -> Result<Vec<ResolvedArtifact>, TransformError> {
        let mut hasher = Sha256::new();
        hasher.update(input.file.to_string_lossy().as_bytes());
        hasher.update(to_canonical_json(params).as_bytes());
        let digest = hasher.finalize();
        let short: String = digest.iter().take(4).map(|b| format!("{b:02x}")).collect();

        let stem = input.file.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        let name = match input.file.extension() {
            Some(ext) => format!("{stem}-{short}.{}", ext.to_string_lossy()),
            None => format!("{stem}-{short}"),
        };
        Ok(vec![input.derive(input.file.with_file_name(name))])
    }
}
