//! ExtensionTransform: cambia la extensión del fichero (`lib.jar` -> `lib.classes`).
//!
//! Parámetros: `{"from": "jar", "to": "classes"}`. Un input cuya extensión no
//! es `from` se deja pasar sin cambios.

use serde_json::Value;
use transflow_core::{ResolvedArtifact, TransformError};

use super::{required_str, TransformAction};

pub struct ExtensionTransform;

impl TransformAction for ExtensionTransform {
    fn transform_type(&self) -> &str { "Extension" }

    fn apply(&self, params: &Value, input: &ResolvedArtifact) -> Result<Vec<ResolvedArtifact>, TransformError> {
        let from = required_str(params, "from", self.transform_type(), input)?;
        let to = required_str(params, "to", self.transform_type(), input)?;
        let matches = input.file.extension().map(|ext| ext == from).unwrap_or(false);
        if !matches {
            return Ok(vec![input.clone()]);
        }
        Ok(vec![input.derive(input.file.with_extension(to))])
    }
}
