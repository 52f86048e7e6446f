//! ExplodeTransform: un input -> `parts` outputs (`lib.jar` -> `lib.jar.0`, `lib.jar.1`, ...).

use serde_json::Value;
use transflow_core::{ResolvedArtifact, TransformError};

use super::TransformAction;

pub struct ExplodeTransform;

impl TransformAction for ExplodeTransform {
    fn transform_type(&self) -> &str { "Explode" }

    fn apply(&self, params: &Value, input: &ResolvedArtifact) -> Result<Vec<ResolvedArtifact>, TransformError> {
        let parts = params.get("parts").and_then(Value::as_u64).unwrap_or(1);
        if parts == 0 {
            return Err(TransformError::TransformFailed { transform: self.transform_type().to_string(),
                                                         artifact: input.to_string(),
                                                         reason: "'parts' must be at least 1".to_string() });
        }
        let outputs = (0..parts).map(|i| {
                                    let mut name = input.file.clone().into_os_string();
                                    name.push(format!(".{i}"));
                                    input.derive(name)
                                })
                                .collect();
        Ok(outputs)
    }
}
