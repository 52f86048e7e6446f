use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::hashing::to_canonical_json;

/// Descriptor de un step: tipo de transformación + parámetros.
///
/// La igualdad usa la forma canónica de los parámetros, así que el orden de
/// las claves de un objeto JSON no afecta a la identidad del step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformStep {
    transform_type: String,
    parameters: Value,
    #[serde(skip)]
    canonical: String,
}

impl TransformStep {
    pub fn new(transform_type: impl Into<String>, parameters: Value) -> Self {
        let canonical = to_canonical_json(&parameters);
        Self { transform_type: transform_type.into(), parameters, canonical }
    }

    /// Step sin parámetros.
    pub fn of_type(transform_type: impl Into<String>) -> Self { Self::new(transform_type, Value::Null) }

    pub fn transform_type(&self) -> &str { &self.transform_type }

    pub fn parameters(&self) -> &Value { &self.parameters }

    fn canonical_params(&self) -> std::borrow::Cow<'_, str> {
        // tras deserializar `canonical` viene vacío
        if self.canonical.is_empty() {
            std::borrow::Cow::Owned(to_canonical_json(&self.parameters))
        } else {
            std::borrow::Cow::Borrowed(&self.canonical)
        }
    }
}

impl PartialEq for TransformStep {
    fn eq(&self, other: &Self) -> bool {
        self.transform_type == other.transform_type && self.canonical_params() == other.canonical_params()
    }
}

impl Eq for TransformStep {}

impl Hash for TransformStep {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.transform_type.hash(state);
        self.canonical_params().hash(state);
    }
}

impl fmt::Display for TransformStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.transform_type) }
}
