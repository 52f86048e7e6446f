//! Atributos de variante.
//!
//! `VariantAttributes` es un mapa inmutable nombre -> valor. Se comparte vía
//! `Arc`, por lo que clonar es barato y nadie puede observar una mutación:
//! `with` devuelve siempre un valor nuevo.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Valor tipado de un atributo.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttributeValue {
    String(String),
    Bool(bool),
    Integer(i64),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => f.write_str(s),
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Integer(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self { AttributeValue::String(value.to_string()) }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self { AttributeValue::String(value) }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self { AttributeValue::Bool(value) }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self { AttributeValue::Integer(value) }
}

/// Descriptor inmutable de una variante (p. ej. `artifactType=jar`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VariantAttributes {
    entries: Arc<BTreeMap<String, AttributeValue>>,
}

impl VariantAttributes {
    pub fn empty() -> Self { Self::default() }

    /// Devuelve una copia con `name` fijado a `value`.
    pub fn with(&self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        let mut entries = (*self.entries).clone();
        entries.insert(name.into(), value.into());
        Self { entries: Arc::new(entries) }
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> { self.entries.get(name) }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for VariantAttributes
    where K: Into<String>,
          V: Into<AttributeValue>
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self { entries: Arc::new(entries) }
    }
}

impl fmt::Display for VariantAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_returns_new_value_and_keeps_original() {
        let base = VariantAttributes::empty().with("usage", "java-api");
        let jar = base.with("artifactType", "jar");
        assert_eq!(base.len(), 1);
        assert_eq!(jar.len(), 2);
        assert_eq!(jar.get("artifactType"), Some(&AttributeValue::from("jar")));
        assert_eq!(base.get("artifactType"), None);
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a = VariantAttributes::empty().with("a", 1i64).with("b", true);
        let b = VariantAttributes::empty().with("b", true).with("a", 1i64);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "{a=1, b=true}");
        assert_eq!(VariantAttributes::empty().to_string(), "{}");
    }
}
