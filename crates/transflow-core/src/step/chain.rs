//! Cadena de transformaciones: valor puro, no ejecuta nada.
use serde_json::json;
use std::fmt;
use std::sync::Arc;

use super::TransformStep;
use crate::constants::{CHAIN_SEPARATOR, ENGINE_VERSION};
use crate::hashing::hash_value;

/// Secuencia ordenada y no vacía de steps. Dos cadenas son iguales sólo si
/// todos sus steps lo son, en el mismo orden.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransformChain {
    steps: Arc<[TransformStep]>,
}

impl TransformChain {
    pub fn single(step: TransformStep) -> Self { Self { steps: Arc::from(vec![step]) } }

    /// `None` si `steps` está vacío.
    pub fn from_steps(steps: Vec<TransformStep>) -> Option<Self> {
        if steps.is_empty() {
            return None;
        }
        Some(Self { steps: Arc::from(steps) })
    }

    /// Nueva cadena con `step` añadido al final.
    pub fn then(&self, step: TransformStep) -> Self {
        let mut steps = self.steps.to_vec();
        steps.push(step);
        Self { steps: Arc::from(steps) }
    }

    pub fn append(&self, other: &TransformChain) -> Self {
        let steps: Vec<TransformStep> = self.steps.iter().chain(other.steps.iter()).cloned().collect();
        Self { steps: Arc::from(steps) }
    }

    pub fn steps(&self) -> &[TransformStep] { &self.steps }

    pub fn len(&self) -> usize { self.steps.len() }

    /// Siempre `false`; existe por simetría con `len`.
    pub fn is_empty(&self) -> bool { self.steps.is_empty() }

    /// Hash estable de la cadena (incluye `ENGINE_VERSION`). Sólo diagnóstico.
    pub fn fingerprint(&self) -> String {
        let steps: Vec<serde_json::Value> = self.steps
                                                .iter()
                                                .map(|s| json!({ "type": s.transform_type(), "params": s.parameters() }))
                                                .collect();
        hash_value(&json!({ "engine_version": ENGINE_VERSION, "steps": steps }))
    }
}

impl fmt::Display for TransformChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(CHAIN_SEPARATOR)?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unzip() -> TransformStep { TransformStep::new("Unzip", json!({"flatten": true, "level": 2})) }

    #[test]
    fn chains_compare_step_by_step() {
        let a = TransformChain::single(unzip()).then(TransformStep::of_type("Minify"));
        let b = TransformChain::single(TransformStep::new("Unzip", json!({"level": 2, "flatten": true})))
            .then(TransformStep::of_type("Minify"));
        let reversed = TransformChain::single(TransformStep::of_type("Minify")).then(unzip());
        assert_eq!(a, b);
        assert_ne!(a, reversed);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), reversed.fingerprint());
        assert_eq!(a.to_string(), "Unzip -> Minify");
    }

    #[test]
    fn parameters_take_part_in_equality() {
        let a = TransformChain::single(TransformStep::new("Unzip", json!({"level": 1})));
        let b = TransformChain::single(TransformStep::new("Unzip", json!({"level": 2})));
        assert_ne!(a, b);
        assert!(TransformChain::from_steps(vec![]).is_none());
        assert_eq!(a.append(&b).len(), 2);
    }
}
