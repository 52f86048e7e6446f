//! Avisos por uso del plan fuera de la fase configurable.
//!
//! La supresión es un contador con guard RAII: cada `SuppressionToken`
//! suma uno y lo resta al soltarse, también si la operación protegida hace
//! panic. Varias supresiones solapadas (de distintos hilos) componen sin
//! que una reactive los avisos antes de tiempo.
use log::warn;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

pub struct StatusNagger {
    owner: String,
    suppressed: AtomicUsize,
    nags: AtomicU64,
}

impl StatusNagger {
    pub fn new(owner: impl Into<String>) -> Self {
        Self { owner: owner.into(), suppressed: AtomicUsize::new(0), nags: AtomicU64::new(0) }
    }

    /// Emite un warning si `configurable` es falso y no hay supresión activa.
    /// Devuelve si se emitió.
    pub fn nag_if_not_configurable(&self, configurable: bool, method: &str) -> bool {
        if configurable || self.is_suppressed() {
            return false;
        }
        warn!("Calling {method} after execution of {} has started is deprecated; the change may not be honoured.",
              self.owner);
        self.nags.fetch_add(1, Ordering::Relaxed);
        true
    }

    pub fn suppress(&self) -> SuppressionToken<'_> {
        self.suppressed.fetch_add(1, Ordering::SeqCst);
        SuppressionToken { nagger: self }
    }

    /// Corre `f` sin avisos. El token se libera en cualquier salida.
    pub fn while_disabled<T>(&self, f: impl FnOnce() -> T) -> T {
        let _token = self.suppress();
        f()
    }

    pub fn is_suppressed(&self) -> bool { self.suppressed.load(Ordering::SeqCst) > 0 }

    /// Avisos emitidos hasta ahora.
    pub fn nag_count(&self) -> u64 { self.nags.load(Ordering::Relaxed) }
}

pub struct SuppressionToken<'a> {
    nagger: &'a StatusNagger,
}

impl Drop for SuppressionToken<'_> {
    fn drop(&mut self) { self.nagger.suppressed.fetch_sub(1, Ordering::SeqCst); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn nags_only_outside_configurable_phase() {
        let nagger = StatusNagger::new("plan");
        assert!(!nagger.nag_if_not_configurable(true, "require"));
        assert!(nagger.nag_if_not_configurable(false, "require"));
        assert_eq!(nagger.nag_count(), 1);
    }

    #[test]
    fn suppression_is_scoped_and_nested() {
        let nagger = StatusNagger::new("plan");
        let outer = nagger.suppress();
        let warned = nagger.while_disabled(|| nagger.nag_if_not_configurable(false, "require"));
        assert!(!warned);
        // el token externo sigue activo
        assert!(!nagger.nag_if_not_configurable(false, "require"));
        drop(outer);
        assert!(nagger.nag_if_not_configurable(false, "require"));
    }

    #[test]
    fn token_released_on_panic() {
        let nagger = StatusNagger::new("plan");
        let result = catch_unwind(AssertUnwindSafe(|| nagger.while_disabled(|| panic!("boom"))));
        assert!(result.is_err());
        assert!(!nagger.is_suppressed());
    }
}
