//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable (`CONFIG`).
//!
//! Variables reconocidas:
//! - `TRANSFLOW_WORKERS`: hilos del executor local (por defecto, el
//!   paralelismo disponible de la máquina).
//! - `TRANSFLOW_LOG`: filtro de logging (por defecto `info`).
use once_cell::sync::Lazy;
use std::env;
use std::thread;
use thiserror::Error;

pub const WORKERS_VAR: &str = "TRANSFLOW_WORKERS";
pub const LOG_VAR: &str = "TRANSFLOW_LOG";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidWorkers { var: String, value: String },
    #[error("{var} must not be empty")]
    Empty { var: String },
}

/// Configuración global de la aplicación.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub execution: ExecutionConfig,
    pub logging: LoggingConfig,
}

/// Parámetros del executor local.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionConfig {
    /// Número de hilos del pool.
    pub workers: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Directiva de filtro (sintaxis `EnvFilter`).
    pub filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { execution: ExecutionConfig { workers: default_workers() },
               logging: LoggingConfig { filter: DEFAULT_LOG_FILTER.to_string() } }
    }
}

impl AppConfig {
    /// Construye la configuración a partir de una función de búsqueda de
    /// variables. Las variables ausentes toman su valor por defecto.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
        where F: Fn(&str) -> Option<String>
    {
        let workers = match lookup(WORKERS_VAR) {
            None => default_workers(),
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidWorkers { var: WORKERS_VAR.to_string(), value: raw }),
            },
        };
        let filter = match lookup(LOG_VAR) {
            None => DEFAULT_LOG_FILTER.to_string(),
            Some(raw) if raw.trim().is_empty() => return Err(ConfigError::Empty { var: LOG_VAR.to_string() }),
            Some(raw) => raw.trim().to_string(),
        };
        Ok(Self { execution: ExecutionConfig { workers }, logging: LoggingConfig { filter } })
    }

    /// Lee el entorno del proceso (tras cargar `.env` si existe).
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }
}

fn default_workers() -> usize { thread::available_parallelism().map(|n| n.get()).unwrap_or(1) }

/// Instancia global perezosa de configuración, evaluada una sola vez.
/// Si el entorno es inválido se usan los valores por defecto y se avisa.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    AppConfig::from_env().unwrap_or_else(|err| {
                             log::warn!("invalid configuration, using defaults: {err}");
                             AppConfig::default()
                         })
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_variables_use_defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert!(cfg.execution.workers >= 1);
        assert_eq!(cfg.logging.filter, "info");
    }

    #[test]
    fn explicit_values_are_parsed() {
        let cfg = AppConfig::from_lookup(lookup(&[(WORKERS_VAR, " 3 "), (LOG_VAR, "transflow_core=debug")])).unwrap();
        assert_eq!(cfg.execution.workers, 3);
        assert_eq!(cfg.logging.filter, "transflow_core=debug");
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = AppConfig::from_lookup(lookup(&[(WORKERS_VAR, "0")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidWorkers { var: WORKERS_VAR.into(), value: "0".into() });
        assert!(AppConfig::from_lookup(lookup(&[(WORKERS_VAR, "many")])).is_err());
        assert_eq!(AppConfig::from_lookup(lookup(&[(LOG_VAR, "  ")])).unwrap_err(),
                   ConfigError::Empty { var: LOG_VAR.into() });
    }
}
