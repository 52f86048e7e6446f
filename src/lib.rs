//! transflow
//!
//! Este crate agrupa el workspace:
//! - Expone `config` con la configuración de la aplicación.
//! - Reexporta `transflow_core` (scheduling y memoización) y
//!   `transflow_adapters` (ejecución local de referencia).
//!
//! Puede usarse desde `main.rs` o por otros crates/clientes.

pub mod config;

pub use transflow_adapters as adapters;
pub use transflow_core as core;
