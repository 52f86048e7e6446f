//! transflow-adapters: motor de ejecución de referencia para el core.
//!
//! Este crate provee:
//! - `TransformAction` y acciones concretas (`ExtensionTransform`,
//!   `ExplodeTransform`, `DigestTransform`) agrupadas en `TransformActions`,
//!   que implementa `TransformExecutor`.
//! - `DirectoryArtifactSet`: conjunto fuente perezoso respaldado por un
//!   directorio en disco.
//! - `LocalExecutor`: corre un `WorkPlan` capa por capa sobre un pool rayon.
//!
//! Nota: las acciones sólo derivan nombres/rutas de los outputs; no leen ni
//! escriben contenido. El core no conoce nada de esto, sólo la interfaz
//! `TransformExecutor`.

pub mod actions;
pub mod artifacts;
pub mod executor;

pub use actions::{DigestTransform, ExplodeTransform, ExtensionTransform, TransformAction, TransformActions};
pub use artifacts::DirectoryArtifactSet;
pub use executor::{ExecutionReport, LocalExecutor};
