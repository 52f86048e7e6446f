//! Steps y cadenas de transformación.
//!
//! - `TransformStep`: descriptor (tipo + parámetros) con igualdad estructural.
//! - `TransformChain`: secuencia ordenada de steps.
//! - `ExecutionState`: ciclo de vida monotónico de un nodo.
//! - `TransformExecutor`: interfaz de ejecución expuesta al motor externo.

pub mod chain;
pub mod definition;
pub mod executor;
mod status;

pub use chain::TransformChain;
pub use definition::TransformStep;
pub use executor::TransformExecutor;
pub use status::ExecutionState;
