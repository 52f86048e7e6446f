//! Constantes del motor de scheduling.
//!
//! `ENGINE_VERSION` forma parte del input del fingerprint de una cadena de
//! transformaciones: un cambio incompatible en cómo se interpretan los steps
//! debe invalidar los fingerprints aunque la cadena no cambie.

/// Versión lógica del motor. Mantener estable mientras no haya cambios
/// incompatibles en la semántica de los steps.
pub const ENGINE_VERSION: &str = "T1.0";

/// Separador usado al mostrar una cadena (`Unzip -> Minify`).
pub const CHAIN_SEPARATOR: &str = " -> ";
