//! Errores del motor de scheduling.
//!
//! Todos los errores son `Clone`: un fallo de creación se entrega tanto al
//! caller que la disparó como a todos los que esperaban la misma clave.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::step::ExecutionState;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum TransformError {
    #[error("could not enumerate artifacts of {source_set}: {reason}")]
    SourceEnumeration { source_set: String, reason: String },
    #[error("could not resolve extra dependencies for {artifact}: {reason}")]
    ExtraDependencyResolution { artifact: String, reason: String },
    #[error("transform node {node} has not produced its output yet")]
    NodeNotYetProduced { node: u64 },
    #[error("transform node {node} cannot move from {from:?} to {to:?}")]
    InvalidStateTransition { node: u64, from: ExecutionState, to: ExecutionState },
    #[error("transform '{transform}' failed on {artifact}: {reason}")]
    TransformFailed { transform: String, artifact: String, reason: String },
    #[error("unknown transform type '{0}'")]
    UnknownTransform(String),
    #[error("dependency cycle between transform nodes {0:?}")]
    CyclicDependency(Vec<u64>),
    #[error("work plan snapshot does not match the scheduled nodes: {0}")]
    SnapshotMismatch(String),
    #[error("scheduling of {chain} for {source_set} was abandoned before completion")]
    CreationAbandoned { source_set: String, chain: String },
    #[error("scheduling of {chain} for {source_set} was requested again while it was being created")]
    ReentrantCreation { source_set: String, chain: String },
    #[error("could not resolve {variant} via {chain}: {cause}")]
    Resolution { variant: String, chain: String, cause: Box<TransformError> },
    #[error("internal: {0}")]
    Internal(String),
}

impl TransformError {
    /// Atajo para implementaciones de `ArtifactSet` que no pueden enumerar.
    pub fn source_enumeration(source_set: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceEnumeration { source_set: source_set.into(), reason: reason.to_string() }
    }

    /// Atajo para resolvers de dependencias extra.
    pub fn extra_dependency(artifact: impl ToString, reason: impl ToString) -> Self {
        Self::ExtraDependencyResolution { artifact: artifact.to_string(), reason: reason.to_string() }
    }

    /// Error original, descartando el contexto de resolución añadido por la vista.
    pub fn root_cause(&self) -> &TransformError {
        match self {
            Self::Resolution { cause, .. } => cause.root_cause(),
            other => other,
        }
    }
}
