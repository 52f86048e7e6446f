//! Nodos de transformación y colecciones de nodos programados.

mod scheduled;
mod transform_node;

pub use scheduled::ScheduledNodes;
pub use transform_node::TransformNode;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identidad de un nodo dentro de un build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "transform node #{}", self.0) }
}
