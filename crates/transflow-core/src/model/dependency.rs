use serde::{Deserialize, Serialize};
use std::fmt;

use crate::node::NodeId;

/// Arista extra que un step declara en el grafo de ejecución
/// (p. ej. la tarea que produce su classpath).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkDependency {
    Task(String),
    Node(NodeId),
}

impl fmt::Display for WorkDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkDependency::Task(path) => write!(f, "task '{path}'"),
            WorkDependency::Node(id) => write!(f, "{id}"),
        }
    }
}
