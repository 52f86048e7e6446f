//! Tipos de evento del scheduling y estructura `SchedulingEvent`.
//!
//! Los eventos son puramente observacionales: nada en el motor los relee
//! para decidir. Sirven para diagnóstico y para verificar en tests que una
//! clave se programó una sola vez.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TransformError;
use crate::node::NodeId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SchedulingEventKind {
    /// El registry creó y registró los nodos de una clave nueva.
    NodesScheduled {
        source: String,
        chain: String,
        chain_fingerprint: String,
        node_ids: Vec<NodeId>,
    },
    /// Falló la creación de una clave; la clave queda sin cachear.
    SchedulingFailed { source: String, chain: String, error: TransformError },
    NodeStarted { node: NodeId },
    NodeCompleted { node: NodeId, outputs: Vec<String> },
    NodeFailed { node: NodeId, error: TransformError },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingEvent {
    pub seq: u64, // orden de append dentro del store
    pub build_id: Uuid,
    pub kind: SchedulingEventKind,
    pub ts: DateTime<Utc>,
}
