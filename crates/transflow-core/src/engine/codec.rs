//! Snapshot del plan de trabajo.
//!
//! Captura los nodos programados en orden de registro, sus aristas (como
//! índices dentro del snapshot) y si son requeridos. Las aristas hacia nodos
//! que no están en el plan se descartan. `WorkPlan::restore` reaplica
//! aristas y requeridos sobre un plan que contiene los mismos nodos.
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::graph::WorkPlan;
use crate::errors::TransformError;
use crate::node::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub chain: String,
    pub artifact: String,
    pub successors: Vec<usize>,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanSnapshot {
    pub nodes: Vec<NodeRecord>,
}

impl PlanSnapshot {
    pub fn capture(plan: &WorkPlan) -> Self {
        plan.with_state(|state| {
                let ids = state.node_ids();
                let index: HashMap<NodeId, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
                let nodes = ids.iter()
                               .filter_map(|id| {
                                   let node = state.node(*id)?;
                                   let successors =
                                       state.successors(*id).iter().filter_map(|s| index.get(s).copied()).collect();
                                   Some(NodeRecord { id: *id,
                                                     chain: node.chain().to_string(),
                                                     artifact: node.artifact().to_string(),
                                                     successors,
                                                     required: state.is_required(*id) })
                               })
                               .collect();
                PlanSnapshot { nodes }
            })
    }

    pub fn to_json(&self) -> Result<String, TransformError> {
        serde_json::to_string(self).map_err(|e| TransformError::Internal(format!("snapshot encoding: {e}")))
    }

    pub fn from_json(text: &str) -> Result<Self, TransformError> {
        serde_json::from_str(text).map_err(|e| TransformError::SnapshotMismatch(format!("invalid snapshot: {e}")))
    }
}

impl WorkPlan {
    /// Reaplica un snapshot. Los nodos del plan deben coincidir en id y orden.
    pub fn restore(&self, snapshot: &PlanSnapshot) -> Result<(), TransformError> {
        self.with_state(|state| {
                let ids = state.node_ids();
                if ids.len() != snapshot.nodes.len() {
                    return Err(TransformError::SnapshotMismatch(format!("plan has {} nodes, snapshot has {}",
                                                                        ids.len(),
                                                                        snapshot.nodes.len())));
                }
                if let Some((id, record)) = ids.iter().zip(&snapshot.nodes).find(|(id, record)| **id != record.id) {
                    return Err(TransformError::SnapshotMismatch(format!("expected {}, found {id}", record.id)));
                }
                // validar todo antes de tocar el plan
                let mut restored = Vec::with_capacity(snapshot.nodes.len());
                for record in &snapshot.nodes {
                    let mut successors = IndexSet::new();
                    for index in &record.successors {
                        let target = ids.get(*index).ok_or_else(|| {
                                                        TransformError::SnapshotMismatch(format!("{} references unknown node index {index}",
                                                                                                 record.id))
                                                    })?;
                        successors.insert(*target);
                    }
                    restored.push((record.id, successors, record.required));
                }
                for (id, successors, required) in restored {
                    state.set_successors(id, successors);
                    state.set_required(id, required);
                }
                Ok(())
            })
    }
}
