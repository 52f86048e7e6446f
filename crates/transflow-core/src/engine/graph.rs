//! Grafo de ejecución.
//!
//! `ExecutionGraph` es la única escritura que el registry hace hacia el
//! grafo del build. `WorkPlan` es la implementación en memoria: guarda los
//! nodos en orden de registro, las aristas de dependencia y si cada nodo es
//! requerido. Mientras el plan es configurable se puede modificar libremente;
//! tras `start_execution` cada modificación sigue aplicándose pero emite un
//! aviso (ver `StatusNagger`).
use indexmap::{IndexMap, IndexSet};
use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::nagger::StatusNagger;
use crate::errors::TransformError;
use crate::model::WorkDependency;
use crate::node::{NodeId, TransformNode};
use crate::step::ExecutionState;

pub trait ExecutionGraph: Send + Sync {
    /// Registra un nodo recién creado. Se llama exactamente una vez por nodo.
    fn register(&self, node: Arc<TransformNode>);
}

#[derive(Default)]
struct PlanState {
    nodes: IndexMap<NodeId, Arc<TransformNode>>,
    successors: HashMap<NodeId, IndexSet<NodeId>>,
    required: HashMap<NodeId, bool>,
}

pub struct WorkPlan {
    state: Mutex<PlanState>,
    executing: AtomicBool,
    nagger: StatusNagger,
}

impl Default for WorkPlan {
    fn default() -> Self { Self::new() }
}

impl WorkPlan {
    pub fn new() -> Self {
        Self { state: Mutex::new(PlanState::default()),
               executing: AtomicBool::new(false),
               nagger: StatusNagger::new("the work plan") }
    }

    pub fn nagger(&self) -> &StatusNagger { &self.nagger }

    pub fn is_configurable(&self) -> bool { !self.executing.load(Ordering::SeqCst) }

    /// Cierra la fase configurable.
    pub fn start_execution(&self) { self.executing.store(true, Ordering::SeqCst); }

    pub fn len(&self) -> usize { self.state.lock().nodes.len() }

    pub fn is_empty(&self) -> bool { self.state.lock().nodes.is_empty() }

    /// Nodos en orden de registro.
    pub fn nodes(&self) -> Vec<Arc<TransformNode>> { self.state.lock().nodes.values().cloned().collect() }

    pub fn node(&self, id: NodeId) -> Option<Arc<TransformNode>> { self.state.lock().nodes.get(&id).cloned() }

    pub fn contains(&self, id: NodeId) -> bool { self.state.lock().nodes.contains_key(&id) }

    /// Nodos de los que `id` depende (deben ejecutarse antes).
    pub fn successors_of(&self, id: NodeId) -> Vec<NodeId> {
        self.state.lock().successors.get(&id).map(|s| s.iter().copied().collect()).unwrap_or_default()
    }

    pub fn add_dependency_successor(&self, node: NodeId, successor: NodeId) {
        self.nagger.nag_if_not_configurable(self.is_configurable(), "add_dependency_successor");
        self.state.lock().successors.entry(node).or_default().insert(successor);
    }

    pub fn require(&self, id: NodeId) {
        self.nagger.nag_if_not_configurable(self.is_configurable(), "require");
        self.state.lock().required.insert(id, true);
    }

    /// Marca el nodo para no ejecutarse (p. ej. sólo alcanzable desde finalizers).
    pub fn must_not_run(&self, id: NodeId) {
        self.nagger.nag_if_not_configurable(self.is_configurable(), "must_not_run");
        self.state.lock().required.insert(id, false);
    }

    /// Los nodos son requeridos salvo que se indique lo contrario.
    pub fn is_required(&self, id: NodeId) -> bool { self.state.lock().required.get(&id).copied().unwrap_or(true) }

    /// Capas topológicas de los nodos requeridos: cada capa sólo depende de
    /// capas anteriores. Las dependencias hacia nodos fuera del plan o no
    /// requeridos se ignoran.
    pub fn execution_layers(&self) -> Result<Vec<Vec<Arc<TransformNode>>>, TransformError> {
        let state = self.state.lock();
        let required: IndexSet<NodeId> = state.nodes
                                              .keys()
                                              .copied()
                                              .filter(|id| state.required.get(id).copied().unwrap_or(true))
                                              .collect();
        // pendientes por nodo y aristas inversas (dependencia -> dependientes)
        let mut pending: HashMap<NodeId, usize> = HashMap::with_capacity(required.len());
        let mut dependents: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for id in &required {
            let deps: Vec<NodeId> = state.successors
                                         .get(id)
                                         .map(|s| s.iter().copied().filter(|dep| required.contains(dep)).collect())
                                         .unwrap_or_default();
            for dep in &deps {
                dependents.entry(*dep).or_default().push(*id);
            }
            pending.insert(*id, deps.len());
        }

        let mut ready: Vec<NodeId> = required.iter().copied().filter(|id| pending[id] == 0).collect();
        let mut placed = 0;
        let mut layers = Vec::new();
        while !ready.is_empty() {
            placed += ready.len();
            let mut next = Vec::new();
            for id in &ready {
                for dependent in dependents.get(id).map(Vec::as_slice).unwrap_or_default() {
                    if let Some(count) = pending.get_mut(dependent) {
                        *count -= 1;
                        if *count == 0 {
                            next.push(*dependent);
                        }
                    }
                }
            }
            // orden de registro dentro de cada capa
            next.sort_by_key(|id| required.get_index_of(id));
            layers.push(ready.iter().filter_map(|id| state.nodes.get(id).cloned()).collect());
            ready = next;
        }
        if placed < required.len() {
            let stuck = required.iter().filter(|id| pending[*id] > 0).map(|id| id.0).collect();
            return Err(TransformError::CyclicDependency(stuck));
        }
        Ok(layers)
    }

    pub(crate) fn with_state<T>(&self, f: impl FnOnce(&mut PlanStateView<'_>) -> T) -> T {
        let mut state = self.state.lock();
        let mut view = PlanStateView { state: &mut *state };
        f(&mut view)
    }
}

/// Acceso interno al estado del plan para el codec de snapshots.
pub(crate) struct PlanStateView<'a> {
    state: &'a mut PlanState,
}

impl PlanStateView<'_> {
    pub(crate) fn node_ids(&self) -> Vec<NodeId> { self.state.nodes.keys().copied().collect() }

    pub(crate) fn node(&self, id: NodeId) -> Option<&Arc<TransformNode>> { self.state.nodes.get(&id) }

    pub(crate) fn successors(&self, id: NodeId) -> Vec<NodeId> {
        self.state.successors.get(&id).map(|s| s.iter().copied().collect()).unwrap_or_default()
    }

    pub(crate) fn is_required(&self, id: NodeId) -> bool { self.state.required.get(&id).copied().unwrap_or(true) }

    pub(crate) fn set_successors(&mut self, id: NodeId, successors: IndexSet<NodeId>) {
        self.state.successors.insert(id, successors);
    }

    pub(crate) fn set_required(&mut self, id: NodeId, required: bool) { self.state.required.insert(id, required); }
}

impl ExecutionGraph for WorkPlan {
    fn register(&self, node: Arc<TransformNode>) {
        self.nagger.nag_if_not_configurable(self.is_configurable(), "register");
        let id = node.id();
        let mut state = self.state.lock();
        if state.nodes.contains_key(&id) {
            return;
        }
        // Pending -> Scheduled: sólo puede fallar si alguien ya registró el nodo en otro grafo
        if let Err(err) = node.transition(ExecutionState::Scheduled) {
            debug!("{id} was already scheduled elsewhere: {err}");
        }
        let edges: IndexSet<NodeId> = node.dependencies()
                                          .iter()
                                          .filter_map(|dep| match dep {
                                              WorkDependency::Node(other) => Some(*other),
                                              WorkDependency::Task(_) => None,
                                          })
                                          .collect();
        if !edges.is_empty() {
            state.successors.entry(id).or_default().extend(edges);
        }
        state.nodes.insert(id, node);
    }
}
