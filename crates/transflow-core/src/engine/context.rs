//! Protocolo de visita de dependencias.
//!
//! Una vista añade a lo sumo un `TransformationDependency` por contexto: la
//! dependencia compara por identidad de la colección de nodos y la vista
//! consulta `contains` antes de `add`, así que visitar dos veces no duplica
//! entradas aunque el contexto no sea un conjunto.
use indexmap::IndexSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::node::{ScheduledNodes, TransformNode};

pub trait DependencyResolveContext {
    /// `true` si una dependencia igual (misma colección) ya fue añadida.
    fn contains(&self, dependency: &TransformationDependency) -> bool;

    /// Sólo se llama con dependencias que `contains` no reconoce.
    fn add(&mut self, dependency: TransformationDependency);
}

/// Una única dependencia de grafo que envuelve toda una colección de nodos.
#[derive(Clone)]
pub struct TransformationDependency {
    nodes: ScheduledNodes,
}

impl TransformationDependency {
    pub fn new(nodes: ScheduledNodes) -> Self { Self { nodes } }

    pub fn nodes(&self) -> &ScheduledNodes { &self.nodes }
}

impl PartialEq for TransformationDependency {
    fn eq(&self, other: &Self) -> bool { self.nodes.ptr_eq(&other.nodes) }
}

impl Eq for TransformationDependency {}

impl Hash for TransformationDependency {
    fn hash<H: Hasher>(&self, state: &mut H) { self.nodes.identity().hash(state) }
}

impl fmt::Debug for TransformationDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformationDependency").field("nodes", &self.nodes.node_ids()).finish()
    }
}

/// Contexto que recolecta dependencias en orden de llegada, sin duplicados.
#[derive(Debug, Default)]
pub struct DependencyCollector {
    dependencies: IndexSet<TransformationDependency>,
}

impl DependencyCollector {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.dependencies.len() }

    pub fn is_empty(&self) -> bool { self.dependencies.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &TransformationDependency> { self.dependencies.iter() }

    /// Todos los nodos de todas las dependencias, en orden.
    pub fn nodes(&self) -> Vec<Arc<TransformNode>> {
        self.dependencies.iter().flat_map(|d| d.nodes().iter().cloned()).collect()
    }
}

impl DependencyResolveContext for DependencyCollector {
    fn contains(&self, dependency: &TransformationDependency) -> bool { self.dependencies.contains(dependency) }

    fn add(&mut self, dependency: TransformationDependency) {
        self.dependencies.insert(dependency);
    }
}
