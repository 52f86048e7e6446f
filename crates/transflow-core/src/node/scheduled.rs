use std::fmt;
use std::sync::Arc;

use super::{NodeId, TransformNode};

/// Colección ordenada e inmutable de nodos devuelta por el registry.
///
/// Clonar comparte la misma colección; `ptr_eq` distingue "la misma
/// colección" de "una colección con los mismos nodos".
#[derive(Clone)]
pub struct ScheduledNodes(Arc<[Arc<TransformNode>]>);

impl ScheduledNodes {
    pub(crate) fn new(nodes: Vec<Arc<TransformNode>>) -> Self { Self(Arc::from(nodes)) }

    pub fn empty() -> Self { Self::new(Vec::new()) }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn get(&self, index: usize) -> Option<&Arc<TransformNode>> { self.0.get(index) }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<TransformNode>> { self.0.iter() }

    pub fn as_slice(&self) -> &[Arc<TransformNode>] { &self.0 }

    pub fn node_ids(&self) -> Vec<NodeId> { self.0.iter().map(|n| n.id()).collect() }

    pub fn ptr_eq(&self, other: &ScheduledNodes) -> bool { Arc::ptr_eq(&self.0, &other.0) }

    pub(crate) fn identity(&self) -> *const () { Arc::as_ptr(&self.0) as *const () }
}

impl<'a> IntoIterator for &'a ScheduledNodes {
    type Item = &'a Arc<TransformNode>;
    type IntoIter = std::slice::Iter<'a, Arc<TransformNode>>;

    fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

impl fmt::Debug for ScheduledNodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.debug_list().entries(self.0.iter()).finish() }
}
