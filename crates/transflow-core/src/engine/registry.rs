//! Registry de scheduling: memoiza `(conjunto fuente, cadena)` -> nodos.
//!
//! Cada clave pasa por dos estados dentro del mapa:
//! - `Pending(flight)`: un hilo (el líder) está creando los nodos. Los demás
//!   callers de esa misma clave esperan sobre el `Flight`, nunca sobre el mapa.
//! - `Ready(nodes)`: colección definitiva; las lecturas sólo toman el lock de
//!   lectura del shard.
//!
//! Si la creación falla (o el líder hace panic) la clave se elimina del mapa
//! y todos los que esperaban reciben el mismo error; una llamada posterior
//! vuelve a intentar. Claves distintas nunca se serializan entre sí salvo por
//! el lock corto del shard al insertar.
//!
//! Un resolver o un `ArtifactSet` que vuelve a pedir su propia clave desde el
//! hilo líder recibe `ReentrantCreation` en lugar de esperarse a sí mismo.
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::{debug, warn};
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use uuid::Uuid;

use super::graph::ExecutionGraph;
use super::resolver::ExtraDependenciesResolver;
use crate::errors::TransformError;
use crate::event::{EventStore, SchedulingEventKind};
use crate::model::SourceArtifactSet;
use crate::node::{NodeId, ScheduledNodes, TransformNode};
use crate::step::TransformChain;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    source: SourceArtifactSet,
    chain: TransformChain,
}

enum Slot {
    Ready(ScheduledNodes),
    Pending(Arc<Flight>),
}

/// Creación en curso de una clave. Se completa exactamente una vez.
struct Flight {
    leader: ThreadId,
    outcome: Mutex<Option<Result<ScheduledNodes, TransformError>>>,
    done: Condvar,
    waiters: AtomicUsize,
}

impl Flight {
    fn new() -> Self {
        Self { leader: thread::current().id(),
               outcome: Mutex::new(None),
               done: Condvar::new(),
               waiters: AtomicUsize::new(0) }
    }

    fn complete(&self, outcome: Result<ScheduledNodes, TransformError>) {
        let mut slot = self.outcome.lock();
        if slot.is_none() {
            *slot = Some(outcome);
        }
        self.done.notify_all();
    }

    fn wait(&self) -> Result<ScheduledNodes, TransformError> {
        let mut slot = self.outcome.lock();
        self.waiters.fetch_add(1, Ordering::SeqCst);
        let outcome = loop {
            if let Some(outcome) = slot.as_ref() {
                break outcome.clone();
            }
            self.done.wait(&mut slot);
        };
        self.waiters.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}

enum Claim {
    Leader(Arc<Flight>),
    Follower(Arc<Flight>),
}

pub struct SchedulingRegistry {
    build_id: Uuid,
    graph: Arc<dyn ExecutionGraph>,
    cache: DashMap<CacheKey, Slot>,
    next_node_id: AtomicU64,
    created_nodes: AtomicU64,
    creations: AtomicU64,
    events: Option<Arc<dyn EventStore>>,
}

impl SchedulingRegistry {
    pub fn new(graph: Arc<dyn ExecutionGraph>) -> Self {
        Self { build_id: Uuid::new_v4(),
               graph,
               cache: DashMap::new(),
               next_node_id: AtomicU64::new(1),
               created_nodes: AtomicU64::new(0),
               creations: AtomicU64::new(0),
               events: None }
    }

    pub fn with_event_store(mut self, events: Arc<dyn EventStore>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn build_id(&self) -> Uuid { self.build_id }

    /// Nodos construidos desde que existe el registry.
    pub fn created_nodes(&self) -> u64 { self.created_nodes.load(Ordering::SeqCst) }

    /// Intentos de creación iniciados (exitosos o no).
    pub fn creations(&self) -> u64 { self.creations.load(Ordering::SeqCst) }

    /// Claves con una colección ya creada.
    pub fn cached_keys(&self) -> usize { self.cache.iter().filter(|e| matches!(e.value(), Slot::Ready(_))).count() }

    /// Callers bloqueados esperando una creación en curso.
    pub fn waiting_callers(&self) -> usize {
        self.cache
            .iter()
            .map(|e| match e.value() {
                Slot::Pending(flight) => flight.waiters.load(Ordering::SeqCst),
                Slot::Ready(_) => 0,
            })
            .sum()
    }

    /// Devuelve la colección de nodos para `(source, chain)`, creándola y
    /// registrándola en el grafo si es la primera vez.
    ///
    /// `resolver` sólo se consulta en la llamada que crea la entrada.
    pub fn get_or_create(&self,
                         source: &SourceArtifactSet,
                         chain: &TransformChain,
                         resolver: &dyn ExtraDependenciesResolver)
                         -> Result<ScheduledNodes, TransformError> {
        let key = CacheKey { source: source.clone(), chain: chain.clone() };

        if let Some(slot) = self.cache.get(&key) {
            let flight = match slot.value() {
                Slot::Ready(nodes) => {
                    debug!("reusing {} scheduled nodes for {chain} over {}", nodes.len(), source.display_name());
                    return Ok(nodes.clone());
                }
                Slot::Pending(flight) => flight.clone(),
            };
            // soltar el shard antes de bloquear
            drop(slot);
            return Self::follow(&key, &flight);
        }

        let claim = match self.cache.entry(key.clone()) {
            Entry::Occupied(slot) => match slot.get() {
                Slot::Ready(nodes) => return Ok(nodes.clone()),
                Slot::Pending(flight) => Claim::Follower(flight.clone()),
            },
            Entry::Vacant(vacant) => {
                let flight = Arc::new(Flight::new());
                vacant.insert(Slot::Pending(flight.clone()));
                Claim::Leader(flight)
            }
        };

        match claim {
            Claim::Follower(flight) => Self::follow(&key, &flight),
            Claim::Leader(flight) => {
                let guard = FlightGuard { registry: self, key: &key, flight: &flight, finished: false };
                let outcome = self.create(source, chain, resolver);
                guard.finish(outcome)
            }
        }
    }

    fn follow(key: &CacheKey, flight: &Flight) -> Result<ScheduledNodes, TransformError> {
        if flight.leader == thread::current().id() {
            warn!("re-entrant scheduling of {} for {}", key.chain, key.source.display_name());
            return Err(TransformError::ReentrantCreation { source_set: key.source.display_name(),
                                                           chain: key.chain.to_string() });
        }
        flight.wait()
    }

    fn create(&self,
              source: &SourceArtifactSet,
              chain: &TransformChain,
              resolver: &dyn ExtraDependenciesResolver)
              -> Result<ScheduledNodes, TransformError> {
        self.creations.fetch_add(1, Ordering::SeqCst);
        let source_name = source.display_name();
        let artifacts = source.artifacts()?;

        let mut nodes = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            let dependencies = resolver.resolve(chain, &artifact)?;
            let id = NodeId(self.next_node_id.fetch_add(1, Ordering::SeqCst));
            nodes.push(Arc::new(TransformNode::new(id, chain.clone(), artifact, source_name.clone(), dependencies)));
            self.created_nodes.fetch_add(1, Ordering::SeqCst);
        }

        // registrar sólo cuando todos los nodos existen: nada parcial llega al grafo
        for node in &nodes {
            self.graph.register(node.clone());
        }
        let nodes = ScheduledNodes::new(nodes);
        debug!("scheduled {} nodes for {chain} over {source_name}", nodes.len());
        self.record(SchedulingEventKind::NodesScheduled { source: source_name,
                                                          chain: chain.to_string(),
                                                          chain_fingerprint: chain.fingerprint(),
                                                          node_ids: nodes.node_ids() });
        Ok(nodes)
    }

    fn record(&self, kind: SchedulingEventKind) {
        if let Some(events) = &self.events {
            events.append_kind(self.build_id, kind);
        }
    }
}

/// Garantiza que un `Flight` siempre se complete y que una clave fallida no
/// quede en el mapa, incluso si la creación hace panic.
struct FlightGuard<'a> {
    registry: &'a SchedulingRegistry,
    key: &'a CacheKey,
    flight: &'a Arc<Flight>,
    finished: bool,
}

impl FlightGuard<'_> {
    fn finish(mut self, outcome: Result<ScheduledNodes, TransformError>) -> Result<ScheduledNodes, TransformError> {
        self.finished = true;
        match &outcome {
            Ok(nodes) => {
                // Ready antes de despertar a los que esperan
                self.registry.cache.insert(self.key.clone(), Slot::Ready(nodes.clone()));
            }
            Err(err) => {
                warn!("scheduling {} for {} failed: {err}", self.key.chain, self.key.source.display_name());
                self.registry.cache.remove(self.key);
                self.registry.record(SchedulingEventKind::SchedulingFailed { source: self.key.source.display_name(),
                                                                             chain: self.key.chain.to_string(),
                                                                             error: err.clone() });
            }
        }
        self.flight.complete(outcome.clone());
        outcome
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let source_set = self.key.source.display_name();
        let chain = self.key.chain.to_string();
        warn!("scheduling {chain} for {source_set} was abandoned");
        self.registry.cache.remove(self.key);
        self.flight.complete(Err(TransformError::CreationAbandoned { source_set, chain }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::graph::WorkPlan;
    use crate::engine::resolver::NoExtraDependencies;
    use crate::model::{ArtifactSet, ComponentIdentifier, FixedArtifactSet, ResolvedArtifact, WorkDependency};
    use crate::step::TransformStep;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    struct Exploding;

    impl ArtifactSet for Exploding {
        fn display_name(&self) -> String { "exploding".into() }

        fn artifacts(&self) -> Result<Vec<ResolvedArtifact>, TransformError> { panic!("enumeration blew up") }
    }

    #[test]
    fn panicking_creation_leaves_no_entry() {
        let registry = SchedulingRegistry::new(Arc::new(WorkPlan::new()));
        let chain = TransformChain::single(TransformStep::of_type("Unzip"));
        let source = SourceArtifactSet::new(Exploding);
        let result = catch_unwind(AssertUnwindSafe(|| registry.get_or_create(&source, &chain, &NoExtraDependencies)));
        assert!(result.is_err());
        assert_eq!(registry.cached_keys(), 0);
        assert!(registry.cache.is_empty());
    }

    #[test]
    fn reentrant_request_for_the_same_key_fails_instead_of_blocking() {
        let registry = SchedulingRegistry::new(Arc::new(WorkPlan::new()));
        let owner = ComponentIdentifier::project(":lib");
        let source = SourceArtifactSet::new(FixedArtifactSet::of_files(owner, ["a.jar"]));
        let chain = TransformChain::single(TransformStep::of_type("Unzip"));
        let inner = Mutex::new(None);
        let reentrant = |c: &TransformChain, _: &ResolvedArtifact| -> Result<Vec<WorkDependency>, TransformError> {
            *inner.lock() = Some(registry.get_or_create(&source, c, &NoExtraDependencies));
            Ok(Vec::new())
        };

        let nodes = registry.get_or_create(&source, &chain, &reentrant).unwrap();
        assert_eq!(nodes.len(), 1);
        match inner.lock().take() {
            Some(Err(TransformError::ReentrantCreation { chain: c, .. })) => assert_eq!(c, "Unzip"),
            other => panic!("unexpected inner result: {other:?}"),
        }
        assert_eq!(registry.cached_keys(), 1);
    }

    #[test]
    fn node_ids_are_unique_across_keys() {
        let registry = SchedulingRegistry::new(Arc::new(WorkPlan::new()));
        let owner = ComponentIdentifier::project(":lib");
        let source = SourceArtifactSet::new(FixedArtifactSet::of_files(owner, ["a.jar", "b.jar"]));
        let unzip = TransformChain::single(TransformStep::of_type("Unzip"));
        let minify = TransformChain::single(TransformStep::of_type("Minify"));
        let a = registry.get_or_create(&source, &unzip, &NoExtraDependencies).unwrap();
        let b = registry.get_or_create(&source, &minify, &NoExtraDependencies).unwrap();
        let mut ids = a.node_ids();
        ids.extend(b.node_ids());
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
        assert_eq!(registry.cached_keys(), 2);
    }
}
