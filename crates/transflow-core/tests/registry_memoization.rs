//! Memoización del registry: misma clave -> misma colección, creada una vez.

use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use transflow_core::{ComponentIdentifier, FixedArtifactSet, InMemoryEventStore, EventStore, NoExtraDependencies,
                     ResolvedArtifact, SchedulingEventKind, SchedulingRegistry, SourceArtifactSet, TransformChain,
                     TransformError, TransformStep, WorkDependency, WorkPlan};

fn source(files: &[&str]) -> SourceArtifactSet {
    SourceArtifactSet::new(FixedArtifactSet::of_files(ComponentIdentifier::project(":lib"), files.iter().copied()))
}

fn unzip() -> TransformChain { TransformChain::single(TransformStep::new("Unzip", json!({"level": 1}))) }

#[test]
fn same_key_returns_identical_collection_and_creates_once() {
    let registry = SchedulingRegistry::new(Arc::new(WorkPlan::new()));
    let src = source(&["a.jar", "b.jar", "c.jar"]);

    let first = registry.get_or_create(&src, &unzip(), &NoExtraDependencies).unwrap();
    let second = registry.get_or_create(&src, &unzip(), &NoExtraDependencies).unwrap();

    assert!(first.ptr_eq(&second));
    assert_eq!(first.node_ids(), second.node_ids());
    assert_eq!(registry.created_nodes(), 3);
    assert_eq!(registry.creations(), 1);
}

#[test]
fn distinct_chains_or_sources_get_distinct_collections() {
    let registry = SchedulingRegistry::new(Arc::new(WorkPlan::new()));
    let src = source(&["a.jar"]);
    // mismo contenido, otra instancia: nunca comparte entrada
    let twin = source(&["a.jar"]);
    let minify = TransformChain::single(TransformStep::of_type("Minify"));

    let a = registry.get_or_create(&src, &unzip(), &NoExtraDependencies).unwrap();
    let b = registry.get_or_create(&src, &minify, &NoExtraDependencies).unwrap();
    let c = registry.get_or_create(&twin, &unzip(), &NoExtraDependencies).unwrap();

    assert!(!a.ptr_eq(&b));
    assert!(!a.ptr_eq(&c));
    assert_ne!(a.node_ids(), c.node_ids());
    assert_eq!(registry.cached_keys(), 3);
}

#[test]
fn nodes_follow_source_order() {
    let registry = SchedulingRegistry::new(Arc::new(WorkPlan::new()));
    let nodes = registry.get_or_create(&source(&["a1.jar", "a2.jar", "a3.jar"]), &unzip(), &NoExtraDependencies)
                        .unwrap();
    let names: Vec<&str> = nodes.iter().map(|n| n.artifact().name.as_str()).collect();
    assert_eq!(names, ["a1.jar", "a2.jar", "a3.jar"]);
    assert!(nodes.iter().all(|n| *n.chain() == unzip()));
}

#[test]
fn empty_source_yields_empty_collection() {
    let plan = Arc::new(WorkPlan::new());
    let registry = SchedulingRegistry::new(plan.clone());
    let nodes = registry.get_or_create(&source(&[]), &unzip(), &NoExtraDependencies).unwrap();
    assert!(nodes.is_empty());
    assert!(plan.is_empty());
}

#[test]
fn resolver_runs_once_per_node_and_never_on_hits() {
    let registry = SchedulingRegistry::new(Arc::new(WorkPlan::new()));
    let src = source(&["a.jar", "b.jar"]);
    let calls = AtomicUsize::new(0);
    let resolver = |_: &TransformChain, artifact: &ResolvedArtifact| -> Result<Vec<WorkDependency>, TransformError> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![WorkDependency::Task(format!(":tools:classpath[{}]", artifact.name))])
    };

    let nodes = registry.get_or_create(&src, &unzip(), &resolver).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(nodes.get(1).unwrap().dependencies(),
               &[WorkDependency::Task(":tools:classpath[b.jar]".to_string())]);

    // otro resolver con la misma clave: no se consulta
    let other = |_: &TransformChain, _: &ResolvedArtifact| -> Result<Vec<WorkDependency>, TransformError> {
        panic!("resolver must not run on a cache hit")
    };
    let again = registry.get_or_create(&src, &unzip(), &other).unwrap();
    assert!(again.ptr_eq(&nodes));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn scheduling_is_recorded_once_per_key() {
    let events = Arc::new(InMemoryEventStore::new());
    let registry = SchedulingRegistry::new(Arc::new(WorkPlan::new())).with_event_store(events.clone());
    let src = source(&["a.jar"]);
    for _ in 0..3 {
        registry.get_or_create(&src, &unzip(), &NoExtraDependencies).unwrap();
    }
    let recorded = events.list(registry.build_id());
    assert_eq!(recorded.len(), 1);
    match &recorded[0].kind {
        SchedulingEventKind::NodesScheduled { chain, chain_fingerprint, node_ids, .. } => {
            assert_eq!(chain, "Unzip");
            assert_eq!(chain_fingerprint, &unzip().fingerprint());
            assert_eq!(node_ids.len(), 1);
        }
        other => panic!("unexpected event {other:?}"),
    }
}
