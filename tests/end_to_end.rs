//! Flujo completo desde el crate raíz: directorio en disco -> vistas
//! concurrentes -> plan -> ejecución local -> outputs.

use serde_json::json;
use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;
use transflow::adapters::{DirectoryArtifactSet, LocalExecutor, TransformActions};
use transflow::config::AppConfig;
use transflow::core::{ComponentIdentifier, DependencyCollector, NoExtraDependencies, SchedulingRegistry,
                      SourceArtifactSet, TransformChain, TransformStep, TransformedArtifactView, VariantAttributes,
                      WorkPlan};

#[test]
fn concurrent_consumers_share_one_execution() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["app.jar", "runtime.jar"] {
        fs::write(dir.path().join(name), b"PK").unwrap();
    }

    let plan = Arc::new(WorkPlan::new());
    let registry = Arc::new(SchedulingRegistry::new(plan.clone()));
    let component = ComponentIdentifier::project(":app");
    let source = SourceArtifactSet::new(DirectoryArtifactSet::new(component.clone(), dir.path()).with_extension("jar"));
    let chain = TransformChain::single(TransformStep::new("Extension", json!({"from": "jar", "to": "dex"})));

    let consumers = 6;
    let barrier = Barrier::new(consumers);
    let seen: Vec<usize> = thread::scope(|s| {
        let handles: Vec<_> = (0..consumers).map(|_| {
                                                s.spawn(|| {
                                                     let view = TransformedArtifactView::new(component.clone(),
                                                                                             source.clone(),
                                                                                             VariantAttributes::empty().with("artifactType", "dex"),
                                                                                             chain.clone(),
                                                                                             Arc::new(NoExtraDependencies),
                                                                                             registry.clone());
                                                     barrier.wait();
                                                     let mut ctx = DependencyCollector::new();
                                                     view.visit_dependencies(&mut ctx).unwrap();
                                                     ctx.nodes().len()
                                                 })
                                            })
                                            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(seen.iter().all(|n| *n == 2));
    assert_eq!(registry.creations(), 1);
    assert_eq!(plan.len(), 2);

    let workers = AppConfig::from_lookup(|_| None).unwrap().execution.workers;
    let report = LocalExecutor::new(Arc::new(TransformActions::builtin()), workers).unwrap().run(&plan).unwrap();
    assert!(report.is_success());

    let view = TransformedArtifactView::new(component,
                                            source,
                                            VariantAttributes::empty().with("artifactType", "dex"),
                                            chain,
                                            Arc::new(NoExtraDependencies),
                                            registry);
    let names: Vec<String> = view.transformed_artifacts().unwrap().into_iter().map(|a| a.name).collect();
    assert_eq!(names, ["app.dex", "runtime.dex"]);
}
