//! Demo: varios consumidores piden la misma variante transformada en
//! paralelo; el registry programa los nodos una sola vez y el executor local
//! los corre.
use rayon::prelude::*;
use serde_json::json;
use std::error::Error;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use transflow::adapters::{LocalExecutor, TransformActions};
use transflow::config::CONFIG;
use transflow::core::{ComponentIdentifier, DependencyCollector, EventStore, FixedArtifactSet, InMemoryEventStore,
                      NoExtraDependencies, PlanSnapshot, SchedulingRegistry, SourceArtifactSet, TransformChain,
                      TransformStep, TransformedArtifactView, VariantAttributes, WorkPlan};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_new(&CONFIG.logging.filter)?).init();

    let plan = Arc::new(WorkPlan::new());
    let events = Arc::new(InMemoryEventStore::new());
    let registry = Arc::new(SchedulingRegistry::new(plan.clone()).with_event_store(events.clone()));

    let lib = ComponentIdentifier::project(":lib");
    let source =
        SourceArtifactSet::new(FixedArtifactSet::of_files(lib.clone(), ["build/libs/core.jar", "build/libs/util.jar"]));
    let chain = TransformChain::single(TransformStep::new("Extension", json!({"from": "jar", "to": "classes"})))
        .then(TransformStep::new("Digest", json!({"algorithm": "sha256"})));
    let target = VariantAttributes::empty().with("artifactType", "classes").with("minified", false);

    let consumers: Vec<TransformedArtifactView> = (0..8).map(|_| {
                                                            TransformedArtifactView::new(lib.clone(),
                                                                                         source.clone(),
                                                                                         target.clone(),
                                                                                         chain.clone(),
                                                                                         Arc::new(NoExtraDependencies),
                                                                                         registry.clone())
                                                        })
                                                        .collect();
    let visited: Result<Vec<usize>, _> = consumers.par_iter()
                                                  .map(|view| {
                                                      let mut ctx = DependencyCollector::new();
                                                      view.visit_dependencies(&mut ctx).map(|_| ctx.nodes().len())
                                                  })
                                                  .collect();
    let visited = visited?;
    println!("{} consumers saw {} nodes each; registry created {} nodes in {} creation(s)",
             consumers.len(),
             visited.first().copied().unwrap_or(0),
             registry.created_nodes(),
             registry.creations());

    let snapshot = PlanSnapshot::capture(&plan);
    println!("plan snapshot: {}", snapshot.to_json()?);

    let executor = LocalExecutor::new(Arc::new(TransformActions::builtin()), CONFIG.execution.workers)?
        .with_events(events.clone(), registry.build_id());
    let report = executor.run(&plan)?;
    println!("execution report: {}", serde_json::to_string(&report)?);

    if let Some(view) = consumers.first() {
        println!("{view}:");
        for artifact in view.transformed_artifacts()? {
            println!("  {}", artifact.file.display());
        }
    }
    println!("{} events recorded for build {}", events.list(registry.build_id()).len(), registry.build_id());
    Ok(())
}
