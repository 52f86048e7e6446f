//! transflow-core: scheduling y memoización de transformaciones de variantes.
//!
//! Dado un conjunto de artifacts de un productor y una cadena de
//! transformaciones ya resuelta, el core programa un `TransformNode` por
//! artifact en el grafo de ejecución del build y garantiza que cada par
//! `(conjunto fuente, cadena)` se programe a lo sumo una vez por build, aun
//! con consumidores concurrentes. La ejecución real la hace un motor externo
//! a través de `TransformExecutor`.
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod model;
pub mod node;
pub mod step;

pub use engine::{DependencyCollector, DependencyResolveContext, ExecutionGraph, ExtraDependenciesResolver,
                 NoExtraDependencies, PlanSnapshot, SchedulingRegistry, TransformationDependency,
                 TransformedArtifactView, WorkPlan};
pub use errors::TransformError;
pub use event::{EventStore, InMemoryEventStore, SchedulingEvent, SchedulingEventKind};
pub use model::{ArtifactSet, AttributeValue, ComponentIdentifier, FixedArtifactSet, ResolvedArtifact,
                SourceArtifactSet, VariantAttributes, WorkDependency};
pub use node::{NodeId, ScheduledNodes, TransformNode};
pub use step::{ExecutionState, TransformChain, TransformExecutor, TransformStep};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn jar_source(files: &[&str]) -> SourceArtifactSet {
        SourceArtifactSet::new(FixedArtifactSet::of_files(ComponentIdentifier::project(":lib"), files.iter().copied()))
    }

    fn view(registry: &Arc<SchedulingRegistry>, source: &SourceArtifactSet, chain: &TransformChain) -> TransformedArtifactView {
        TransformedArtifactView::new(ComponentIdentifier::project(":lib"),
                                     source.clone(),
                                     VariantAttributes::empty().with("artifactType", "classes"),
                                     chain.clone(),
                                     Arc::new(NoExtraDependencies),
                                     registry.clone())
    }

    #[test]
    fn two_views_over_same_key_share_nodes_and_plan_entries() {
        let plan = Arc::new(WorkPlan::new());
        let registry = Arc::new(SchedulingRegistry::new(plan.clone()));
        let source = jar_source(&["a.jar", "b.jar"]);
        let chain = TransformChain::single(TransformStep::new("Unzip", json!({"flatten": false})));

        let first = view(&registry, &source, &chain);
        let second = view(&registry, &source, &chain);
        let mut ctx = DependencyCollector::new();
        first.visit_dependencies(&mut ctx).unwrap();
        second.visit_dependencies(&mut ctx).unwrap();

        assert_eq!(ctx.len(), 1, "same collection must collapse into one dependency");
        assert_eq!(plan.len(), 2, "each node registered exactly once");
        assert!(first.scheduled_nodes().unwrap().ptr_eq(&second.scheduled_nodes().unwrap()));
        assert!(plan.nodes().iter().all(|n| n.state() == ExecutionState::Scheduled));
    }

    #[test]
    fn view_display_names() {
        let registry = Arc::new(SchedulingRegistry::new(Arc::new(WorkPlan::new())));
        let v = view(&registry, &jar_source(&[]), &TransformChain::single(TransformStep::of_type("Unzip")));
        assert_eq!(v.target_variant_display_name(), "project :lib {artifactType=classes}");
        assert_eq!(v.to_string(), "Project :lib {artifactType=classes}");
    }

    #[test]
    fn resolution_errors_name_variant_and_chain() {
        struct Broken;
        impl ArtifactSet for Broken {
            fn display_name(&self) -> String { "broken".into() }
            fn artifacts(&self) -> Result<Vec<ResolvedArtifact>, TransformError> {
                Err(TransformError::source_enumeration("broken", "disk on fire"))
            }
        }
        let registry = Arc::new(SchedulingRegistry::new(Arc::new(WorkPlan::new())));
        let v = view(&registry, &SourceArtifactSet::new(Broken), &TransformChain::single(TransformStep::of_type("Unzip")));
        let err = v.scheduled_nodes().unwrap_err();
        assert!(err.to_string().starts_with("could not resolve project :lib {artifactType=classes} via Unzip"));
        assert!(matches!(err.root_cause(), TransformError::SourceEnumeration { .. }));
    }
}
