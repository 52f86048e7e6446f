//! Motor de scheduling: registry memoizado, vista transformada, grafo de
//! ejecución y protocolo de visita de dependencias.

pub mod codec;
pub mod context;
pub mod graph;
pub mod nagger;
pub mod registry;
pub mod resolver;
pub mod view;

pub use codec::{NodeRecord, PlanSnapshot};
pub use context::{DependencyCollector, DependencyResolveContext, TransformationDependency};
pub use graph::{ExecutionGraph, WorkPlan};
pub use nagger::{StatusNagger, SuppressionToken};
pub use registry::SchedulingRegistry;
pub use resolver::{ExtraDependenciesResolver, FixedDependencies, NoExtraDependencies};
pub use view::TransformedArtifactView;
