//! LocalExecutor: corre un `WorkPlan` en el proceso.
//!
//! - Cierra la fase configurable del plan (`start_execution`).
//! - Ejecuta las capas de `execution_layers` en orden; los nodos de una capa
//!   corren en paralelo sobre un pool rayon de `workers` hilos.
//! - Un nodo cuyo predecesor falló (o fue saltado) no se ejecuta: queda en
//!   `skipped` y en estado `Scheduled`.

use log::{debug, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use transflow_core::{EventStore, NodeId, SchedulingEventKind, TransformError, TransformExecutor, TransformNode,
                     WorkPlan};
use uuid::Uuid;

/// Resultado agregado de correr un plan.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ExecutionReport {
    pub completed: Vec<NodeId>,
    pub failed: Vec<(NodeId, TransformError)>,
    pub skipped: Vec<NodeId>,
}

impl ExecutionReport {
    pub fn is_success(&self) -> bool { self.failed.is_empty() && self.skipped.is_empty() }
}

pub struct LocalExecutor {
    executor: Arc<dyn TransformExecutor>,
    pool: ThreadPool,
    events: Option<(Arc<dyn EventStore>, Uuid)>,
}

impl LocalExecutor {
    pub fn new(executor: Arc<dyn TransformExecutor>, workers: usize) -> Result<Self, TransformError> {
        let pool = ThreadPoolBuilder::new().num_threads(workers.max(1))
                                           .thread_name(|i| format!("transflow-worker-{i}"))
                                           .build()
                                           .map_err(|e| TransformError::Internal(format!("worker pool: {e}")))?;
        Ok(Self { executor, pool, events: None })
    }

    /// Registra eventos de nodo en `store` bajo `build_id`.
    pub fn with_events(mut self, store: Arc<dyn EventStore>, build_id: Uuid) -> Self {
        self.events = Some((store, build_id));
        self
    }

    pub fn workers(&self) -> usize { self.pool.current_num_threads() }

    pub fn run(&self, plan: &WorkPlan) -> Result<ExecutionReport, TransformError> {
        plan.start_execution();
        let layers = plan.execution_layers()?;
        let mut report = ExecutionReport::default();
        let mut broken: HashSet<NodeId> = HashSet::new();

        for layer in layers {
            let (runnable, blocked): (Vec<Arc<TransformNode>>, Vec<Arc<TransformNode>>) =
                layer.into_iter()
                     .partition(|node| !plan.successors_of(node.id()).iter().any(|dep| broken.contains(dep)));
            for node in blocked {
                debug!("skipping {} because a dependency did not complete", node.id());
                broken.insert(node.id());
                report.skipped.push(node.id());
            }

            let outcomes: Vec<(NodeId, Result<(), TransformError>)> =
                self.pool.install(|| runnable.par_iter().map(|node| (node.id(), self.run_node(node))).collect());
            for (id, outcome) in outcomes {
                match outcome {
                    Ok(()) => report.completed.push(id),
                    Err(err) => {
                        broken.insert(id);
                        report.failed.push((id, err));
                    }
                }
            }
        }
        Ok(report)
    }

    fn run_node(&self, node: &TransformNode) -> Result<(), TransformError> {
        self.record(SchedulingEventKind::NodeStarted { node: node.id() });
        match node.execute(self.executor.as_ref()) {
            Ok(outputs) => {
                let outputs = outputs.iter().map(|a| a.name.clone()).collect();
                self.record(SchedulingEventKind::NodeCompleted { node: node.id(), outputs });
                Ok(())
            }
            Err(err) => {
                warn!("{node} failed: {err}");
                self.record(SchedulingEventKind::NodeFailed { node: node.id(), error: err.clone() });
                Err(err)
            }
        }
    }

    fn record(&self, kind: SchedulingEventKind) {
        if let Some((store, build_id)) = &self.events {
            store.append_kind(*build_id, kind);
        }
    }
}
