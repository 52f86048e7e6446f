//! Eventos de scheduling/ejecución y trait EventStore.

mod store;
mod types;

pub use store::{EventStore, InMemoryEventStore};
pub use types::{SchedulingEvent, SchedulingEventKind};
