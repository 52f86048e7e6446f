use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use super::{SchedulingEvent, SchedulingEventKind};

/// Almacenamiento de eventos append-only, compartido entre hilos.
pub trait EventStore: Send + Sync {
    /// Agrega un evento a partir de su kind y devuelve el evento completo (con seq y ts).
    fn append_kind(&self, build_id: Uuid, kind: SchedulingEventKind) -> SchedulingEvent;
    /// Lista los eventos de un build en orden de append.
    fn list(&self, build_id: Uuid) -> Vec<SchedulingEvent>;
}

#[derive(Default)]
pub struct InMemoryEventStore {
    inner: Mutex<Vec<SchedulingEvent>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.inner.lock().len() }

    pub fn is_empty(&self) -> bool { self.inner.lock().is_empty() }
}

impl EventStore for InMemoryEventStore {
    fn append_kind(&self, build_id: Uuid, kind: SchedulingEventKind) -> SchedulingEvent {
        let mut events = self.inner.lock();
        let ev = SchedulingEvent { seq: events.len() as u64, build_id, kind, ts: Utc::now() };
        events.push(ev.clone());
        ev
    }

    fn list(&self, build_id: Uuid) -> Vec<SchedulingEvent> {
        self.inner.lock().iter().filter(|e| e.build_id == build_id).cloned().collect()
    }
}
