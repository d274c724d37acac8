use crate::domain::{EnterpriseEvent, StoreError};
use crate::ports::{EventSink, Transactional};
use parking_lot::RwLock;
use tracing::debug;

#[derive(Default)]
struct Buffers {
    delivered: Vec<EnterpriseEvent>,
    pending: Vec<Vec<EnterpriseEvent>>,
}

/// Event sink that records delivered events in order.
///
/// Events emitted inside a frame are held until the outermost frame commits
/// and are dropped on rollback.
#[derive(Default)]
pub struct RecordingEventSink {
    buffers: RwLock<Buffers>,
}

impl RecordingEventSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivered events, oldest first.
    pub fn events(&self) -> Vec<EnterpriseEvent> {
        self.buffers.read().delivered.clone()
    }

    /// Delivered events of one kind.
    pub fn events_of(&self, kind: &str) -> Vec<EnterpriseEvent> {
        self.buffers
            .read()
            .delivered
            .iter()
            .filter(|e| e.kind() == kind)
            .cloned()
            .collect()
    }

    /// Drain delivered events.
    pub fn take(&self) -> Vec<EnterpriseEvent> {
        std::mem::take(&mut self.buffers.write().delivered)
    }
}

impl Transactional for RecordingEventSink {
    fn begin(&self) {
        self.buffers.write().pending.push(Vec::new());
    }

    fn commit(&self) -> Result<(), StoreError> {
        let mut buffers = self.buffers.write();
        let frame = buffers.pending.pop().ok_or(StoreError::NoOpenFrame)?;
        match buffers.pending.last_mut() {
            Some(parent) => parent.extend(frame),
            None => buffers.delivered.extend(frame),
        }
        Ok(())
    }

    fn rollback(&self) -> Result<(), StoreError> {
        let dropped = self
            .buffers
            .write()
            .pending
            .pop()
            .ok_or(StoreError::NoOpenFrame)?;
        if !dropped.is_empty() {
            debug!(count = dropped.len(), "Discarded events from rolled back frame");
        }
        Ok(())
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: EnterpriseEvent) {
        let mut buffers = self.buffers.write();
        match buffers.pending.last_mut() {
            Some(frame) => frame.push(event),
            None => buffers.delivered.push(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AccountAddress;

    fn event(id: u64) -> EnterpriseEvent {
        EnterpriseEvent::AutoRejectStale {
            id,
            purchaser: AccountAddress::from([1; 20]),
        }
    }

    #[test]
    fn test_emit_outside_frame_delivers() {
        let sink = RecordingEventSink::new();
        sink.emit(event(1));
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn test_nested_frames() {
        let sink = RecordingEventSink::new();
        sink.begin();
        sink.emit(event(1));
        sink.begin();
        sink.emit(event(2));
        sink.rollback().unwrap();
        sink.begin();
        sink.emit(event(3));
        sink.commit().unwrap();
        assert!(sink.events().is_empty());
        sink.commit().unwrap();
        assert_eq!(sink.take(), vec![event(1), event(3)]);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_events_of_kind() {
        let sink = RecordingEventSink::new();
        sink.emit(event(4));
        assert_eq!(sink.events_of("auto_reject_stale_purchase_order").len(), 1);
        assert!(sink.events_of("purchase_complete").is_empty());
    }
}
