//! Events module - where board signals go
//!
//! The controller publishes [`BoardEvent`]s to an [`EventSink`] supplied at
//! construction. It does not know who listens: a recorder, a channel into
//! another thread, or nothing at all.

use std::sync::mpsc;

use crate::types::BoardEvent;

/// Receiver of board signals
pub trait EventSink {
    fn emit(&mut self, event: BoardEvent);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: BoardEvent) {
        (**self).emit(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&mut self, event: BoardEvent) {
        (**self).emit(event);
    }
}

/// Forwards events over a channel. A dropped receiver is ignored; the board
/// keeps running without listeners.
impl EventSink for mpsc::Sender<BoardEvent> {
    fn emit(&mut self, event: BoardEvent) {
        let _ = self.send(event);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: BoardEvent) {}
}

/// Records events in emission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<BoardEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[BoardEvent] {
        &self.events
    }

    /// Take all recorded events, leaving the log empty
    pub fn drain(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn count(&self, event: BoardEvent) -> usize {
        self.events.iter().filter(|e| **e == event).count()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: BoardEvent) {
        self.events.push(event);
    }
}
