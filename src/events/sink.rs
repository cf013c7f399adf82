use super::Event;

/// Generic receiver for engine events.
///
/// Implemented for `crossbeam::channel::Sender<Event>` and for closures
/// `Fn(Event)`, so hosts can wire events into a channel or handle them
/// inline.
pub trait EventSink {
    fn publish(&self, event: Event);
}

impl EventSink for crossbeam::channel::Sender<Event> {
    fn publish(&self, event: Event) {
        // A disconnected receiver is the host's choice, not an engine error.
        let _ = self.send(event);
    }
}

impl<F> EventSink for F
where
    F: Fn(Event),
{
    fn publish(&self, event: Event) {
        self(event);
    }
}
