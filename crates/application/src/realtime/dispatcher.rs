//! Ordered, synchronous fan-out of received events.

use hirelink_domain::{EventKind, RealtimeEvent};
use tracing::{debug, trace};

use crate::ports::EventStream;

type Handler = Box<dyn FnMut(&RealtimeEvent) + Send>;

/// Identifies a registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

struct Registration {
    id: HandlerId,
    kind: Option<EventKind>,
    handler: Handler,
}

/// Invokes handlers for each event, in registration order.
///
/// Handlers run to completion before the next event is looked at, so a
/// burst is processed one event at a time with nothing dropped.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Registration>,
    next_id: u64,
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl EventDispatcher {
    /// Creates a dispatcher with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for every event.
    pub fn subscribe<F>(&mut self, handler: F) -> HandlerId
    where
        F: FnMut(&RealtimeEvent) + Send + 'static,
    {
        self.register(None, Box::new(handler))
    }

    /// Registers a handler for one event kind.
    pub fn on<F>(&mut self, kind: EventKind, handler: F) -> HandlerId
    where
        F: FnMut(&RealtimeEvent) + Send + 'static,
    {
        self.register(Some(kind), Box::new(handler))
    }

    fn register(&mut self, kind: Option<EventKind>, handler: Handler) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.push(Registration { id, kind, handler });
        id
    }

    /// Removes a handler. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: HandlerId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|r| r.id != id);
        self.handlers.len() != before
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs every matching handler for `event` and returns how many ran.
    pub fn dispatch(&mut self, event: &RealtimeEvent) -> usize {
        let mut ran = 0;
        for registration in &mut self.handlers {
            if registration.kind.as_ref().is_none_or(|k| *k == event.kind) {
                (registration.handler)(event);
                ran += 1;
            }
        }
        trace!(channel = %event.channel, kind = event.kind.as_wire(), ran, "dispatched event");
        ran
    }

    /// Dispatches events until the stream ends. Returns the number of
    /// events received.
    pub async fn run(&mut self, mut events: EventStream) -> usize {
        let mut received = 0;
        while let Some(event) = events.recv().await {
            received += 1;
            self.dispatch(&event);
        }
        debug!(received, "event stream ended");
        received
    }
}
