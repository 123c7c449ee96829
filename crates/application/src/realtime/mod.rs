//! Real-time event handling.
//!
//! Events arrive on an [`EventStream`](crate::ports::EventStream) opened by
//! a [`RealtimeConnector`](crate::ports::RealtimeConnector). The
//! [`EventDispatcher`] fans them out to registered handlers and
//! [`LiveFeed`] folds them into view state.

mod authorizer;
mod dispatcher;
mod feed;
mod subscriber;

pub use authorizer::BroadcastAuthorizer;
pub use dispatcher::{EventDispatcher, HandlerId};
pub use feed::LiveFeed;
pub use subscriber::LiveUpdates;
