//! HireLink Application - Client orchestration
//!
//! This crate holds the ports the client needs from the outside world and
//! the logic built on them: the caching, deduplicating request dispatcher,
//! the auth session, the typed resource APIs and real-time event handling.

pub mod api_service;
pub mod auth;
pub mod cache;
pub mod client;
pub mod error;
pub mod ports;
pub mod realtime;
pub mod retry;
pub mod use_cases;

pub use api_service::{ApiService, ServiceSettings};
pub use auth::{AuthSession, SessionStatus};
pub use client::MarketplaceClient;
pub use error::{ApplicationError, ApplicationResult};
pub use realtime::{BroadcastAuthorizer, EventDispatcher, HandlerId, LiveFeed, LiveUpdates};
pub use retry::RetryPolicy;
