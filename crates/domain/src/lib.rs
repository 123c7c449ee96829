//! HireLink Domain - Core marketplace types
//!
//! This crate defines the domain model for the HireLink marketplace client.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod cache;
pub mod case;
pub mod config;
pub mod error;
pub mod id;
pub mod models;
pub mod realtime;
pub mod request;
pub mod response;

pub use auth::{AuthResponse, AuthToken, Credentials, Registration, Session};
pub use cache::{CacheKey, DEFAULT_CACHE_TTL, GetOptions};
pub use case::{camelize_keys, snakify_keys, to_camel_case, to_snake_case};
pub use config::{ClientConfig, RetryConfig, RetryMode};
pub use error::{DomainError, DomainResult};
pub use id::generate_request_id;
pub use realtime::{Channel, EventKind, RealtimeConfig, RealtimeEvent};
