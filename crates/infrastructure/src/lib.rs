//! HireLink Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer: the reqwest transport, the system
//! clock, file token storage, the Pusher WebSocket connector and the
//! configuration loader.

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod persistence;
pub mod realtime;
pub mod serialization;

pub use adapters::{ReqwestTransport, SystemClock};
pub use bootstrap::{BootstrapError, HireLinkClient, build_client, build_live_updates};
pub use config::{CONFIG_PATH_VAR, ConfigError, load_config, load_config_with};
pub use persistence::FileTokenStorage;
pub use realtime::WebSocketConnector;
pub use serialization::{
    SerializationError, from_json_bytes, to_json_stable, to_json_stable_bytes,
};
