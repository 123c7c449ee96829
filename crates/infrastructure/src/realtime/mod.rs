//! Real-time connection over a Pusher-compatible WebSocket.

pub mod pusher;
mod websocket_connector;

pub use websocket_connector::WebSocketConnector;
