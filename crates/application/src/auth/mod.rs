//! Authentication state shared across the client.

mod session;

pub use session::{AuthSession, SessionStatus};
