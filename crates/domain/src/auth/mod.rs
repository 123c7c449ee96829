//! Authentication domain types

mod types;

pub use types::{AuthResponse, AuthToken, Credentials, Registration, Session};
