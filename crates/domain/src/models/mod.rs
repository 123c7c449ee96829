//! Marketplace entities.
//!
//! Field names follow the camelCase wire form produced by the client's
//! key transform. Enum values stay snake_case, as the backend sends them.

mod application;
mod job;
mod message;
mod notification;
mod payment;
mod user;

pub use application::{ApplicationStatus, JobApplication, NewJobApplication};
pub use job::{Job, JobDraft, JobFilters, JobStatus};
pub use message::{Conversation, Message, NewMessage};
pub use notification::{Notification, UnreadCount};
pub use payment::{NewPayment, Payment, PaymentStatus};
pub use user::{ArtisanFilters, ProfileUpdate, User, UserRole};

/// Backend record identifier.
pub type RecordId = u64;
