//! Payments for jobs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// Settlement state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Held until the client releases it.
    #[default]
    Pending,
    /// Paid out to the artisan.
    Completed,
    /// The charge failed.
    Failed,
    /// Returned to the client.
    Refunded,
}

/// A payment for a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Record ID
    pub id: RecordId,
    /// Job paid for
    pub job_id: RecordId,
    /// Amount charged
    pub amount: f64,
    /// Settlement state
    #[serde(default)]
    pub status: PaymentStatus,
    /// Charge time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for paying for a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    /// Job paid for
    pub job_id: RecordId,
    /// Amount to charge
    pub amount: f64,
    /// Payment method reference from the payment provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}
