//! Payment calls.

use hirelink_domain::GetOptions;
use hirelink_domain::models::{NewPayment, Payment, RecordId};
use hirelink_domain::request::QueryParams;

use super::{decode, encode};
use crate::api_service::ApiService;
use crate::error::ApplicationResult;
use crate::ports::HttpTransport;

/// Charges for jobs and releases escrowed funds.
pub struct PaymentsApi<T> {
    api: ApiService<T>,
}

impl<T: HttpTransport + 'static> PaymentsApi<T> {
    /// Creates the API over a shared dispatcher.
    #[must_use]
    pub const fn new(api: ApiService<T>) -> Self {
        Self { api }
    }

    /// Lists the signed-in user's payments.
    ///
    /// # Errors
    /// Returns an error if the call fails or the body is malformed.
    pub async fn list(&self) -> ApplicationResult<Vec<Payment>> {
        let value = self
            .api
            .get("/payments", QueryParams::new(), GetOptions::default())
            .await?;
        decode(value)
    }

    /// Fetches one payment.
    ///
    /// # Errors
    /// Returns an error if the call fails or the body is malformed.
    pub async fn get(&self, id: RecordId) -> ApplicationResult<Payment> {
        let value = self
            .api
            .get(&format!("/payments/{id}"), QueryParams::new(), GetOptions::default())
            .await?;
        decode(value)
    }

    /// Pays for a job.
    ///
    /// # Errors
    /// Returns an error if the backend rejects the payment.
    pub async fn create(&self, payment: &NewPayment) -> ApplicationResult<Payment> {
        let value = self.api.post("/payments", Some(encode(payment)?)).await?;
        decode(value)
    }

    /// Releases an escrowed payment to the artisan.
    ///
    /// # Errors
    /// Returns an error if the call fails.
    pub async fn release(&self, id: RecordId) -> ApplicationResult<Payment> {
        let value = self
            .api
            .post(&format!("/payments/{id}/release"), None)
            .await?;
        self.api.invalidate("/payments");
        decode(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api_service::tests::{MockTransport, service};
    use hirelink_domain::models::PaymentStatus;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_then_release() {
        let transport = Arc::new(
            MockTransport::ok(json!({"id": 3, "job_id": 4, "amount": 150.0, "status": "completed"}))
                .then(Ok(hirelink_domain::response::RawResponse::json(
                    201,
                    &json!({"id": 3, "job_id": 4, "amount": 150.0, "status": "pending"}),
                ))),
        );
        let payments = PaymentsApi::new(service(&transport));

        let created = payments
            .create(&NewPayment {
                job_id: 4,
                amount: 150.0,
                payment_method: None,
            })
            .await
            .unwrap();
        let released = payments.release(created.id).await.unwrap();

        assert_eq!(created.status, PaymentStatus::Pending);
        assert_eq!(released.status, PaymentStatus::Completed);
        assert_eq!(transport.requests()[1].endpoint, "/payments/3/release");
        assert_eq!(transport.requests()[1].body, None);
    }
}
