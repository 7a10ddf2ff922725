use moveminds_dto::PaymentInitiation;
use reqwest::Method;
use serde_json::json;

use super::ApiClient;
use crate::error::Result;

impl ApiClient {
    /// Ask the backend to sign a checkout for an enrollment.
    pub async fn initiate_payment(
        &self,
        enrollment_id: i64,
        return_url: Option<&str>,
        cancel_url: Option<&str>,
    ) -> Result<PaymentInitiation> {
        self.send_json(
            Method::POST,
            "/payments/initiate",
            &json!({
                "enrollmentId": enrollment_id,
                "returnUrl": return_url,
                "cancelUrl": cancel_url,
            }),
        )
        .await
    }
}
