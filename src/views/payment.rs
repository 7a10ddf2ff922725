//! Checkout for paid enrollments.
//!
//! The backend signs the order; the client only relays the fields it gets
//! back to the hosted payment page as a form POST.

use moveminds_dto::{Enrollment, PaymentStatus};

use crate::api::ApiClient;
use crate::config::PaymentConfig;
use crate::error::{MoveMindsError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Checkout {
    /// Where to post the form; `None` if the backend did not say.
    pub action: Option<String>,
    pub fields: Vec<(&'static str, String)>,
}

impl Checkout {
    /// Self-submitting HTML form for opening in a browser.
    pub fn to_html(&self) -> Result<String> {
        let action = self.action.as_deref().ok_or_else(|| {
            MoveMindsError::Other("payment gateway did not provide a checkout URL".to_string())
        })?;
        let inputs: String = self
            .fields
            .iter()
            .map(|(name, value)| {
                format!(
                    "  <input type=\"hidden\" name=\"{name}\" value=\"{}\">\n",
                    escape_attr(value)
                )
            })
            .collect();
        Ok(format!(
            "<form id=\"checkout\" method=\"post\" action=\"{}\">\n{inputs}</form>\n\
             <script>document.getElementById('checkout').submit();</script>\n",
            escape_attr(action)
        ))
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub async fn start_checkout(
    api: &ApiClient,
    payment: &PaymentConfig,
    enrollment: &Enrollment,
) -> Result<Checkout> {
    if enrollment.payment_status == Some(PaymentStatus::Paid) {
        return Err(MoveMindsError::InvalidArgument(format!(
            "enrollment {} is already paid",
            enrollment.id
        )));
    }
    let initiation = api
        .initiate_payment(
            enrollment.id,
            payment.return_url.as_deref(),
            payment.cancel_url.as_deref(),
        )
        .await?;
    tracing::debug!(
        enrollment_id = enrollment.id,
        order_id = %initiation.order_id,
        "payment initiated"
    );
    Ok(Checkout {
        action: initiation.checkout_url.clone(),
        fields: initiation.form_fields(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escapes_values() {
        let checkout = Checkout {
            action: Some("https://pay.example.lk/checkout".to_string()),
            fields: vec![("items", "Yoga & \"Pilates\"".to_string())],
        };
        let html = checkout.to_html().unwrap();
        assert!(html.contains("action=\"https://pay.example.lk/checkout\""));
        assert!(html.contains("value=\"Yoga &amp; &quot;Pilates&quot;\""));
    }

    #[test]
    fn test_html_requires_action() {
        let checkout = Checkout {
            action: None,
            fields: Vec::new(),
        };
        assert!(checkout.to_html().is_err());
    }
}
