use serde::{Deserialize, Serialize};

/// Fields to post to the hosted payment page.
///
/// The backend computes `hash` from the merchant secret; the client only
/// forwards these values verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInitiation {
    pub merchant_id: String,
    pub order_id: String,
    pub amount: String,
    pub currency: String,
    pub hash: String,
    pub return_url: String,
    pub cancel_url: String,
    pub notify_url: String,
    #[serde(default)]
    pub checkout_url: Option<String>,
    #[serde(default)]
    pub items: Vec<PaymentItem>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentItem {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<u32>,
}

impl PaymentInitiation {
    /// Form fields in the order the hosted checkout page documents them.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("merchant_id", self.merchant_id.clone()),
            ("return_url", self.return_url.clone()),
            ("cancel_url", self.cancel_url.clone()),
            ("notify_url", self.notify_url.clone()),
            ("order_id", self.order_id.clone()),
            (
                "items",
                self.items
                    .iter()
                    .map(|i| i.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            ("currency", self.currency.clone()),
            ("amount", self.amount.clone()),
        ];
        let optional = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("country", &self.country),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                fields.push((name, value.clone()));
            }
        }
        fields.push(("hash", self.hash.clone()));
        fields
    }
}
