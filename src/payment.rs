// Payment gateway client. Order creation goes over HTTP; signature
// verification is local HMAC-SHA256 over "order_id|payment_id" with the key
// secret, compared against the hex-encoded signature the gateway returns.

use reqwest::Client;
use ring::hmac;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub key_id: String,
    pub key_secret: String,
    pub base_url: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            key_id: String::new(),
            key_secret: String::new(),
            base_url: "https://api.razorpay.com/v1".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("gateway rejected order: {status} {body}")]
    Gateway { status: u16, body: String },
}

/// Order as created at the gateway. Amount is in the smallest currency unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: u64,
    pub currency: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Serialize)]
struct CreateOrderBody {
    amount: u64,
    currency: &'static str,
    payment_capture: u8,
}

pub struct PaymentClient {
    config: PaymentConfig,
    http: Client,
}

impl PaymentClient {
    pub fn new(config: PaymentConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// Creates an order for `amount` (smallest currency unit, INR paise) with
    /// automatic capture.
    pub async fn create_order(&self, amount: u64) -> Result<GatewayOrder, PaymentError> {
        let url = format!("{}/orders", self.config.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&CreateOrderBody {
                amount,
                currency: "INR",
                payment_capture: 1,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Gateway {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    fn signing_key(&self) -> hmac::Key {
        hmac::Key::new(hmac::HMAC_SHA256, self.config.key_secret.as_bytes())
    }

    /// Hex signature the gateway would produce for this order/payment pair.
    pub fn sign(&self, order_id: &str, payment_id: &str) -> String {
        let payload = format!("{}|{}", order_id, payment_id);
        let tag = hmac::sign(&self.signing_key(), payload.as_bytes());
        hex::encode(tag.as_ref())
    }

    /// Constant-time check of a gateway signature. Malformed hex counts as a
    /// failed verification, not an error.
    pub fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        let expected = match hex::decode(signature) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };
        let payload = format!("{}|{}", order_id, payment_id);
        hmac::verify(&self.signing_key(), payload.as_bytes(), &expected).is_ok()
    }
}
