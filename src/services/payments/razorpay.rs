use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use super::{hmac_sha256_matches, PaymentOrder, PaymentProvider};

pub struct RazorpayProvider {
    key_id: String,
    key_secret: String,
    webhook_secret: String,
    client: reqwest::Client,
}

impl RazorpayProvider {
    pub fn new(key_id: String, key_secret: String, webhook_secret: String) -> Self {
        Self {
            key_id,
            key_secret,
            webhook_secret,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct RazorpayOrderResponse {
    id: String,
    amount: i64,
    currency: String,
}

#[async_trait]
impl PaymentProvider for RazorpayProvider {
    async fn create_order(
        &self,
        amount_minor: i64,
        receipt: &str,
        notes: serde_json::Value,
    ) -> anyhow::Result<PaymentOrder> {
        let body = serde_json::json!({
            "amount": amount_minor,
            "currency": "INR",
            "receipt": receipt,
            "notes": notes,
        });

        let order: RazorpayOrderResponse = self
            .client
            .post("https://api.razorpay.com/v1/orders")
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await
            .context("failed to reach Razorpay")?
            .error_for_status()
            .context("Razorpay order creation failed")?
            .json()
            .await
            .context("failed to parse Razorpay order response")?;

        Ok(PaymentOrder {
            id: order.id,
            amount: order.amount,
            currency: order.currency,
        })
    }

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        let message = format!("{order_id}|{payment_id}");
        hmac_sha256_matches(&self.key_secret, message.as_bytes(), signature)
    }

    fn verify_webhook(&self, payload: &[u8], signature: &str) -> bool {
        hmac_sha256_matches(&self.webhook_secret, payload, signature)
    }
}
