use async_trait::async_trait;
use uuid::Uuid;

use super::{hmac_sha256_matches, PaymentOrder, PaymentProvider};

/// Deterministic gateway stand-in for local development and tests. Orders
/// get synthetic ids and signatures use the same HMAC scheme as the real
/// gateway, so a caller holding the secret can produce valid signatures.
pub struct MockPaymentProvider {
    key_secret: String,
    webhook_secret: String,
}

impl MockPaymentProvider {
    pub fn new(key_secret: String, webhook_secret: String) -> Self {
        Self {
            key_secret,
            webhook_secret,
        }
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_order(
        &self,
        amount_minor: i64,
        receipt: &str,
        _notes: serde_json::Value,
    ) -> anyhow::Result<PaymentOrder> {
        anyhow::ensure!(amount_minor > 0, "amount must be greater than zero");
        let id = format!("order_mock_{}", Uuid::new_v4().simple());
        tracing::info!(order_id = %id, amount_minor, receipt, "mock payment order created");
        Ok(PaymentOrder {
            id,
            amount: amount_minor,
            currency: "INR".to_string(),
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
