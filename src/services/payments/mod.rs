pub mod mock;
pub mod razorpay;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;

/// A payment order opened at the gateway. `amount` is in the smallest
/// currency unit (paise).
#[derive(Debug, Clone, Serialize)]
pub struct PaymentOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Open a gateway order. `amount_minor` is in paise.
    async fn create_order(
        &self,
        amount_minor: i64,
        receipt: &str,
        notes: serde_json::Value,
    ) -> anyhow::Result<PaymentOrder>;

    /// Check a checkout callback signature: HMAC-SHA256 over
    /// `"{order_id}|{payment_id}"`, hex-encoded.
    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;

    /// Check a webhook signature: HMAC-SHA256 over the raw request body.
    fn verify_webhook(&self, payload: &[u8], signature: &str) -> bool;
}

/// Constant-time comparison of a hex-encoded HMAC-SHA256 signature.
pub(crate) fn hmac_sha256_matches(secret: &str, message: &[u8], signature_hex: &str) -> bool {
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(message);
    mac.verify_slice(&signature).is_ok()
}
