use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A product order. Unlike bookings there is no cancellation or fulfilment
/// flow; an order only moves pending -> confirmed on payment verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub items: Vec<CartItem>,
    pub total_amount: i64,
    pub shipping: i64,
    pub address: String,
    pub status: OrderStatus,
    pub payment_status: super::PaymentStatus,
    pub payment_order_id: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "confirmed" => OrderStatus::Confirmed,
            _ => OrderStatus::Pending,
        }
    }
}
