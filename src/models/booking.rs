use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A service booking. Customer contact fields are snapshots taken at
/// creation time; `user_id` is the authenticated subject the booking is
/// authorized against. Wire shape is camelCase for front-end compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub service_id: String,
    pub service_name: String,
    pub package_id: String,
    pub package_name: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub pincode: String,
    pub notes: Option<String>,
    pub scheduled_at: NaiveDateTime,
    /// Whole rupees; converted to paise only at the gateway boundary.
    pub total_amount: i64,
    /// 10% deposit, fixed at creation.
    pub locking_amount: i64,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub refund_status: RefundStatus,
    pub payment_order_id: Option<String>,
    pub feedback: Option<Feedback>,
    pub created_at: NaiveDateTime,
    pub cancelled_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Locked,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Locked => "locked",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "confirmed" => BookingStatus::Confirmed,
            "completed" => BookingStatus::Completed,
            "cancelled" => BookingStatus::Cancelled,
            _ => BookingStatus::Locked,
        }
    }

    /// Terminal states accept no further status transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }
}

/// Tracks the deposit payment only; balance collection does not exist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "paid" => PaymentStatus::Paid,
            "refunded" => PaymentStatus::Refunded,
            "failed" => PaymentStatus::Failed,
            _ => PaymentStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RefundStatus {
    None,
    Processing,
    Completed,
}

impl RefundStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefundStatus::None => "none",
            RefundStatus::Processing => "processing",
            RefundStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "processing" => RefundStatus::Processing,
            "completed" => RefundStatus::Completed,
            _ => RefundStatus::None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub rating: i32,
    pub comments: String,
    pub created_at: NaiveDateTime,
}
