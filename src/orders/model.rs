use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Received,
    PaymentProcessing,
    SubscriptionProcessing,
    Paid,
    Subscribed,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Received => "received",
            OrderStatus::PaymentProcessing => "payment_processing",
            OrderStatus::SubscriptionProcessing => "subscription_processing",
            OrderStatus::Paid => "paid",
            OrderStatus::Subscribed => "subscribed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        }
    }

    /// Statuses a checkout may be started from.
    pub fn is_awaiting_payment(&self) -> bool {
        matches!(
            self,
            OrderStatus::PaymentProcessing | OrderStatus::SubscriptionProcessing
        )
    }

    /// Payment already went through; callbacks are no-ops from here on.
    pub fn is_settled(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Subscribed)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Order as owned by the host platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: u64,
    pub user_id: u64,
    pub status: OrderStatus,
    pub total: Decimal,
    pub payment_id: Option<String>,
    pub paid: Option<Decimal>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn new(id: u64, user_id: u64, total: Decimal) -> Self {
        Self {
            id,
            user_id,
            status: OrderStatus::PaymentProcessing,
            total,
            payment_id: None,
            paid: None,
            processed_at: None,
        }
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub is_available: bool,
    pub is_active: bool,
}

impl User {
    pub fn can_check_out(&self) -> bool {
        self.is_available && self.is_active
    }
}
