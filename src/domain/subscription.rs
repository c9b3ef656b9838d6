//! Subscription and payment event domain models

use super::common::{string_enum, StringUuid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[default]
    Pending,
    Active,
    Paused,
    Cancelled,
}

string_enum!(SubscriptionStatus {
    Pending => "pending",
    Active => "active",
    Paused => "paused",
    Cancelled => "cancelled",
});

impl SubscriptionStatus {
    /// Map a MercadoPago preapproval status
    pub fn from_provider(status: &str) -> Option<Self> {
        match status.to_lowercase().as_str() {
            "pending" => Some(SubscriptionStatus::Pending),
            "authorized" | "active" => Some(SubscriptionStatus::Active),
            "paused" => Some(SubscriptionStatus::Paused),
            "cancelled" | "canceled" => Some(SubscriptionStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    pub id: StringUuid,
    pub blog_id: StringUuid,
    pub plan: String,
    pub status: SubscriptionStatus,
    pub provider_subscription_id: Option<String>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Free plan attached to every new blog
    pub fn free(blog_id: StringUuid) -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            blog_id,
            plan: "free".to_string(),
            status: SubscriptionStatus::Active,
            provider_subscription_id: None,
            current_period_end: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A received provider notification, kept for idempotency
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentEvent {
    pub event_id: String,
    pub event_type: String,
    pub action: Option<String>,
    #[sqlx(json)]
    pub payload: serde_json::Value,
    pub received_at: DateTime<Utc>,
}

/// MercadoPago webhook body (only the fields we act on)
#[derive(Debug, Clone, Deserialize)]
pub struct MercadoPagoNotification {
    pub id: Option<serde_json::Value>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    /// Older notifications use `topic` instead of `type`
    pub topic: Option<String>,
    pub action: Option<String>,
    pub data: Option<MercadoPagoData>,
    /// Preapproval status when the notification carries it inline
    pub status: Option<String>,
    pub external_reference: Option<String>,
    pub next_payment_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MercadoPagoData {
    pub id: Option<serde_json::Value>,
    pub status: Option<String>,
    pub external_reference: Option<String>,
    pub next_payment_date: Option<DateTime<Utc>>,
}

/// Render a JSON id that may be a number or a string
pub fn json_id(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl MercadoPagoNotification {
    pub fn kind(&self) -> Option<&str> {
        self.event_type.as_deref().or(self.topic.as_deref())
    }

    pub fn data_id(&self) -> Option<String> {
        self.data.as_ref().and_then(|d| d.id.as_ref()).and_then(json_id)
    }

    pub fn event_id(&self) -> Option<String> {
        self.id.as_ref().and_then(json_id)
    }

    pub fn status(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.status.as_deref())
            .or(self.status.as_deref())
    }

    pub fn external_reference(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.external_reference.as_deref())
            .or(self.external_reference.as_deref())
    }

    pub fn next_payment_date(&self) -> Option<DateTime<Utc>> {
        self.data
            .as_ref()
            .and_then(|d| d.next_payment_date)
            .or(self.next_payment_date)
    }
}
