//! Subscriptions and MercadoPago webhook processing

use crate::crypto::verify_hmac_sha256;
use crate::domain::{
    MercadoPagoNotification, PaymentEvent, StringUuid, Subscription, SubscriptionStatus,
};
use crate::error::{AppError, Result};
use crate::repository::SubscriptionRepository;
use chrono::Utc;
use metrics::counter;
use std::str::FromStr;
use std::sync::Arc;

/// Notification types that carry a preapproval (recurring plan) change
const PREAPPROVAL_TYPES: &[&str] = &["subscription_preapproval", "preapproval"];

/// What happened to a delivered notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    Processed,
    Duplicate,
    Ignored,
}

impl WebhookOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookOutcome::Processed => "processed",
            WebhookOutcome::Duplicate => "duplicate",
            WebhookOutcome::Ignored => "ignored",
        }
    }
}

/// `ts` and `v1` parts of an `x-signature` header
fn parse_signature_header(header: &str) -> Option<(&str, &str)> {
    let mut ts = None;
    let mut v1 = None;
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("ts", value)) => ts = Some(value.trim()),
            Some(("v1", value)) => v1 = Some(value.trim()),
            _ => {}
        }
    }
    Some((ts?, v1?))
}

/// Signed text: `id:<data.id>;request-id:<x-request-id>;ts:<ts>;`
pub fn signature_manifest(data_id: &str, request_id: &str, ts: &str) -> String {
    format!("id:{};request-id:{};ts:{};", data_id, request_id, ts)
}

pub struct SubscriptionService {
    repo: Arc<dyn SubscriptionRepository>,
    webhook_secret: Option<String>,
}

impl SubscriptionService {
    pub fn new(repo: Arc<dyn SubscriptionRepository>, webhook_secret: Option<String>) -> Self {
        Self {
            repo,
            webhook_secret: webhook_secret.filter(|s| !s.is_empty()),
        }
    }

    pub async fn get(&self, blog_id: StringUuid) -> Result<Subscription> {
        self.repo
            .find_by_blog(blog_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))
    }

    /// Check the `x-signature` header. Always passes when no secret is set.
    pub fn verify_signature(
        &self,
        signature: Option<&str>,
        request_id: Option<&str>,
        data_id: &str,
    ) -> Result<()> {
        let Some(secret) = &self.webhook_secret else {
            return Ok(());
        };

        let (ts, v1) = signature
            .and_then(parse_signature_header)
            .ok_or_else(|| AppError::Unauthorized("Missing webhook signature".to_string()))?;
        let manifest = signature_manifest(data_id, request_id.unwrap_or(""), ts);

        if !verify_hmac_sha256(secret, manifest.as_bytes(), v1) {
            counter!("taita_webhook_events_total", "result" => "bad_signature").increment(1);
            return Err(AppError::Unauthorized(
                "Invalid webhook signature".to_string(),
            ));
        }
        Ok(())
    }

    /// Verify, record and apply a notification. Redelivered events are
    /// acknowledged without being applied again.
    pub async fn handle_notification(
        &self,
        payload: serde_json::Value,
        signature: Option<&str>,
        request_id: Option<&str>,
    ) -> Result<WebhookOutcome> {
        let notification: MercadoPagoNotification = serde_json::from_value(payload.clone())
            .map_err(|e| AppError::BadRequest(format!("Invalid notification: {}", e)))?;
        let data_id = notification.data_id().unwrap_or_default();

        self.verify_signature(signature, request_id, &data_id)?;

        let kind = notification.kind().unwrap_or("unknown").to_string();
        let event_id = match notification.event_id() {
            Some(id) => id,
            None if !data_id.is_empty() => format!(
                "{}:{}:{}",
                kind,
                data_id,
                notification.action.as_deref().unwrap_or("")
            ),
            None => {
                return Err(AppError::BadRequest(
                    "Notification has no id".to_string(),
                ))
            }
        };

        let event = PaymentEvent {
            event_id: event_id.clone(),
            event_type: kind.clone(),
            action: notification.action.clone(),
            payload,
            received_at: Utc::now(),
        };
        if !self.repo.record_event(&event).await? {
            counter!("taita_webhook_events_total", "result" => "duplicate").increment(1);
            tracing::info!(event_id = %event_id, "Duplicate webhook event ignored");
            return Ok(WebhookOutcome::Duplicate);
        }

        let outcome = if PREAPPROVAL_TYPES.contains(&kind.as_str()) {
            self.apply_preapproval(&notification, &data_id).await?
        } else {
            tracing::debug!(event_type = %kind, "Unhandled webhook event type");
            WebhookOutcome::Ignored
        };

        counter!("taita_webhook_events_total", "result" => outcome.as_str()).increment(1);
        Ok(outcome)
    }

    async fn apply_preapproval(
        &self,
        notification: &MercadoPagoNotification,
        data_id: &str,
    ) -> Result<WebhookOutcome> {
        let Some(status) = notification.status().and_then(SubscriptionStatus::from_provider)
        else {
            return Ok(WebhookOutcome::Ignored);
        };

        let mut subscription = match self.find_target(notification, data_id).await? {
            Some(s) => s,
            None => {
                tracing::warn!(data_id = %data_id, "No subscription matches webhook");
                return Ok(WebhookOutcome::Ignored);
            }
        };

        subscription.status = status;
        if !data_id.is_empty() {
            subscription.provider_subscription_id = Some(data_id.to_string());
        }
        if let Some(next) = notification.next_payment_date() {
            subscription.current_period_end = Some(next);
        }
        subscription.updated_at = Utc::now();

        let updated = self.repo.update(&subscription).await?;
        tracing::info!(
            blog_id = %updated.blog_id,
            status = %updated.status,
            "Subscription updated from webhook"
        );
        Ok(WebhookOutcome::Processed)
    }

    /// By provider id first, then by `external_reference` (the blog id)
    async fn find_target(
        &self,
        notification: &MercadoPagoNotification,
        data_id: &str,
    ) -> Result<Option<Subscription>> {
        if !data_id.is_empty() {
            if let Some(found) = self.repo.find_by_provider_id(data_id).await? {
                return Ok(Some(found));
            }
        }
        match notification
            .external_reference()
            .and_then(|r| StringUuid::from_str(r.trim()).ok())
        {
            Some(blog_id) => self.repo.find_by_blog(blog_id).await,
            None => Ok(None),
        }
    }
}
