//! Subscription and payment event repository

use crate::domain::{PaymentEvent, StringUuid, Subscription};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn create(&self, subscription: &Subscription) -> Result<Subscription>;
    async fn find_by_blog(&self, blog_id: StringUuid) -> Result<Option<Subscription>>;
    async fn find_by_provider_id(&self, provider_id: &str) -> Result<Option<Subscription>>;
    async fn update(&self, subscription: &Subscription) -> Result<Subscription>;
    /// Store an event; returns `false` when the event id was already recorded
    async fn record_event(&self, event: &PaymentEvent) -> Result<bool>;
}

pub struct SubscriptionRepositoryImpl {
    pool: MySqlPool,
}

impl SubscriptionRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionRepositoryImpl {
    async fn create(&self, subscription: &Subscription) -> Result<Subscription> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (id, blog_id, plan, status, provider_subscription_id,
                                       current_period_end, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(subscription.id)
        .bind(subscription.blog_id)
        .bind(&subscription.plan)
        .bind(subscription.status)
        .bind(&subscription.provider_subscription_id)
        .bind(subscription.current_period_end)
        .execute(&self.pool)
        .await?;

        self.find_by_blog(subscription.blog_id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create subscription")))
    }

    async fn find_by_blog(&self, blog_id: StringUuid) -> Result<Option<Subscription>> {
        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, blog_id, plan, status, provider_subscription_id, current_period_end,
                   created_at, updated_at
            FROM subscriptions
            WHERE blog_id = ?
            "#,
        )
        .bind(blog_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    async fn find_by_provider_id(&self, provider_id: &str) -> Result<Option<Subscription>> {
        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, blog_id, plan, status, provider_subscription_id, current_period_end,
                   created_at, updated_at
            FROM subscriptions
            WHERE provider_subscription_id = ?
            "#,
        )
        .bind(provider_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    async fn update(&self, subscription: &Subscription) -> Result<Subscription> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions
            SET plan = ?, status = ?, provider_subscription_id = ?, current_period_end = ?,
                updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(&subscription.plan)
        .bind(subscription.status)
        .bind(&subscription.provider_subscription_id)
        .bind(subscription.current_period_end)
        .bind(subscription.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Subscription {} not found",
                subscription.id
            )));
        }

        self.find_by_blog(subscription.blog_id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update subscription")))
    }

    async fn record_event(&self, event: &PaymentEvent) -> Result<bool> {
        let payload =
            serde_json::to_string(&event.payload).map_err(|e| AppError::Internal(e.into()))?;

        let result = sqlx::query(
            r#"
            INSERT IGNORE INTO payment_events (event_id, event_type, action, payload, received_at)
            VALUES (?, ?, ?, ?, NOW())
            "#,
        )
        .bind(&event.event_id)
        .bind(&event.event_type)
        .bind(&event.action)
        .bind(&payload)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
