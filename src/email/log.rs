//! Provider that writes messages to the log instead of sending them

use super::provider::{EmailProvider, EmailProviderError};
use crate::domain::{EmailMessage, EmailSendResult};
use async_trait::async_trait;

#[derive(Debug, Default)]
pub struct LogEmailProvider;

impl LogEmailProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmailProvider for LogEmailProvider {
    async fn send(&self, message: &EmailMessage) -> Result<EmailSendResult, EmailProviderError> {
        let recipients: Vec<&str> = message.to.iter().map(|a| a.email.as_str()).collect();
        tracing::info!(
            to = ?recipients,
            subject = %message.subject,
            "SMTP not configured, email logged instead of sent"
        );
        tracing::debug!(body = message.text_body.as_deref().unwrap_or(&message.html_body));
        Ok(EmailSendResult::success(None))
    }

    async fn test_connection(&self) -> Result<(), EmailProviderError> {
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "log"
    }
}
