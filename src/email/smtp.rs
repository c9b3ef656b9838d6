//! SMTP email provider implementation using lettre

use super::provider::{EmailProvider, EmailProviderError};
use crate::config::SmtpSettings;
use crate::domain::{EmailMessage, EmailSendResult};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

/// SMTP-based email provider
pub struct SmtpEmailProvider {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_email: String,
    from_name: Option<String>,
}

impl SmtpEmailProvider {
    /// Create a new SMTP provider from configuration
    pub fn from_config(
        config: &SmtpSettings,
        from_email: &str,
        from_name: Option<&str>,
    ) -> Result<Self, EmailProviderError> {
        let mut builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| EmailProviderError::InvalidConfiguration(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };

        builder = builder.port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from_email: from_email.to_string(),
            from_name: from_name.map(String::from),
        })
    }

    fn build_from_mailbox(&self) -> Result<Mailbox, EmailProviderError> {
        let mailbox = match &self.from_name {
            Some(name) => format!("{} <{}>", name, self.from_email),
            None => self.from_email.clone(),
        };

        mailbox.parse().map_err(|e| {
            EmailProviderError::InvalidConfiguration(format!("Invalid from address: {}", e))
        })
    }
}

fn classify_error(error_msg: String) -> EmailProviderError {
    if error_msg.contains("authentication") || error_msg.contains("AUTH") {
        EmailProviderError::AuthenticationFailed(error_msg)
    } else if error_msg.contains("connection") || error_msg.contains("timeout") {
        EmailProviderError::ConnectionError(error_msg)
    } else {
        EmailProviderError::SendFailed(error_msg)
    }
}

#[async_trait]
impl EmailProvider for SmtpEmailProvider {
    async fn send(&self, message: &EmailMessage) -> Result<EmailSendResult, EmailProviderError> {
        if message.to.is_empty() {
            return Err(EmailProviderError::InvalidConfiguration(
                "No recipients specified".to_string(),
            ));
        }

        let mut email_builder = Message::builder()
            .from(self.build_from_mailbox()?)
            .subject(&message.subject);

        for addr in &message.to {
            let mailbox: Mailbox = addr.mailbox().parse().map_err(|e| {
                EmailProviderError::InvalidConfiguration(format!("Invalid to address: {}", e))
            })?;
            email_builder = email_builder.to(mailbox);
        }

        let email = match &message.text_body {
            Some(text_body) => email_builder.multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(message.html_body.clone()),
                    ),
            ),
            None => email_builder
                .header(ContentType::TEXT_HTML)
                .body(message.html_body.clone()),
        }
        .map_err(|e| EmailProviderError::SendFailed(e.to_string()))?;

        let response = self
            .transport
            .send(email)
            .await
            .map_err(|e| classify_error(e.to_string()))?;

        let message_id = response.message().next().map(|s| s.to_string());
        Ok(EmailSendResult::success(message_id))
    }

    async fn test_connection(&self) -> Result<(), EmailProviderError> {
        self.transport
            .test_connection()
            .await
            .map(|_| ())
            .map_err(|e| classify_error(e.to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "smtp"
    }
}
