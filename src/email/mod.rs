//! Email sending functionality for Taita
//!
//! Two providers: SMTP (using lettre) and a logging provider used when no
//! SMTP server is configured.

pub mod log;
pub mod provider;
pub mod smtp;
pub mod templates;

pub use self::log::LogEmailProvider;
pub use provider::{EmailProvider, EmailProviderError};
pub use smtp::SmtpEmailProvider;
pub use templates::{EmailTemplate, TemplateEngine};

use crate::config::EmailConfig;
use std::sync::Arc;

/// Build the provider selected by configuration
pub fn provider_from_config(
    config: &EmailConfig,
) -> Result<Arc<dyn EmailProvider>, EmailProviderError> {
    match &config.smtp {
        Some(smtp) => Ok(Arc::new(SmtpEmailProvider::from_config(
            smtp,
            &config.from_email,
            config.from_name.as_deref(),
        )?)),
        None => Ok(Arc::new(LogEmailProvider::new())),
    }
}
