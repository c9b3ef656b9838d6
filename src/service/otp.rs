//! Email one-time codes for commenters

use crate::cache::OtpStore;
use crate::config::OtpConfig;
use crate::domain::{
    normalize_email, CommenterToken, EmailAddress, EmailMessage, OtpRecord, OtpRequested,
    RequestOtpInput, VerifyOtpInput,
};
use crate::email::{EmailProvider, EmailTemplate, TemplateEngine};
use crate::error::{AppError, Result};
use crate::jwt::JwtManager;
use chrono::{Datelike, Duration, Utc};
use metrics::counter;
use rand::Rng;
use std::sync::Arc;
use validator::Validate;

pub struct OtpService {
    store: Arc<dyn OtpStore>,
    email: Arc<dyn EmailProvider>,
    jwt: JwtManager,
    config: OtpConfig,
}

fn generate_code() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000u32))
}

impl OtpService {
    pub fn new(
        store: Arc<dyn OtpStore>,
        email: Arc<dyn EmailProvider>,
        jwt: JwtManager,
        config: OtpConfig,
    ) -> Self {
        Self {
            store,
            email,
            jwt,
            config,
        }
    }

    /// Issue a fresh code, replacing any pending one for the email
    pub async fn request(&self, input: RequestOtpInput) -> Result<OtpRequested> {
        input.validate()?;
        let email = normalize_email(&input.email);
        let code = generate_code();
        let expires_at = Utc::now() + Duration::seconds(self.config.ttl_secs);
        let ttl = std::time::Duration::from_secs(self.config.ttl_secs.max(1) as u64);

        self.store
            .save(&email, &OtpRecord::new(code.clone(), expires_at), ttl)
            .await?;

        let mut engine = TemplateEngine::new();
        engine
            .set("code", code.as_str())
            .set("expires_in_minutes", (self.config.ttl_secs / 60).max(1).to_string())
            .set("year", Utc::now().year().to_string())
            .set("app_name", "Taita");
        let rendered = engine.render_template(EmailTemplate::CommentOtp);
        let message = EmailMessage::new(
            EmailAddress::new(email.clone()),
            rendered.subject,
            rendered.html_body,
        )
        .with_text_body(rendered.text_body);

        if let Err(e) = self.email.send(&message).await {
            counter!("taita_otp_requests_total", "result" => "email_failed").increment(1);
            tracing::error!(
                provider = self.email.provider_name(),
                "Failed to send verification code: {}",
                e
            );
            return Err(AppError::Internal(anyhow::anyhow!(
                "Failed to send verification code"
            )));
        }

        counter!("taita_otp_requests_total", "result" => "sent").increment(1);
        tracing::info!(email = %email, "Verification code sent");

        Ok(OtpRequested {
            message: "Verification code sent".to_string(),
            expires_in: self.config.ttl_secs,
            code: self.config.expose_code.then_some(code),
        })
    }

    /// Check a code and exchange it for a commenter token. A code can be
    /// used once.
    pub async fn verify(&self, input: VerifyOtpInput) -> Result<CommenterToken> {
        input.validate()?;
        let email = normalize_email(&input.email);

        let Some(record) = self.store.load(&email).await? else {
            counter!("taita_otp_verifications_total", "result" => "missing").increment(1);
            return Err(AppError::BadRequest(
                "Invalid or expired verification code".to_string(),
            ));
        };

        if record.is_expired(Utc::now()) {
            self.store.remove(&email).await?;
            counter!("taita_otp_verifications_total", "result" => "expired").increment(1);
            return Err(AppError::BadRequest(
                "Verification code has expired".to_string(),
            ));
        }

        if record.code != input.code.trim() {
            counter!("taita_otp_verifications_total", "result" => "mismatch").increment(1);
            return Err(AppError::BadRequest(
                "Invalid or expired verification code".to_string(),
            ));
        }

        let token = self.jwt.create_commenter_token(&email)?;
        self.store.remove(&email).await?;
        counter!("taita_otp_verifications_total", "result" => "verified").increment(1);

        Ok(CommenterToken {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.commenter_token_ttl(),
            email,
        })
    }
}
