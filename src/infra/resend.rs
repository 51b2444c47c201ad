use crate::app::ports::{EmailMessage, EmailSender};
use crate::config::EmailConfig;
use crate::error::{Result, SiteError};
use async_trait::async_trait;
use tracing::{info, instrument};

/// Sends plain-text mail through a Resend-compatible `/emails` endpoint.
pub struct ResendMailer {
    http: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
}

impl ResendMailer {
    pub fn new(http: reqwest::Client, config: &EmailConfig) -> Self {
        Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl EmailSender for ResendMailer {
    #[instrument(skip(self, message), fields(subject = %message.subject, recipients = message.to.len()))]
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| SiteError::Email("email API key is not configured".to_string()))?;

        let response = self
            .http
            .post(format!("{}/emails", self.api_base))
            .bearer_auth(api_key)
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SiteError::Email(format!("provider returned {status}: {body}")));
        }

        info!("Email accepted by provider");
        Ok(())
    }
}
