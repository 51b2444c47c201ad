use crate::app::ports::{EmailMessage, EmailSender};
use crate::config::EmailConfig;
use crate::error::ApiError;
use crate::metrics::SiteMetrics;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RsvpForm {
    pub group_id: Option<String>,
    pub group_title: Option<String>,
    pub group_email: Option<String>,
    pub leaders: Option<String>,
    pub zip: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub referral: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RsvpResponse {
    pub success: bool,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Builds the message sent to the group contact and the community leaders.
/// Returns `None` when a required field is missing.
pub fn compose_rsvp_email(form: &RsvpForm, config: &EmailConfig) -> Option<EmailMessage> {
    let group_email = present(&form.group_email)?;
    let name = present(&form.name)?;
    let email = present(&form.email)?;
    let referral = present(&form.referral)?;

    let group_title = present(&form.group_title).unwrap_or_default();
    let zip = present(&form.zip).unwrap_or_default();
    let leaders = present(&form.leaders).unwrap_or_default();
    let phone = present(&form.phone).unwrap_or("-");
    let message = present(&form.message).unwrap_or("-");

    let mut to = vec![group_email.to_string()];
    to.extend(config.community_leaders.iter().cloned());

    let text = format!(
        "A new RSVP has been submitted for the home group \"{group_title}\" (Zip: {zip}).\n\n\
         Name: {name}\nEmail: {email}\nPhone: {phone}\n\
         How did you learn about us?: {referral}\nMessage: {message}\n\n\
         Leaders: {leaders}"
    );

    Some(EmailMessage {
        from: config.from.clone(),
        to,
        subject: format!("New RSVP for Home Group: {group_title}"),
        text,
    })
}

pub async fn send_rsvp(
    mailer: &dyn EmailSender,
    config: &EmailConfig,
    form: RsvpForm,
) -> Result<RsvpResponse, ApiError> {
    let Some(message) = compose_rsvp_email(&form, config) else {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    };

    match mailer.send(&message).await {
        Ok(()) => {
            SiteMetrics::record_rsvp("sent");
            info!(group_id = ?form.group_id, "RSVP email sent");
            Ok(RsvpResponse { success: true })
        }
        Err(e) => {
            SiteMetrics::record_rsvp("failed");
            error!("Error sending RSVP email: {}", e);
            Err(ApiError::Internal("Failed to send email.".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, SiteError};
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Arc<Mutex<Vec<EmailMessage>>>,
        fail: bool,
    }

    #[async_trait]
    impl EmailSender for RecordingMailer {
        async fn send(&self, message: &EmailMessage) -> Result<()> {
            if self.fail {
                return Err(SiteError::Email("provider down".to_string()));
            }
            self.sent.lock().await.push(message.clone());
            Ok(())
        }
    }

    fn complete_form() -> RsvpForm {
        RsvpForm {
            group_id: Some("hg-1".to_string()),
            group_title: Some("Young Adults".to_string()),
            group_email: Some("group@example.org".to_string()),
            leaders: Some("John & Jane".to_string()),
            zip: Some("32207".to_string()),
            name: Some("Sam".to_string()),
            email: Some("sam@example.org".to_string()),
            phone: None,
            referral: Some("A friend".to_string()),
            message: Some("See you there".to_string()),
        }
    }

    #[test]
    fn composes_subject_body_and_recipients() {
        let message = compose_rsvp_email(&complete_form(), &EmailConfig::default()).unwrap();

        assert_eq!(message.subject, "New RSVP for Home Group: Young Adults");
        assert_eq!(message.from, "noreply@eastgatejax.com");
        assert_eq!(
            message.to,
            vec![
                "group@example.org",
                "drjoshuatodd@eastgatejax.com",
                "nurbinabr@eastgatejax.com"
            ]
        );
        assert!(message.text.starts_with(
            "A new RSVP has been submitted for the home group \"Young Adults\" (Zip: 32207).\n\n"
        ));
        assert!(message.text.contains("Phone: -\n"));
        assert!(message.text.contains("How did you learn about us?: A friend\n"));
        assert!(message.text.ends_with("Leaders: John & Jane"));
    }

    #[tokio::test]
    async fn sends_one_email_on_success() {
        let mailer = RecordingMailer::default();
        let response = send_rsvp(&mailer, &EmailConfig::default(), complete_form()).await.unwrap();
        assert!(response.success);
        assert_eq!(mailer.sent.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn missing_fields_send_nothing() {
        let mailer = RecordingMailer::default();
        let mut form = complete_form();
        form.referral = Some(" ".to_string());

        let err = send_rsvp(&mailer, &EmailConfig::default(), form).await.unwrap_err();
        assert_eq!(err, ApiError::BadRequest("Missing required fields".to_string()));
        assert!(mailer.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn provider_failure_is_generic_500() {
        let mailer = RecordingMailer {
            fail: true,
            ..RecordingMailer::default()
        };
        let err = send_rsvp(&mailer, &EmailConfig::default(), complete_form()).await.unwrap_err();
        assert_eq!(err, ApiError::Internal("Failed to send email.".to_string()));
    }
}
