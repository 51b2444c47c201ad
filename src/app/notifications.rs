//! Home group notification signups.
//!
//! Each email maps to one deterministic document id, so the store rejects a
//! second record for the same address even when two submissions race past the
//! lookup below.

use crate::app::ports::{ContentStore, CreateOutcome};
use crate::cms::ContentQuery;
use crate::constants::NOTIFICATION_TYPE;
use crate::domain::{HomeGroupNotification, NotificationStatus};
use crate::error::ApiError;
use crate::metrics::SiteMetrics;
use chrono::{SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{error, info};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

const DUPLICATE_MESSAGE: &str = "A notification request with this email already exists.";
const FAILURE_MESSAGE: &str = "Failed to save notification request. Please try again.";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub area_in_jacksonville: Option<String>,
    pub additional_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationResponse {
    pub success: bool,
    pub message: String,
    pub id: String,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Document id for a notification request, stable per (lowercased) email.
pub fn notification_id(email: &str) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    format!("{}.{}", NOTIFICATION_TYPE, hex::encode(digest))
}

fn required(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub async fn submit_notification(
    store: &dyn ContentStore,
    form: NotificationForm,
) -> Result<NotificationResponse, ApiError> {
    let (Some(name), Some(email), Some(area)) = (
        required(&form.name),
        required(&form.email),
        required(&form.area_in_jacksonville),
    ) else {
        return Err(ApiError::BadRequest(
            "Name, email, and area in Jacksonville are required.".to_string(),
        ));
    };

    if !is_valid_email(&email) {
        return Err(ApiError::BadRequest(
            "Please provide a valid email address.".to_string(),
        ));
    }
    let email = email.to_lowercase();

    // Catches records created before ids were derived from the email
    let existing = store
        .fetch(&ContentQuery::NotificationByEmail { email: email.clone() })
        .await
        .map_err(|e| {
            error!("Error checking for existing notification request: {}", e);
            ApiError::Internal(FAILURE_MESSAGE.to_string())
        })?;
    if !existing.is_null() {
        SiteMetrics::record_notification("duplicate");
        return Err(ApiError::Conflict(DUPLICATE_MESSAGE.to_string()));
    }

    let notification = HomeGroupNotification {
        name,
        email: email.clone(),
        phone: required(&form.phone),
        area_in_jacksonville: area,
        additional_notes: required(&form.additional_notes),
        submitted_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        status: NotificationStatus::New,
    };

    let mut document = serde_json::to_value(&notification).map_err(|e| {
        error!("Error encoding notification request: {}", e);
        ApiError::Internal(FAILURE_MESSAGE.to_string())
    })?;
    document["_id"] = serde_json::json!(notification_id(&email));
    document["_type"] = serde_json::json!(NOTIFICATION_TYPE);

    match store.create_if_absent(document).await {
        Ok(CreateOutcome::Created { id }) => {
            SiteMetrics::record_notification("created");
            info!("Home group notification saved: {}", id);
            Ok(NotificationResponse {
                success: true,
                message: "Thank you! We'll notify you when home groups are available.".to_string(),
                id,
            })
        }
        Ok(CreateOutcome::AlreadyExists { .. }) => {
            SiteMetrics::record_notification("duplicate");
            Err(ApiError::Conflict(DUPLICATE_MESSAGE.to_string()))
        }
        Err(e) => {
            SiteMetrics::record_notification("failed");
            error!("Error saving home group notification: {}", e);
            Err(ApiError::Internal(FAILURE_MESSAGE.to_string()))
        }
    }
}
