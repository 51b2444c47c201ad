use crate::app::ports::ContentStore;
use crate::error::ApiError;
use crate::metrics::SiteMetrics;
use serde::Serialize;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    Like,
    Unlike,
}

impl LikeAction {
    fn delta(self) -> i64 {
        match self {
            LikeAction::Like => 1,
            LikeAction::Unlike => -1,
        }
    }

    fn label(self) -> &'static str {
        match self {
            LikeAction::Like => "like",
            LikeAction::Unlike => "unlike",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LikeResponse {
    pub success: bool,
    pub likes: u64,
    pub message: String,
}

/// Moves an event's like count by one in the direction of `action`.
pub async fn apply_like(
    store: &dyn ContentStore,
    event_id: &str,
    action: LikeAction,
) -> Result<LikeResponse, ApiError> {
    let event_id = event_id.trim();
    if event_id.is_empty() {
        return Err(ApiError::BadRequest("Event ID is required".to_string()));
    }

    match store.adjust_event_likes(event_id, action.delta()).await {
        Ok(Some(likes)) => {
            SiteMetrics::record_like(action.label());
            info!(event_id, likes, "Event {}d", action.label());
            Ok(LikeResponse {
                success: true,
                likes,
                message: format!("Event {}d successfully", action.label()),
            })
        }
        Ok(None) => Err(ApiError::NotFound("Event not found".to_string())),
        Err(e) => {
            error!("Failed to {} event {}: {}", action.label(), event_id, e);
            Err(ApiError::Internal(format!(
                "Failed to {} event. Please try again.",
                action.label()
            )))
        }
    }
}
