use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::warn;

use crate::app::likes::{apply_like, LikeAction, LikeResponse};
use crate::app::notifications::{submit_notification, NotificationForm};
use crate::app::rsvp::{send_rsvp, RsvpForm, RsvpResponse};
use crate::content::map::{home_group_map, MapView};
use crate::content::schedule::EventsPage;
use crate::content::{AboutPage, BlogPage, HomePageData};
use crate::domain::{BlogPost, Category, HomeGroup, LeadershipMember, MinistryDynamic, Mission};
use crate::error::ApiError;
use crate::state::AppState;

/// An unreadable body is treated as an empty form so validation answers with
/// its usual message.
fn form_or_default<T: Default>(body: Result<Json<T>, JsonRejection>) -> T {
    match body {
        Ok(Json(form)) => form,
        Err(rejection) => {
            warn!("Unreadable request body: {}", rejection);
            T::default()
        }
    }
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let cms_reachable = state.content.cms_reachable().await;
    Json(serde_json::json!({
        "status": "healthy",
        "service": "eastgate-site",
        "version": env!("CARGO_PKG_VERSION"),
        "cms_reachable": cms_reachable,
    }))
}

pub async fn like_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<LikeResponse>, ApiError> {
    apply_like(state.store.as_ref(), &event_id, LikeAction::Like)
        .await
        .map(Json)
}

pub async fn unlike_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<LikeResponse>, ApiError> {
    apply_like(state.store.as_ref(), &event_id, LikeAction::Unlike)
        .await
        .map(Json)
}

pub async fn submit_home_group_notification(
    State(state): State<AppState>,
    body: Result<Json<NotificationForm>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let response = submit_notification(state.store.as_ref(), form_or_default(body)).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn send_homegroup_rsvp(
    State(state): State<AppState>,
    body: Result<Json<RsvpForm>, JsonRejection>,
) -> Result<Json<RsvpResponse>, ApiError> {
    send_rsvp(state.mailer.as_ref(), &state.config.email, form_or_default(body))
        .await
        .map(Json)
}

pub async fn home_page(State(state): State<AppState>) -> Json<HomePageData> {
    Json(state.content.home_page().await)
}

pub async fn about_page(State(state): State<AppState>) -> Json<AboutPage> {
    Json(state.content.about_page().await)
}

pub async fn events_page(State(state): State<AppState>) -> Json<EventsPage> {
    Json(state.content.events_page().await)
}

#[derive(Debug, Default, Deserialize)]
pub struct BlogParams {
    page: Option<String>,
}

pub async fn blog_page(
    State(state): State<AppState>,
    Query(params): Query<BlogParams>,
) -> Json<BlogPage> {
    let page = params
        .page
        .as_deref()
        .and_then(|p| p.trim().parse::<usize>().ok())
        .unwrap_or(1);
    Json(state.content.blog_page(page).await)
}

pub async fn blog_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, ApiError> {
    state
        .content
        .blog_post(&slug)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Blog post not found".to_string()))
}

pub async fn ministry(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<MinistryDynamic>, ApiError> {
    state
        .content
        .ministry(&slug)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Ministry not found".to_string()))
}

pub async fn missions(State(state): State<AppState>) -> Json<Vec<Mission>> {
    Json(state.content.missions().await)
}

pub async fn home_groups(State(state): State<AppState>) -> Json<Vec<HomeGroup>> {
    Json(state.content.home_groups().await)
}

pub async fn home_groups_map(State(state): State<AppState>) -> Json<MapView> {
    let groups = state.content.home_groups().await;
    let view = home_group_map(state.geocoder.as_ref(), &groups, &state.config.geocode.country).await;
    Json(view)
}

pub async fn leadership(State(state): State<AppState>) -> Json<Vec<LeadershipMember>> {
    Json(state.content.leadership_team().await)
}

pub async fn categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.content.categories().await)
}
