use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::handlers;
use crate::state::AppState;

/// Create the HTTP server with the form endpoints and the content API
pub fn create_server(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        // Mutations
        .route(
            "/events/:id/like",
            post(handlers::like_event).delete(handlers::unlike_event),
        )
        .route(
            "/submit-home-group-notification",
            post(handlers::submit_home_group_notification),
        )
        .route("/send-homegroup-rsvp", post(handlers::send_homegroup_rsvp))
        // Page view models
        .route("/content/home", get(handlers::home_page))
        .route("/content/about", get(handlers::about_page))
        .route("/content/events", get(handlers::events_page))
        .route("/content/blog", get(handlers::blog_page))
        .route("/content/blog/:slug", get(handlers::blog_post))
        .route("/content/ministries/:slug", get(handlers::ministry))
        .route("/content/missions", get(handlers::missions))
        .route("/content/home-groups", get(handlers::home_groups))
        .route("/content/home-groups/map", get(handlers::home_groups_map))
        .route("/content/leadership", get(handlers::leadership))
        .route("/content/categories", get(handlers::categories))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state)
}

/// Start the HTTP server on the specified port
pub async fn start_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = create_server(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("HTTP server running on http://localhost:{port}");
    info!("Health check: http://localhost:{port}/health");

    axum::serve(listener, app).await?;
    Ok(())
}
