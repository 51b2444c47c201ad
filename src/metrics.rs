//! Prometheus counters for CMS traffic and the form endpoints.

use std::net::SocketAddr;

pub const CMS_QUERIES: &str = "site_cms_queries_total";
pub const CMS_QUERY_FAILURES: &str = "site_cms_query_failures_total";
pub const LIKES: &str = "site_likes_total";
pub const NOTIFICATIONS: &str = "site_notifications_total";
pub const RSVP_EMAILS: &str = "site_rsvp_emails_total";

pub fn init_metrics() {
    let port: u16 = std::env::var("SITE_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(9898);
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => {
            tracing::info!("Prometheus exporter listening on http://{}/metrics", addr);
            SiteMetrics::register_metrics();
        }
        Err(e) => {
            tracing::warn!("Prometheus exporter install failed (possibly already installed): {}", e);
        }
    }
}

pub struct SiteMetrics;

impl SiteMetrics {
    /// Pre-register so every series shows up on /metrics before first use
    pub fn register_metrics() {
        let _ = ::metrics::counter!(CMS_QUERIES);
        let _ = ::metrics::counter!(CMS_QUERY_FAILURES);
        let _ = ::metrics::counter!(LIKES);
        let _ = ::metrics::counter!(NOTIFICATIONS);
        let _ = ::metrics::counter!(RSVP_EMAILS);
    }

    pub fn record_query(query: &'static str) {
        ::metrics::counter!(CMS_QUERIES, "query" => query).increment(1);
    }

    pub fn record_query_failure(query: &'static str) {
        ::metrics::counter!(CMS_QUERY_FAILURES, "query" => query).increment(1);
    }

    pub fn record_like(direction: &'static str) {
        ::metrics::counter!(LIKES, "direction" => direction).increment(1);
    }

    pub fn record_notification(outcome: &'static str) {
        ::metrics::counter!(NOTIFICATIONS, "outcome" => outcome).increment(1);
    }

    pub fn record_rsvp(outcome: &'static str) {
        ::metrics::counter!(RSVP_EMAILS, "outcome" => outcome).increment(1);
    }
}
