use crate::cms::ContentQuery;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a create-if-absent write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created { id: String },
    AlreadyExists { id: String },
}

/// The CMS document store, as far as this service needs it.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Runs a read query. Single-document queries yield `Value::Null` when nothing matches.
    async fn fetch(&self, query: &ContentQuery) -> Result<Value>;

    /// Adds `delta` to an event's like count, clamping at zero, as one
    /// conditional update. Returns the stored value, or `None` if the event
    /// does not exist.
    async fn adjust_event_likes(&self, event_id: &str, delta: i64) -> Result<Option<u64>>;

    /// Creates `document` under its `_id` unless a document with that id
    /// already exists.
    async fn create_if_absent(&self, document: Value) -> Result<CreateOutcome>;

    async fn ping(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Best match for a postal code, if any
    async fn geocode(&self, postal_code: &str, country: &str) -> Result<Option<GeoPoint>>;
}
