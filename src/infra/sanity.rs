use crate::app::ports::{ContentStore, CreateOutcome};
use crate::cms::ContentQuery;
use crate::config::CmsConfig;
use crate::constants::PING_API_VERSION;
use crate::error::{Result, SiteError};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// HTTP client for a Sanity-compatible content lake.
#[derive(Clone)]
pub struct SanityClient {
    http: reqwest::Client,
    config: CmsConfig,
}

impl SanityClient {
    pub fn new(config: CmsConfig) -> Result<Self> {
        if !config.is_configured() {
            warn!("CMS project id is not set; content queries will fail until it is configured");
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { http, config })
    }

    fn host(&self, for_read: bool) -> String {
        if let Some(host) = &self.config.api_host {
            return host.trim_end_matches('/').to_string();
        }
        let domain = if for_read && self.config.use_cdn {
            "apicdn.sanity.io"
        } else {
            "api.sanity.io"
        };
        format!("https://{}.{}", self.config.project_id, domain)
    }

    fn data_url(&self, endpoint: &str, for_read: bool) -> String {
        format!(
            "{}/v{}/data/{}/{}",
            self.host(for_read),
            self.config.api_version,
            endpoint,
            self.config.dataset
        )
    }

    /// Runs raw GROQ with `$`-prefixed JSON-encoded parameters. `cacheable`
    /// reads may be served from the API CDN when it is enabled.
    pub async fn query_raw(
        &self,
        groq: &str,
        params: &serde_json::Map<String, Value>,
        cacheable: bool,
    ) -> Result<Value> {
        let mut pairs: Vec<(String, String)> = vec![("query".to_string(), groq.to_string())];
        for (key, value) in params {
            pairs.push((format!("${key}"), value.to_string()));
        }

        let mut request = self.http.get(self.data_url("query", cacheable)).query(&pairs);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let body = Self::json_or_error(response).await?;
        Ok(body.get("result").cloned().unwrap_or(Value::Null))
    }

    async fn mutate(&self, mutations: Value) -> Result<Value> {
        let token = self
            .config
            .token
            .as_ref()
            .ok_or_else(|| SiteError::Config("CMS write token is not configured".to_string()))?;

        let response = self
            .http
            .post(self.data_url("mutate", false))
            .query(&[("returnIds", "true")])
            .bearer_auth(token)
            .json(&json!({ "mutations": mutations }))
            .send()
            .await?;
        Self::json_or_error(response).await
    }

    async fn json_or_error(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| {
                    v.pointer("/error/description")
                        .or_else(|| v.pointer("/message"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or(text);
            return Err(SiteError::Cms {
                status: status.as_u16(),
                message,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }
}

fn is_conflict(err: &SiteError) -> bool {
    matches!(err, SiteError::Cms { status, .. } if *status == StatusCode::CONFLICT.as_u16())
}

#[async_trait]
impl ContentStore for SanityClient {
    #[instrument(skip(self, query), fields(query = query.name()))]
    async fn fetch(&self, query: &ContentQuery) -> Result<Value> {
        debug!("Querying CMS");
        // Reads that feed a write must see the latest revision
        let cacheable = !matches!(
            query,
            ContentQuery::EventLikes { .. } | ContentQuery::NotificationByEmail { .. }
        );
        self.query_raw(&query.groq(), &query.params(), cacheable).await
    }

    #[instrument(skip(self))]
    async fn adjust_event_likes(&self, event_id: &str, delta: i64) -> Result<Option<u64>> {
        let lookup = ContentQuery::EventLikes {
            event_id: event_id.to_string(),
        };
        let attempts = self.config.max_counter_retries.max(1);

        for attempt in 1..=attempts {
            let current = self.fetch(&lookup).await?;
            if current.is_null() {
                return Ok(None);
            }

            let revision = current
                .get("_rev")
                .and_then(Value::as_str)
                .ok_or_else(|| SiteError::Cms {
                    status: 200,
                    message: format!("event {event_id} has no revision"),
                })?
                .to_string();
            let likes = current
                .get("likes")
                .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
                .unwrap_or(0)
                .max(0);
            let updated = likes.saturating_add(delta).max(0) as u64;

            let patch = json!([{
                "patch": {
                    "id": event_id,
                    "ifRevisionID": revision,
                    "set": { "likes": updated }
                }
            }]);

            match self.mutate(patch).await {
                Ok(_) => return Ok(Some(updated)),
                Err(e) if is_conflict(&e) => {
                    warn!(attempt, "Event changed while updating likes, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(SiteError::Conflict(format!(
            "likes for event {event_id} kept changing after {attempts} attempts"
        )))
    }

    #[instrument(skip(self, document))]
    async fn create_if_absent(&self, document: Value) -> Result<CreateOutcome> {
        let id = document
            .get("_id")
            .and_then(Value::as_str)
            .ok_or_else(|| SiteError::Config("documents created through create_if_absent need an _id".to_string()))?
            .to_string();

        match self.mutate(json!([{ "create": document }])).await {
            Ok(body) => {
                let created_id = body
                    .pointer("/results/0/id")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or(id);
                Ok(CreateOutcome::Created { id: created_id })
            }
            Err(e) if is_conflict(&e) => Ok(CreateOutcome::AlreadyExists { id }),
            Err(e) => Err(e),
        }
    }

    async fn ping(&self) -> bool {
        let url = format!("{}/v{}/ping", self.host(false), PING_API_VERSION);
        match self.http.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("CMS ping failed: {}", e);
                false
            }
        }
    }
}
