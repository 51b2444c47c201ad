use crate::app::ports::{ContentStore, CreateOutcome};
use crate::cms::ContentQuery;
use crate::constants::*;
use crate::error::{Result, SiteError};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

/// In-memory document store for development/testing.
///
/// Documents are kept in their projected shape; queries filter by `_type`
/// and apply the same ordering and windows the CMS queries use.
#[derive(Clone, Default)]
pub struct InMemoryContentStore {
    documents: Arc<Mutex<HashMap<String, Value>>>,
    failing: Arc<Mutex<HashSet<&'static str>>>,
}

#[derive(Clone, Copy)]
enum Direction {
    Asc,
    Desc,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a document as-is. An `_id` is generated when missing.
    pub fn insert(&self, mut document: Value) -> String {
        let id = match document.get("_id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => {
                let id = Uuid::new_v4().to_string();
                document["_id"] = json!(id);
                id
            }
        };
        if document.get("_rev").is_none() {
            document["_rev"] = json!(Uuid::new_v4().to_string());
        }
        self.lock_documents().insert(id.clone(), document);
        id
    }

    pub fn get(&self, id: &str) -> Option<Value> {
        self.lock_documents().get(id).cloned()
    }

    pub fn count_of_type(&self, doc_type: &str) -> usize {
        self.of_type(doc_type).len()
    }

    /// Makes every later query with this name fail, for exercising fallbacks.
    pub fn fail_query(&self, query_name: &'static str) {
        self.failing
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(query_name);
    }

    fn lock_documents(&self) -> std::sync::MutexGuard<'_, HashMap<String, Value>> {
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn of_type(&self, doc_type: &str) -> Vec<Value> {
        self.lock_documents()
            .values()
            .filter(|d| d.get("_type").and_then(Value::as_str) == Some(doc_type))
            .cloned()
            .collect()
    }

    fn sorted(&self, doc_type: &str, field: &str, direction: Direction) -> Vec<Value> {
        let mut docs = self.of_type(doc_type);
        docs.sort_by(|a, b| {
            let ordering = compare_field(a.get(field), b.get(field));
            match direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            }
        });
        docs
    }

    fn by_slug(&self, doc_type: &str, slug: &str) -> Value {
        self.of_type(doc_type)
            .into_iter()
            .find(|d| d.pointer("/slug/current").and_then(Value::as_str) == Some(slug))
            .unwrap_or(Value::Null)
    }

    fn window(docs: Vec<Value>, start: usize, end: usize) -> Value {
        Value::Array(
            docs.into_iter()
                .skip(start)
                .take(end.saturating_sub(start))
                .collect(),
        )
    }
}

/// Numbers and strings compare naturally; absent values sort last.
fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => a.as_str().unwrap_or_default().cmp(b.as_str().unwrap_or_default()),
        },
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn fetch(&self, query: &ContentQuery) -> Result<Value> {
        let failing = self
            .failing
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(query.name());
        if failing {
            return Err(SiteError::Cms {
                status: 503,
                message: format!("query {} is unavailable", query.name()),
            });
        }

        let limit = HOME_SECTION_LIMIT;
        let result = match query {
            ContentQuery::Ministries => Value::Array(self.sorted(MINISTRY_TYPE, "order", Direction::Asc)),
            ContentQuery::Ministry { slug } => self.by_slug(MINISTRY_TYPE, slug),
            ContentQuery::Testimonials => {
                Value::Array(self.sorted(TESTIMONIAL_TYPE, "_createdAt", Direction::Desc))
            }
            ContentQuery::LatestSermons => {
                Self::window(self.sorted(SERMON_TYPE, "date", Direction::Desc), 0, limit)
            }
            ContentQuery::RecentBlogPosts => {
                Self::window(self.sorted(BLOG_POST_TYPE, "publishedAt", Direction::Desc), 0, limit)
            }
            ContentQuery::BlogPosts { start, end } => Self::window(
                self.sorted(BLOG_POST_TYPE, "publishedAt", Direction::Desc),
                *start,
                *end,
            ),
            ContentQuery::BlogPostCount => json!(self.count_of_type(BLOG_POST_TYPE)),
            ContentQuery::BlogPost { slug } => self.by_slug(BLOG_POST_TYPE, slug),
            ContentQuery::Missions => Value::Array(self.sorted(MISSION_TYPE, "order", Direction::Asc)),
            ContentQuery::HomeGroups => Value::Array(self.of_type(HOME_GROUP_TYPE)),
            ContentQuery::Events => Value::Array(self.sorted(EVENT_TYPE, "date", Direction::Asc)),
            ContentQuery::LeadershipTeam => {
                Value::Array(self.sorted(LEADERSHIP_TYPE, "order", Direction::Asc))
            }
            ContentQuery::Categories => Value::Array(self.of_type(CATEGORY_TYPE)),
            ContentQuery::EventLikes { event_id } => self
                .get(event_id)
                .filter(|d| d.get("_type").and_then(Value::as_str) == Some(EVENT_TYPE))
                .unwrap_or(Value::Null),
            ContentQuery::NotificationByEmail { email } => {
                let email = email.to_lowercase();
                self.of_type(NOTIFICATION_TYPE)
                    .into_iter()
                    .find(|d| {
                        d.get("email")
                            .and_then(Value::as_str)
                            .map(|e| e.to_lowercase() == email)
                            .unwrap_or(false)
                    })
                    .unwrap_or(Value::Null)
            }
        };
        Ok(result)
    }

    async fn adjust_event_likes(&self, event_id: &str, delta: i64) -> Result<Option<u64>> {
        let mut documents = self.lock_documents();
        let Some(event) = documents
            .get_mut(event_id)
            .filter(|d| d.get("_type").and_then(Value::as_str) == Some(EVENT_TYPE))
        else {
            return Ok(None);
        };

        let current = event.get(LIKES_FIELD).and_then(Value::as_i64).unwrap_or(0).max(0);
        let updated = current.saturating_add(delta).max(0) as u64;
        event[LIKES_FIELD] = json!(updated);
        event["_rev"] = json!(Uuid::new_v4().to_string());

        debug!("Adjusted likes on {} to {}", event_id, updated);
        Ok(Some(updated))
    }

    async fn create_if_absent(&self, mut document: Value) -> Result<CreateOutcome> {
        let id = document
            .get("_id")
            .and_then(Value::as_str)
            .ok_or_else(|| SiteError::Config("documents created through create_if_absent need an _id".to_string()))?
            .to_string();

        let mut documents = self.lock_documents();
        if documents.contains_key(&id) {
            return Ok(CreateOutcome::AlreadyExists { id });
        }
        document["_createdAt"] = json!(Utc::now().to_rfc3339());
        document["_rev"] = json!(Uuid::new_v4().to_string());
        documents.insert(id.clone(), document);

        debug!("Created document {}", id);
        Ok(CreateOutcome::Created { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn windows_and_orders_blog_posts() {
        let store = InMemoryContentStore::new();
        for day in 1..=5 {
            store.insert(json!({
                "_type": "blogPost",
                "title": format!("post {day}"),
                "publishedAt": format!("2024-01-0{day}T00:00:00Z"),
            }));
        }

        let page = store
            .fetch(&ContentQuery::BlogPosts { start: 1, end: 3 })
            .await
            .unwrap();
        let titles: Vec<&str> = page
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["post 4", "post 3"]);

        let count = store.fetch(&ContentQuery::BlogPostCount).await.unwrap();
        assert_eq!(count, json!(5));
    }

    #[tokio::test]
    async fn undated_order_sorts_last() {
        let store = InMemoryContentStore::new();
        store.insert(json!({ "_id": "b", "_type": "ministryDynamic" }));
        store.insert(json!({ "_id": "a", "_type": "ministryDynamic", "order": 2 }));
        store.insert(json!({ "_id": "c", "_type": "ministryDynamic", "order": 1 }));

        let list = store.fetch(&ContentQuery::Ministries).await.unwrap();
        let ids: Vec<&str> = list.as_array().unwrap().iter().map(|d| d["_id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn likes_never_go_negative() {
        let store = InMemoryContentStore::new();
        store.insert(json!({ "_id": "evt_1", "_type": "event", "likes": 1 }));

        assert_eq!(store.adjust_event_likes("evt_1", -1).await.unwrap(), Some(0));
        assert_eq!(store.adjust_event_likes("evt_1", -1).await.unwrap(), Some(0));
        assert_eq!(store.adjust_event_likes("missing", 1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn create_if_absent_rejects_existing_ids() {
        let store = InMemoryContentStore::new();
        let doc = json!({ "_id": "n1", "_type": "homeGroupNotification" });
        assert_eq!(
            store.create_if_absent(doc.clone()).await.unwrap(),
            CreateOutcome::Created { id: "n1".to_string() }
        );
        assert_eq!(
            store.create_if_absent(doc).await.unwrap(),
            CreateOutcome::AlreadyExists { id: "n1".to_string() }
        );
        assert_eq!(store.count_of_type("homeGroupNotification"), 1);
    }

    #[tokio::test]
    async fn failing_queries_return_errors() {
        let store = InMemoryContentStore::new();
        store.fail_query("events");
        assert!(store.fetch(&ContentQuery::Events).await.is_err());
        assert!(store.fetch(&ContentQuery::Missions).await.is_ok());
    }
}
