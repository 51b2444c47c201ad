//! Page-level view models assembled from CMS queries.
//!
//! Every page fetches its sections concurrently. A section whose query fails
//! (transport, CMS error or undecodable payload) is logged and comes back
//! empty; the page itself never fails.

pub mod format;
pub mod map;
pub mod resolve;
pub mod schedule;

use crate::app::ports::ContentStore;
use crate::cms::ContentQuery;
use crate::constants::BLOG_PAGE_SIZE;
use crate::domain::*;
use crate::images::ImageResolver;
use crate::metrics::SiteMetrics;
use chrono::Utc;
use resolve::Resolve;
use schedule::{build_events_page, EventsPage};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePageData {
    pub ministries: Vec<MinistryDynamic>,
    pub testimonials: Vec<Testimonial>,
    pub sermons: Vec<Sermon>,
    pub blog_posts: Vec<BlogPost>,
    pub home_groups: Vec<HomeGroup>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AboutPage {
    pub leadership: Vec<LeadershipMember>,
    pub testimonials: Vec<Testimonial>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPage {
    pub posts: Vec<BlogPost>,
    pub page: usize,
    pub total: usize,
    pub total_pages: usize,
}

#[derive(Clone)]
pub struct ContentService {
    store: Arc<dyn ContentStore>,
    images: ImageResolver,
}

impl ContentService {
    pub fn new(store: Arc<dyn ContentStore>, images: ImageResolver) -> Self {
        Self { store, images }
    }

    async fn run(&self, query: &ContentQuery) -> Option<Value> {
        SiteMetrics::record_query(query.name());
        match self.store.fetch(query).await {
            Ok(value) => Some(value),
            Err(e) => {
                SiteMetrics::record_query_failure(query.name());
                warn!("Error fetching {} from CMS: {}", query.name(), e);
                None
            }
        }
    }

    /// A list section. Items that fail to decode are skipped individually.
    async fn list<T>(&self, query: ContentQuery) -> Vec<T>
    where
        T: DeserializeOwned + Resolve,
    {
        let items = match self.run(&query).await {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => return Vec::new(),
            Some(other) => {
                SiteMetrics::record_query_failure(query.name());
                warn!("Expected a list from {}, got {}", query.name(), other);
                return Vec::new();
            }
        };

        let total = items.len();
        let decoded: Vec<T> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<T>(item) {
                Ok(mut doc) => {
                    doc.resolve(&self.images);
                    Some(doc)
                }
                Err(e) => {
                    warn!("Skipping undecodable {} document: {}", query.name(), e);
                    None
                }
            })
            .collect();
        debug!("{}: {} of {} documents usable", query.name(), decoded.len(), total);
        decoded
    }

    async fn single<T>(&self, query: ContentQuery) -> Option<T>
    where
        T: DeserializeOwned + Resolve,
    {
        let value = self.run(&query).await?;
        if value.is_null() {
            return None;
        }
        match serde_json::from_value::<T>(value) {
            Ok(mut doc) => {
                doc.resolve(&self.images);
                Some(doc)
            }
            Err(e) => {
                SiteMetrics::record_query_failure(query.name());
                warn!("Undecodable {} document: {}", query.name(), e);
                None
            }
        }
    }

    async fn count(&self, query: ContentQuery) -> usize {
        self.run(&query)
            .await
            .and_then(|v| v.as_u64())
            .map(|n| n as usize)
            .unwrap_or(0)
    }

    pub async fn home_page(&self) -> HomePageData {
        let (ministries, testimonials, sermons, blog_posts, home_groups) = tokio::join!(
            self.list(ContentQuery::Ministries),
            self.list(ContentQuery::Testimonials),
            self.list(ContentQuery::LatestSermons),
            self.list(ContentQuery::RecentBlogPosts),
            self.list(ContentQuery::HomeGroups),
        );
        HomePageData {
            ministries,
            testimonials,
            sermons,
            blog_posts,
            home_groups,
        }
    }

    pub async fn about_page(&self) -> AboutPage {
        let (leadership, testimonials) = tokio::join!(
            self.list(ContentQuery::LeadershipTeam),
            self.list(ContentQuery::Testimonials),
        );
        AboutPage {
            leadership,
            testimonials,
        }
    }

    pub async fn events_page(&self) -> EventsPage {
        let events = self.list::<Event>(ContentQuery::Events).await;
        build_events_page(events, Utc::now())
    }

    /// One page of posts, newest first. Pages are 1-based; 0 is read as 1 and
    /// page numbers past the addressable range are capped.
    pub async fn blog_page(&self, page: usize) -> BlogPage {
        let page = page.clamp(1, usize::MAX / BLOG_PAGE_SIZE);
        let start = (page - 1) * BLOG_PAGE_SIZE;
        let end = start.saturating_add(BLOG_PAGE_SIZE);
        let (posts, total) = tokio::join!(
            self.list(ContentQuery::BlogPosts { start, end }),
            self.count(ContentQuery::BlogPostCount),
        );
        BlogPage {
            posts,
            page,
            total,
            total_pages: total.div_ceil(BLOG_PAGE_SIZE),
        }
    }

    pub async fn blog_post(&self, slug: &str) -> Option<BlogPost> {
        self.single(ContentQuery::BlogPost {
            slug: slug.to_string(),
        })
        .await
    }

    pub async fn ministry(&self, slug: &str) -> Option<MinistryDynamic> {
        self.single(ContentQuery::Ministry {
            slug: slug.to_string(),
        })
        .await
    }

    pub async fn missions(&self) -> Vec<Mission> {
        self.list(ContentQuery::Missions).await
    }

    pub async fn home_groups(&self) -> Vec<HomeGroup> {
        self.list(ContentQuery::HomeGroups).await
    }

    pub async fn leadership_team(&self) -> Vec<LeadershipMember> {
        self.list(ContentQuery::LeadershipTeam).await
    }

    pub async fn categories(&self) -> Vec<Category> {
        self.list(ContentQuery::Categories).await
    }

    pub async fn cms_reachable(&self) -> bool {
        self.store.ping().await
    }
}
