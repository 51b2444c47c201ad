use crate::constants::HOME_SECTION_LIMIT;
use serde_json::{json, Map, Value};

/// The fixed set of reads the site performs against the CMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentQuery {
    Ministries,
    Ministry { slug: String },
    Testimonials,
    LatestSermons,
    RecentBlogPosts,
    /// Posts in the half-open window `[start, end)`, newest first
    BlogPosts { start: usize, end: usize },
    BlogPostCount,
    BlogPost { slug: String },
    Missions,
    HomeGroups,
    Events,
    LeadershipTeam,
    Categories,
    EventLikes { event_id: String },
    NotificationByEmail { email: String },
}

impl ContentQuery {
    /// Short label for logs and metrics
    pub fn name(&self) -> &'static str {
        match self {
            ContentQuery::Ministries => "ministries",
            ContentQuery::Ministry { .. } => "ministry",
            ContentQuery::Testimonials => "testimonials",
            ContentQuery::LatestSermons => "sermons",
            ContentQuery::RecentBlogPosts => "recent_blog_posts",
            ContentQuery::BlogPosts { .. } => "blog_posts",
            ContentQuery::BlogPostCount => "blog_post_count",
            ContentQuery::BlogPost { .. } => "blog_post",
            ContentQuery::Missions => "missions",
            ContentQuery::HomeGroups => "home_groups",
            ContentQuery::Events => "events",
            ContentQuery::LeadershipTeam => "leadership_team",
            ContentQuery::Categories => "categories",
            ContentQuery::EventLikes { .. } => "event_likes",
            ContentQuery::NotificationByEmail { .. } => "notification_by_email",
        }
    }

    pub fn groq(&self) -> String {
        match self {
            ContentQuery::Ministries => r#"*[_type == "ministryDynamic"] | order(order asc) {
  _id, title, description, image, slug
}"#
            .to_string(),
            ContentQuery::Ministry { .. } => r#"*[_type == "ministryDynamic" && slug.current == $slug][0] {
  _id, title, description, fullDescription, image, gallery, leadersInfo, events, contactInfo
}"#
            .to_string(),
            ContentQuery::Testimonials => r#"*[_type == "testimonial"] | order(_createdAt desc) {
  _id, name, role, testimony, image
}"#
            .to_string(),
            ContentQuery::LatestSermons => format!(
                r#"*[_type == "sermon"] | order(date desc) [0...{HOME_SECTION_LIMIT}] {{
  _id, title, preacher, date, description, youtubeUrl, image
}}"#
            ),
            ContentQuery::RecentBlogPosts => format!(
                r#"*[_type == "blogPost"] | order(publishedAt desc) [0...{HOME_SECTION_LIMIT}] {{
  _id, title, slug, excerpt, publishedAt, mainImage,
  "categories": categories[]->title,
  "author": author->name
}}"#
            ),
            ContentQuery::BlogPosts { .. } => r#"*[_type == "blogPost"] | order(publishedAt desc) [$start...$end] {
  _id, title, slug, excerpt, publishedAt, mainImage,
  "categories": categories[]->title,
  "author": author->name
}"#
            .to_string(),
            ContentQuery::BlogPostCount => r#"count(*[_type == "blogPost"])"#.to_string(),
            ContentQuery::BlogPost { .. } => r#"*[_type == "blogPost" && slug.current == $slug][0] {
  _id, title, slug, body, publishedAt, mainImage,
  "categories": categories[]->title,
  "author": author->name,
  "authorImage": author->image
}"#
            .to_string(),
            ContentQuery::Missions => r#"*[_type == "mission"] | order(order asc) {
  _id, title, description, location, startDate, ongoing, image, contactPerson, donationLink
}"#
            .to_string(),
            ContentQuery::HomeGroups => r#"*[_type == "homeGroup"] {
  _id, title, slug, description, county, locationZip, meetingDay, meetingTime,
  ageGroup, leaders, contactEmail, contactPhone, image
}"#
            .to_string(),
            ContentQuery::Events => r#"*[_type == "event"] | order(date asc) {
  _id, name, date, description, location, likes, image
}"#
            .to_string(),
            ContentQuery::LeadershipTeam => r#"*[_type == "leadershipTeam"] | order(order asc) {
  _id, name, position, image, order, socialMedia, bio
}"#
            .to_string(),
            ContentQuery::Categories => r#"*[_type == "category"] {
  _id, title, description
}"#
            .to_string(),
            ContentQuery::EventLikes { .. } => {
                r#"*[_type == "event" && _id == $eventId][0] { _id, _rev, likes }"#.to_string()
            }
            ContentQuery::NotificationByEmail { .. } => {
                r#"*[_type == "homeGroupNotification" && lower(email) == $email][0] { _id }"#
                    .to_string()
            }
        }
    }

    /// Query parameters, keyed without the leading `$`
    pub fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        match self {
            ContentQuery::Ministry { slug } | ContentQuery::BlogPost { slug } => {
                params.insert("slug".to_string(), json!(slug));
            }
            ContentQuery::BlogPosts { start, end } => {
                params.insert("start".to_string(), json!(start));
                params.insert("end".to_string(), json!(end));
            }
            ContentQuery::EventLikes { event_id } => {
                params.insert("eventId".to_string(), json!(event_id));
            }
            ContentQuery::NotificationByEmail { email } => {
                params.insert("email".to_string(), json!(email.to_lowercase()));
            }
            _ => {}
        }
        params
    }
}
