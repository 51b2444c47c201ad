//! Content shapes read from the CMS.
//!
//! Field names follow the CMS schema (camelCase). Everything a document may
//! omit is optional or defaulted so one sparse document cannot fail a whole
//! list. `image_url` fields are not stored in the CMS; the content service
//! fills them from the raw image reference before a view model leaves the
//! crate.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// GROQ projections return `null` for absent fields; treat that like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    #[serde(default)]
    #[serde(deserialize_with = "null_as_default")]
    pub current: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MinistryDynamic {
    #[serde(rename = "_id")]
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    pub slug: Option<Slug>,
    pub image: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
    pub full_description: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub gallery: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub gallery_urls: Vec<String>,
    pub leaders_info: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub events: Vec<Event>,
    pub contact_info: Option<String>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Testimonial {
    #[serde(rename = "_id")]
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub role: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub testimony: String,
    pub image: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HomeGroup {
    #[serde(rename = "_id")]
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub slug: Option<Slug>,
    pub description: Option<String>,
    pub county: Option<String>,
    pub location_zip: Option<String>,
    pub meeting_day: Option<String>,
    pub meeting_time: Option<String>,
    pub age_group: Option<String>,
    pub leaders: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub image: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sermon {
    #[serde(rename = "_id")]
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub preacher: Option<String>,
    pub date: Option<String>,
    /// `date` as shown on the page, e.g. `May 21, 2023`
    pub display_date: Option<String>,
    pub description: Option<String>,
    pub youtube_url: Option<String>,
    /// Derived from `youtube_url`
    pub youtube_id: Option<String>,
    pub image: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogPost {
    #[serde(rename = "_id")]
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub slug: Option<Slug>,
    pub excerpt: Option<String>,
    pub body: Option<Value>,
    pub published_at: Option<String>,
    /// `published_at` as shown on the page
    pub display_date: Option<String>,
    pub main_image: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
    pub author: Option<String>,
    pub author_image: Option<Value>,
    pub author_image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Mission {
    #[serde(rename = "_id")]
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    pub location: Option<String>,
    pub start_date: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub ongoing: bool,
    pub image: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
    pub contact_person: Option<String>,
    pub donation_link: Option<String>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    #[serde(rename = "_id")]
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// RFC 3339; absent means the date is still to be announced
    pub date: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    pub location: Option<String>,
    pub likes: Option<i64>,
    pub image: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialMedia {
    pub facebook: Option<String>,
    pub instagram: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadershipMember {
    #[serde(rename = "_id")]
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub position: String,
    pub image: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
    pub order: Option<i64>,
    pub social_media: Option<SocialMedia>,
    pub bio: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    #[serde(rename = "_id")]
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub description: Option<String>,
}

/// Lifecycle of a notification request, managed by staff in the CMS
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationStatus {
    #[default]
    New,
    Contacted,
    Added,
    NotInterested,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeGroupNotification {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub area_in_jacksonville: String,
    pub additional_notes: Option<String>,
    pub submitted_at: String,
    pub status: NotificationStatus,
}
