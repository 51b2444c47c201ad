/// CMS document type names. These must match the schema deployed to the CMS.
pub const EVENT_TYPE: &str = "event";
pub const MINISTRY_TYPE: &str = "ministryDynamic";
pub const TESTIMONIAL_TYPE: &str = "testimonial";
pub const SERMON_TYPE: &str = "sermon";
pub const BLOG_POST_TYPE: &str = "blogPost";
pub const HOME_GROUP_TYPE: &str = "homeGroup";
pub const MISSION_TYPE: &str = "mission";
pub const LEADERSHIP_TYPE: &str = "leadershipTeam";
pub const CATEGORY_TYPE: &str = "category";
pub const NOTIFICATION_TYPE: &str = "homeGroupNotification";

/// Field holding the like counter on event documents
pub const LIKES_FIELD: &str = "likes";

// Number of items shown in the home page's sermon and blog sections
pub const HOME_SECTION_LIMIT: usize = 3;
pub const BLOG_PAGE_SIZE: usize = 9;

// CMS connection defaults
pub const PLACEHOLDER_PROJECT_ID: &str = "placeholder-project-id";
pub const DEFAULT_DATASET: &str = "production";
pub const DEFAULT_API_VERSION: &str = "2023-05-03";
pub const PING_API_VERSION: &str = "2021-06-07";
pub const SANITY_CDN_BASE: &str = "https://cdn.sanity.io/images";

pub const PLACEHOLDER_IMAGE: &str = "/placeholder-image.png";

// Email defaults
pub const DEFAULT_EMAIL_API_BASE: &str = "https://api.resend.com";
pub const DEFAULT_EMAIL_FROM: &str = "noreply@eastgatejax.com";
pub const COMMUNITY_LEADERS: [&str; 2] = [
    "drjoshuatodd@eastgatejax.com",
    "nurbinabr@eastgatejax.com",
];

// Geocoding defaults
pub const DEFAULT_GEOCODE_BASE: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_GEOCODE_USER_AGENT: &str = "EastGateChurch/1.0";
pub const DEFAULT_COUNTRY: &str = "US";

/// Map view centered on Jacksonville, as [longitude, latitude]
pub const MAP_CENTER: [f64; 2] = [-81.5514, 30.246];
pub const MAP_ZOOM: u8 = 9;

pub const DEFAULT_PORT: u16 = 3000;
