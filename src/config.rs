use crate::constants::*;
use crate::error::{Result, SiteError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub cms: CmsConfig,
    pub email: EmailConfig,
    pub geocode: GeocodeConfig,
    pub images: ImageConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    /// Write token; reads work without it, mutations do not
    pub token: Option<String>,
    /// Overrides `https://{project_id}.api.sanity.io`
    pub api_host: Option<String>,
    pub timeout_seconds: u64,
    pub max_counter_retries: u32,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            project_id: PLACEHOLDER_PROJECT_ID.to_string(),
            dataset: DEFAULT_DATASET.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            use_cdn: false,
            token: None,
            api_host: None,
            timeout_seconds: 10,
            max_counter_retries: 5,
        }
    }
}

impl CmsConfig {
    pub fn is_configured(&self) -> bool {
        !self.project_id.trim().is_empty() && self.project_id != PLACEHOLDER_PROJECT_ID
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub from: String,
    pub community_leaders: Vec<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_EMAIL_API_BASE.to_string(),
            api_key: None,
            from: DEFAULT_EMAIL_FROM.to_string(),
            community_leaders: COMMUNITY_LEADERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocodeConfig {
    pub base_url: String,
    pub user_agent: String,
    pub country: String,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEOCODE_BASE.to_string(),
            user_agent: DEFAULT_GEOCODE_USER_AGENT.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub placeholder: String,
    pub cdn_base: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            placeholder: PLACEHOLDER_IMAGE.to_string(),
            cdn_base: SANITY_CDN_BASE.to_string(),
        }
    }
}

impl Config {
    /// Loads the TOML file at `path` if present, then applies environment
    /// overrides (including a `.env` file).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        dotenv::dotenv().ok();
        let mut config = Self::from_file_or_default(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            SiteError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Overrides values from a variable lookup. Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |keys: &[&str]| {
            keys.iter()
                .filter_map(|k| lookup(*k))
                .map(|v| v.trim().to_string())
                .find(|v| !v.is_empty())
        };

        if let Some(v) = get(&["SANITY_PROJECT_ID", "NEXT_PUBLIC_SANITY_PROJECT_ID"]) {
            self.cms.project_id = v;
        }
        if let Some(v) = get(&["SANITY_DATASET", "NEXT_PUBLIC_SANITY_DATASET"]) {
            self.cms.dataset = v;
        }
        if let Some(v) = get(&["SANITY_API_VERSION", "NEXT_PUBLIC_SANITY_API_VERSION"]) {
            self.cms.api_version = v;
        }
        if let Some(v) = get(&["SANITY_API_TOKEN"]) {
            self.cms.token = Some(v);
        }
        if let Some(v) = get(&["SANITY_API_HOST"]) {
            self.cms.api_host = Some(v);
        }
        if let Some(v) = get(&["RESEND_API_KEY"]) {
            self.email.api_key = Some(v);
        }
        if let Some(v) = get(&["EMAIL_API_BASE"]) {
            self.email.api_base = v;
        }
        if let Some(v) = get(&["GEOCODE_BASE_URL"]) {
            self.geocode.base_url = v;
        }
        if let Some(port) = get(&["PORT"]).and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults_point_at_hosted_services() {
        let config = Config::default();
        assert_eq!(config.cms.dataset, "production");
        assert_eq!(config.cms.api_version, "2023-05-03");
        assert!(!config.cms.is_configured());
        assert_eq!(config.email.community_leaders.len(), 2);
        assert_eq!(config.images.placeholder, "/placeholder-image.png");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_fields() {
        let config = Config::from_toml_str(
            r#"
            [cms]
            project_id = "abc123"
            use_cdn = true

            [geocode]
            country = "CA"
            "#,
        )
        .unwrap();

        assert_eq!(config.cms.project_id, "abc123");
        assert!(config.cms.use_cdn);
        assert!(config.cms.is_configured());
        assert_eq!(config.cms.dataset, "production");
        assert_eq!(config.geocode.country, "CA");
        assert_eq!(config.geocode.user_agent, "EastGateChurch/1.0");
    }

    #[test]
    fn env_overrides_win_and_blank_values_are_skipped() {
        let vars: HashMap<&str, &str> = [
            ("NEXT_PUBLIC_SANITY_PROJECT_ID", "proj42"),
            ("SANITY_DATASET", "  "),
            ("RESEND_API_KEY", "re_test"),
            ("PORT", "8081"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.cms.project_id, "proj42");
        assert_eq!(config.cms.dataset, "production");
        assert_eq!(config.email.api_key.as_deref(), Some("re_test"));
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_file_or_default(dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.cms.project_id, PLACEHOLDER_PROJECT_ID);
    }

    #[test]
    fn reads_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 9000").unwrap();
        let config = Config::from_file_or_default(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(matches!(
            Config::from_toml_str("[cms\nproject_id = 1"),
            Err(SiteError::Toml(_))
        ));
    }
}
