//! Turns CMS image references into URLs.
//!
//! Every view model goes through [`ImageResolver`], so there is exactly one
//! fallback policy: anything that cannot be turned into a URL becomes the
//! configured placeholder.

use crate::config::{CmsConfig, ImageConfig};
use serde_json::Value;

/// What an image field in a CMS document turned out to contain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// An asset reference such as `image-Tb9Ew8CX-2000x3000-jpg`
    Asset(AssetRef),
    /// A ready-made URL (string field, `asset.url` or `url`)
    Url(String),
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    pub id: String,
    pub dimensions: String,
    pub format: String,
}

impl AssetRef {
    /// Parses `image-<id>-<W>x<H>-<ext>`. Returns `None` for anything else.
    pub fn parse(reference: &str) -> Option<Self> {
        let rest = reference.strip_prefix("image-")?;
        let mut parts = rest.rsplitn(3, '-');
        let format = parts.next()?;
        let dimensions = parts.next()?;
        let id = parts.next()?;

        let (w, h) = dimensions.split_once('x')?;
        let numeric = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if id.is_empty() || format.is_empty() || !numeric(w) || !numeric(h) {
            return None;
        }

        Some(Self {
            id: id.to_string(),
            dimensions: dimensions.to_string(),
            format: format.to_string(),
        })
    }
}

impl ImageSource {
    pub fn from_value(value: Option<&Value>) -> Self {
        let Some(value) = value else {
            return ImageSource::Missing;
        };

        match value {
            Value::String(s) => Self::url_or_missing(s),
            Value::Object(map) => {
                if let Some(asset) = map.get("asset").and_then(Value::as_object) {
                    if let Some(parsed) = asset
                        .get("_ref")
                        .and_then(Value::as_str)
                        .and_then(AssetRef::parse)
                    {
                        return ImageSource::Asset(parsed);
                    }
                    if let Some(url) = asset.get("url").and_then(Value::as_str) {
                        return Self::url_or_missing(url);
                    }
                }
                match map.get("url").and_then(Value::as_str) {
                    Some(url) => Self::url_or_missing(url),
                    None => ImageSource::Missing,
                }
            }
            _ => ImageSource::Missing,
        }
    }

    fn url_or_missing(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            ImageSource::Missing
        } else {
            ImageSource::Url(trimmed.to_string())
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageResolver {
    cdn_base: String,
    project_id: Option<String>,
    dataset: String,
    placeholder: String,
}

impl ImageResolver {
    pub fn new(cms: &CmsConfig, images: &ImageConfig) -> Self {
        let placeholder = if images.placeholder.trim().is_empty() {
            crate::constants::PLACEHOLDER_IMAGE.to_string()
        } else {
            images.placeholder.clone()
        };
        Self {
            cdn_base: images.cdn_base.trim_end_matches('/').to_string(),
            project_id: cms.is_configured().then(|| cms.project_id.clone()),
            dataset: cms.dataset.clone(),
            placeholder,
        }
    }

    /// Starts a URL builder for an image field.
    pub fn image(&self, value: Option<&Value>) -> ImageUrlBuilder<'_> {
        ImageUrlBuilder {
            resolver: self,
            source: ImageSource::from_value(value),
            params: Vec::new(),
        }
    }

    /// Resolves an image field with no transforms.
    pub fn url(&self, value: Option<&Value>) -> String {
        self.image(value).url()
    }

    fn asset_url(&self, asset: &AssetRef) -> Option<String> {
        let project = self.project_id.as_ref()?;
        Some(format!(
            "{}/{}/{}/{}-{}.{}",
            self.cdn_base, project, self.dataset, asset.id, asset.dimensions, asset.format
        ))
    }
}

/// Chainable transforms, applied only when the source is a CDN asset.
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder<'a> {
    resolver: &'a ImageResolver,
    source: ImageSource,
    params: Vec<(&'static str, String)>,
}

impl<'a> ImageUrlBuilder<'a> {
    fn param(mut self, key: &'static str, value: String) -> Self {
        self.params.retain(|(k, _)| *k != key);
        self.params.push((key, value));
        self
    }

    pub fn width(self, width: u32) -> Self {
        self.param("w", width.to_string())
    }

    pub fn height(self, height: u32) -> Self {
        self.param("h", height.to_string())
    }

    pub fn quality(self, quality: u8) -> Self {
        self.param("q", quality.min(100).to_string())
    }

    pub fn format(self, format: &str) -> Self {
        self.param("fm", format.to_string())
    }

    pub fn fit(self, fit: &str) -> Self {
        self.param("fit", fit.to_string())
    }

    pub fn auto_format(self) -> Self {
        self.param("auto", "format".to_string())
    }

    pub fn url(&self) -> String {
        match &self.source {
            ImageSource::Asset(asset) => match self.resolver.asset_url(asset) {
                Some(base) if self.params.is_empty() => base,
                Some(base) => {
                    let query: Vec<String> =
                        self.params.iter().map(|(k, v)| format!("{k}={v}")).collect();
                    format!("{}?{}", base, query.join("&"))
                }
                None => self.resolver.placeholder.clone(),
            },
            ImageSource::Url(url) => url.clone(),
            ImageSource::Missing => self.resolver.placeholder.clone(),
        }
    }
}
