use crate::app::ports::{ContentStore, EmailSender, Geocoder};
use crate::config::Config;
use crate::content::ContentService;
use crate::error::Result;
use crate::images::ImageResolver;
use crate::infra::{NominatimGeocoder, ResendMailer, SanityClient};
use std::sync::Arc;
use std::time::Duration;

/// Shared handles for the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub content: ContentService,
    pub store: Arc<dyn ContentStore>,
    pub mailer: Arc<dyn EmailSender>,
    pub geocoder: Arc<dyn Geocoder>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn ContentStore>,
        mailer: Arc<dyn EmailSender>,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        let images = ImageResolver::new(&config.cms, &config.images);
        Self {
            content: ContentService::new(store.clone(), images),
            store,
            mailer,
            geocoder,
            config: Arc::new(config),
        }
    }

    /// Wires the production adapters: the Sanity client, Resend and Nominatim.
    pub fn from_config(config: Config) -> Result<Self> {
        let store: Arc<dyn ContentStore> = Arc::new(SanityClient::new(config.cms.clone())?);
        Self::with_store(config, store)
    }

    /// Production email and geocoding around a caller-supplied store.
    pub fn with_store(config: Config, store: Arc<dyn ContentStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.cms.timeout_seconds))
            .build()?;
        let mailer = Arc::new(ResendMailer::new(http.clone(), &config.email));
        let geocoder = Arc::new(NominatimGeocoder::new(http, &config.geocode));
        Ok(Self::new(config, store, mailer, geocoder))
    }
}
