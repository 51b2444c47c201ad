use crate::app::ports::{GeoPoint, Geocoder};
use crate::config::GeocodeConfig;
use crate::error::{Result, SiteError};
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Postal-code lookups against a Nominatim-compatible `/search` endpoint.
pub struct NominatimGeocoder {
    http: reqwest::Client,
    base_url: String,
    user_agent: String,
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(http: reqwest::Client, config: &GeocodeConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, postal_code: &str, country: &str) -> Result<Option<GeoPoint>> {
        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .header(USER_AGENT, &self.user_agent)
            .query(&[
                ("postalcode", postal_code),
                ("country", country),
                ("format", "json"),
                ("limit", "1"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            debug!("Geocoder returned {}", response.status());
            return Ok(None);
        }

        let places: Vec<Place> = response
            .json()
            .await
            .map_err(|e| SiteError::Geocode(format!("unexpected response: {e}")))?;

        let point = places.first().and_then(|place| {
            let lon = place.lon.trim().parse::<f64>().ok()?;
            let lat = place.lat.trim().parse::<f64>().ok()?;
            Some(GeoPoint { lon, lat })
        });
        Ok(point)
    }
}
