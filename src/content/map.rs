use crate::app::ports::Geocoder;
use crate::constants::{MAP_CENTER, MAP_ZOOM};
use crate::domain::HomeGroup;
use futures::future::join_all;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub id: String,
    /// [longitude, latitude]
    pub position: [f64; 2],
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: [f64; 2],
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
}

fn marker_description(group: &HomeGroup) -> String {
    let when = [group.meeting_day.as_deref(), group.meeting_time.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    match group.county.as_deref() {
        Some(county) if !when.is_empty() => format!("{county} · {when}"),
        Some(county) => county.to_string(),
        None => when,
    }
}

/// Geocodes every group's zip concurrently. Groups without a zip, or whose
/// zip does not resolve, are left off the map.
pub async fn home_group_map(geocoder: &dyn Geocoder, groups: &[HomeGroup], country: &str) -> MapView {
    let lookups = groups.iter().map(|group| async move {
        let zip = group.location_zip.as_deref().map(str::trim).filter(|z| !z.is_empty())?;
        match geocoder.geocode(zip, country).await {
            Ok(Some(point)) => Some(MapMarker {
                id: group.id.clone(),
                position: [point.lon, point.lat],
                title: group.title.clone(),
                description: marker_description(group),
            }),
            Ok(None) => None,
            Err(e) => {
                warn!("Geocoding zip {} for group {} failed: {}", zip, group.id, e);
                None
            }
        }
    });

    let markers = join_all(lookups).await.into_iter().flatten().collect();
    MapView {
        center: MAP_CENTER,
        zoom: MAP_ZOOM,
        markers,
    }
}
