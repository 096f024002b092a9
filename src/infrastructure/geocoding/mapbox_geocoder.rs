use crate::domain::location::Geocoder;
use crate::domain::shared::errors::GatewayError;
use crate::domain::shared::geo::Coordinates;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    place_name: Option<String>,
}

/// Reverse geocoding against the Mapbox places API.
pub struct MapboxGeocoder {
    client: Client,
    base_url: String,
    token: String,
}

impl MapboxGeocoder {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Longitude comes first in the path.
    pub fn reverse_url(&self, at: Coordinates) -> String {
        format!(
            "{}/geocoding/v5/mapbox.places/{},{}.json",
            self.base_url, at.longitude, at.latitude
        )
    }
}

/// First feature's place name, or empty when there is none.
fn first_place_name(collection: FeatureCollection) -> String {
    collection
        .features
        .into_iter()
        .next()
        .and_then(|f| f.place_name)
        .unwrap_or_default()
}

#[async_trait]
impl Geocoder for MapboxGeocoder {
    #[instrument(skip(self), fields(lat = at.latitude, lng = at.longitude))]
    async fn reverse_geocode(&self, at: Coordinates) -> Result<String, GatewayError> {
        let collection = self
            .client
            .get(self.reverse_url(at))
            .query(&[("access_token", self.token.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<FeatureCollection>()
            .await?;

        let name = first_place_name(collection);
        debug!(place = %name, "Reverse geocoded");
        Ok(name)
    }
}
