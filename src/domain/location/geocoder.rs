use crate::domain::shared::errors::GatewayError;
use crate::domain::shared::geo::Coordinates;
use async_trait::async_trait;
use tracing::warn;

/// Turns a point into a human-readable place name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn reverse_geocode(&self, at: Coordinates) -> Result<String, GatewayError>;
}

/// Best-effort lookup: any failure yields an empty name.
pub async fn place_name_or_empty(geocoder: &dyn Geocoder, at: Coordinates) -> String {
    match geocoder.reverse_geocode(at).await {
        Ok(name) => name,
        Err(e) => {
            warn!(error = %e, lat = at.latitude, lng = at.longitude, "Reverse geocoding failed");
            String::new()
        }
    }
}
