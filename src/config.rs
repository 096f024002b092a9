//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured by the binary before
//! this runs.
//!
//! # Environment Variables
//!
//! ## Required Variables
//! - `BACKEND_URL`: Base URL of the hosted backend (REST, storage, realtime)
//! - `BACKEND_ANON_KEY`: Public project key sent with every request
//!
//! ## Optional Variables
//! - `RUST_LOG`: Logging level (default: "info,relief_desk=debug")
//! - `BACKEND_TIMEOUT_SECONDS`: HTTP transport timeout (default: 15)
//! - `STORAGE_BUCKET`: Bucket for report images (default: "disaster-images")
//! - `MAPBOX_TOKEN`: Enables reverse geocoding when set
//! - `GEOCODING_URL`: Geocoding API base (default: "https://api.mapbox.com")
//! - `DEFAULT_MAP_LAT` / `DEFAULT_MAP_LNG`: Fallback map center (default: 28.3949 / 84.1240)
//! - `RELIEF_USER_ID` / `RELIEF_ACCESS_TOKEN`: Signed-in session for posting;
//!   both must be set, otherwise the client runs anonymously

use crate::domain::session::Session;
use crate::domain::shared::geo::{Coordinates, NEPAL_CENTER};
use crate::domain::shared::ids::UserId;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Backend base URL, without trailing slash (e.g. `https://xyz.supabase.co`)
    pub backend_url: String,

    /// Public project key; safe to ship in clients
    pub backend_anon_key: String,

    pub backend_timeout_seconds: u64,

    pub storage_bucket: String,

    /// Geocoding is skipped entirely when absent
    pub mapbox_token: Option<String>,

    pub geocoding_url: String,

    pub default_map_lat: f64,

    pub default_map_lng: f64,

    pub user_id: Option<String>,

    pub access_token: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self {
            backend_url: env_required("BACKEND_URL")?,
            backend_anon_key: env_required("BACKEND_ANON_KEY")?,
            backend_timeout_seconds: env_or("BACKEND_TIMEOUT_SECONDS", 15)?,
            storage_bucket: env_or("STORAGE_BUCKET", "disaster-images".to_string())?,
            mapbox_token: env_optional("MAPBOX_TOKEN"),
            geocoding_url: env_or("GEOCODING_URL", "https://api.mapbox.com".to_string())?,
            default_map_lat: env_or("DEFAULT_MAP_LAT", NEPAL_CENTER.latitude)?,
            default_map_lng: env_or("DEFAULT_MAP_LNG", NEPAL_CENTER.longitude)?,
            user_id: env_optional("RELIEF_USER_ID"),
            access_token: env_optional("RELIEF_ACCESS_TOKEN"),
        };

        if !config.default_map_center().is_valid() {
            anyhow::bail!(
                "DEFAULT_MAP_LAT/DEFAULT_MAP_LNG out of range: {}, {}",
                config.default_map_lat,
                config.default_map_lng
            );
        }
        Ok(config)
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_seconds)
    }

    pub fn default_map_center(&self) -> Coordinates {
        Coordinates::new(self.default_map_lat, self.default_map_lng)
    }

    /// The configured session, if both halves are present.
    pub fn session(&self) -> Option<Session> {
        match (&self.user_id, &self.access_token) {
            (Some(user_id), Some(token)) => Some(Session::new(UserId::new(user_id.as_str()), token.as_str())),
            _ => None,
        }
    }
}

fn env_required(key: &str) -> anyhow::Result<String> {
    std::env::var(key).map_err(|_| anyhow::anyhow!("Missing required environment variable: {}", key))
}

fn env_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}
