pub mod mapbox_geocoder;

pub use mapbox_geocoder::MapboxGeocoder;
