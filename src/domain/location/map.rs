use crate::domain::shared::geo::{Bounds, Coordinates, NEPAL_BOUNDS, NEPAL_CENTER};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ZOOM: f64 = 7.0;
pub const DEFAULT_MIN_ZOOM: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerId(pub u64);

/// A fixed, labeled marker on a read-only map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPin {
    pub coordinates: Coordinates,
    pub label: String,
}

/// Initial camera and restrictions for a map surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapOptions {
    pub center: Coordinates,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_bounds: Option<Bounds>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: NEPAL_CENTER,
            zoom: DEFAULT_ZOOM,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_bounds: Some(NEPAL_BOUNDS),
        }
    }
}

impl MapOptions {
    pub fn centered_on(center: Coordinates) -> Self {
        Self {
            center,
            ..Self::default()
        }
    }
}

/// Pointer input forwarded from the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    MapClick(Coordinates),
    MarkerDragEnd { marker: MarkerId, at: Coordinates },
}

/// The slice of a mapping SDK the picker drives.
#[cfg_attr(test, mockall::automock)]
pub trait MapSurface: Send {
    fn set_camera(&mut self, center: Coordinates, zoom: f64);

    fn restrict_camera(&mut self, bounds: Option<Bounds>, min_zoom: f64);

    fn place_marker(&mut self, at: Coordinates, label: Option<String>, draggable: bool)
    -> MarkerId;

    fn move_marker(&mut self, marker: MarkerId, to: Coordinates);

    /// Enables or disables every pointer-driven camera and marker mutation
    /// (pan, zoom, rotate, click, drag).
    fn set_interactive(&mut self, interactive: bool);

    fn fit_bounds(&mut self, bounds: Bounds);
}
