use serde::{Deserialize, Serialize};

/// Geographic center of Nepal, used whenever no better map center is known.
pub const NEPAL_CENTER: Coordinates = Coordinates {
    latitude: 28.3949,
    longitude: 84.1240,
};

/// Camera restriction applied to every map the application renders.
pub const NEPAL_BOUNDS: Bounds = Bounds {
    south_west: Coordinates {
        latitude: 26.3478,
        longitude: 80.0884,
    },
    north_east: Coordinates {
        latitude: 30.4227,
        longitude: 88.2039,
    },
};

/// A WGS84 latitude/longitude pair.
///
/// Rows store latitude and longitude as two nullable columns. The pair is only
/// meaningful when both are present, which is why the domain carries
/// `Option<Coordinates>` rather than two independent options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds coordinates from the two nullable row columns.
    ///
    /// Returns `None` unless both columns hold a value.
    pub fn from_columns(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self::new(latitude, longitude)),
            _ => None,
        }
    }

    /// `true` if latitude is in [-90, 90] and longitude is in [-180, 180].
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Axis-aligned rectangle in latitude/longitude space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: Coordinates,
    pub north_east: Coordinates,
}

impl Bounds {
    /// Smallest bounds containing every point, or `None` for an empty slice.
    pub fn enclosing(points: &[Coordinates]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self {
            south_west: *first,
            north_east: *first,
        };
        for point in &points[1..] {
            bounds.south_west.latitude = bounds.south_west.latitude.min(point.latitude);
            bounds.south_west.longitude = bounds.south_west.longitude.min(point.longitude);
            bounds.north_east.latitude = bounds.north_east.latitude.max(point.latitude);
            bounds.north_east.longitude = bounds.north_east.longitude.max(point.longitude);
        }
        Some(bounds)
    }

    pub fn contains(&self, point: &Coordinates) -> bool {
        (self.south_west.latitude..=self.north_east.latitude).contains(&point.latitude)
            && (self.south_west.longitude..=self.north_east.longitude).contains(&point.longitude)
    }
}
