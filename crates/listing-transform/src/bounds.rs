//! Inclusive validity bounds used by the row filters.

/// Inclusive price range `[min, max]`.
///
/// `min <= max` is the caller's responsibility; an inverted range simply
/// retains no rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBounds {
    pub min: f64,
    pub max: f64,
}

impl PriceBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true when `price` lies within the range, both ends included.
    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }

    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }
}

/// Inclusive longitude/latitude box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_longitude: f64,
    pub max_longitude: f64,
    pub min_latitude: f64,
    pub max_latitude: f64,
}

impl GeoBounds {
    /// Returns true when the coordinate lies inside the box, edges included.
    pub fn contains(&self, longitude: f64, latitude: f64) -> bool {
        self.min_longitude <= longitude
            && longitude <= self.max_longitude
            && self.min_latitude <= latitude
            && latitude <= self.max_latitude
    }
}

/// Valid coordinates for New York City listings.
pub const NYC_BOUNDS: GeoBounds = GeoBounds {
    min_longitude: -74.25,
    max_longitude: -73.50,
    min_latitude: 40.5,
    max_latitude: 41.2,
};
