use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers, used by the haversine formula.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Two viewport bounds are considered equivalent when every edge differs by
/// less than this many degrees (~10 km).
pub const COVERAGE_TOLERANCE_DEG: f64 = 0.1;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Great-circle distance to another coordinate, in kilometers.
    pub fn distance_km(&self, other: &LatLng) -> f64 {
        haversine_km(self, other)
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Great-circle distance between two coordinates using the haversine formula.
///
/// Pure and stateless; shared by the nearby-listings annotation path.
pub fn haversine_km(a: &LatLng, b: &LatLng) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Rounds a distance to one decimal place for reporting.
pub fn rounded_km(distance: f64) -> f64 {
    (distance * 10.0).round() / 10.0
}

/// A rectangular geographic region described by its four edges.
///
/// Wire shape matches the `viewport` query parameter consumed by the listing
/// backend: `{"north": .., "south": .., "east": .., "west": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl ViewportBounds {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Checks that edges are ordered and within world coordinates.
    pub fn is_valid(&self) -> bool {
        self.north > self.south
            && self.north <= 90.0
            && self.south >= -90.0
            && self.east > self.west
            && self.east <= 180.0
            && self.west >= -180.0
    }

    /// Approximate-equivalence test: true when every edge differs by less
    /// than `tolerance` degrees. This is the region-coverage rule, not exact
    /// set containment.
    pub fn nearly_matches(&self, other: &ViewportBounds, tolerance: f64) -> bool {
        (self.north - other.north).abs() < tolerance
            && (self.south - other.south).abs() < tolerance
            && (self.east - other.east).abs() < tolerance
            && (self.west - other.west).abs() < tolerance
    }

    /// Checks if the bounds contain a coordinate
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lng >= self.west
            && point.lng <= self.east
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::new((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_zero_distance() {
        let origin = LatLng::new(0.0, 0.0);
        assert_eq!(haversine_km(&origin, &origin), 0.0);
    }

    #[test]
    fn test_haversine_sf_to_la() {
        let sf = LatLng::new(37.7749, -122.4194);
        let la = LatLng::new(34.0522, -118.2437);
        let distance = haversine_km(&sf, &la);

        // Distance should be approximately 559 km
        assert!((distance - 559.0).abs() < 5.0);
    }

    #[test]
    fn test_rounded_km() {
        assert_eq!(rounded_km(559.1234), 559.1);
        assert_eq!(rounded_km(0.05), 0.1);
    }

    #[test]
    fn test_nearly_matches_is_symmetric() {
        let b1 = ViewportBounds::new(38.0, 37.0, -122.0, -123.0);
        let b2 = ViewportBounds::new(38.09, 37.05, -122.02, -123.07);

        assert!(b1.nearly_matches(&b2, COVERAGE_TOLERANCE_DEG));
        assert!(b2.nearly_matches(&b1, COVERAGE_TOLERANCE_DEG));
    }

    #[test]
    fn test_nearly_matches_rejects_one_far_edge() {
        let b1 = ViewportBounds::new(38.0, 37.0, -122.0, -123.0);
        let b2 = ViewportBounds::new(38.0, 37.0, -122.0, -123.2);

        assert!(!b1.nearly_matches(&b2, COVERAGE_TOLERANCE_DEG));
    }

    #[test]
    fn test_bounds_validation() {
        assert!(ViewportBounds::new(38.0, 37.0, -122.0, -123.0).is_valid());
        // north below south
        assert!(!ViewportBounds::new(37.0, 38.0, -122.0, -123.0).is_valid());
        // east west of west
        assert!(!ViewportBounds::new(38.0, 37.0, -123.0, -122.0).is_valid());
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = ViewportBounds::new(38.0, 37.0, -122.0, -123.0);
        assert!(bounds.contains(&LatLng::new(37.5, -122.5)));
        assert!(!bounds.contains(&LatLng::new(36.5, -122.5)));
    }
}
