use crate::models::{BoundingBox, GeoPoint};

/// Earth's radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1.0 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance between two points
#[inline]
pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    haversine_distance(a.latitude(), a.longitude(), b.latitude(), b.longitude())
}

/// Distance between two optional locations.
///
/// `None` means "distance unknown": at least one side has no location.
/// Callers must not treat it as far away.
#[inline]
pub fn distance_between(a: Option<GeoPoint>, b: Option<GeoPoint>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(distance_km(&a, &b)),
        _ => None,
    }
}

/// Calculate a bounding box around a center point
///
/// Much cheaper than Haversine for pre-filtering.
/// 1° latitude ≈ 111km, 1° longitude ≈ 111km * cos(latitude)
pub fn calculate_bounding_box(center: &GeoPoint, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / 111.0;

    // Near the poles the longitude span degenerates; take the whole circle
    let cos_lat = center.latitude().to_radians().cos().abs();
    let lon_delta = if cos_lat < 1e-6 {
        180.0
    } else {
        (radius_km / (111.0 * cos_lat)).min(180.0)
    };

    BoundingBox {
        min_lat: (center.latitude() - lat_delta).max(-90.0),
        max_lat: (center.latitude() + lat_delta).min(90.0),
        min_lon: center.longitude() - lon_delta,
        max_lon: center.longitude() + lon_delta,
    }
}

/// Check if a point is within a bounding box
///
/// Longitude bounds may extend past ±180 for boxes that cross the
/// antimeridian; the point is tested against its wrapped equivalents too.
#[inline]
pub fn is_within_bounding_box(point: &GeoPoint, bbox: &BoundingBox) -> bool {
    let lat = point.latitude();
    if lat < bbox.min_lat || lat > bbox.max_lat {
        return false;
    }

    let lon = point.longitude();
    [lon, lon - 360.0, lon + 360.0]
        .iter()
        .any(|l| *l >= bbox.min_lon && *l <= bbox.max_lon)
}

/// Round a distance for presentation (two decimals)
#[inline]
pub fn round_km(distance_km: f64) -> f64 {
    (distance_km * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn test_haversine_distance() {
        // Distance from London to Paris (approximately 344 km)
        let distance = haversine_distance(51.5074, -0.1278, 48.8566, 2.3522);
        assert!((distance - 344.0).abs() < 10.0, "Distance should be ~344km, got {}", distance);
    }

    #[test]
    fn test_distance_between_missing_side() {
        let beijing = point(39.9042, 116.4074);
        assert_eq!(distance_between(Some(beijing), None), None);
        assert_eq!(distance_between(None, Some(beijing)), None);
        assert_eq!(distance_between(None, None), None);
    }

    #[test]
    fn test_zero_coordinates_are_real() {
        // Null Island to a point one degree east on the equator, ~111km
        let d = distance_between(Some(point(0.0, 0.0)), Some(point(0.0, 1.0))).unwrap();
        assert!((d - 111.19).abs() < 0.5, "got {}", d);
    }

    #[test]
    fn test_antipodal_points() {
        let d = distance_km(&point(0.0, 0.0), &point(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1.0);
    }

    #[test]
    fn test_bounding_box() {
        let bbox = calculate_bounding_box(&point(40.7128, -74.0060), 10.0);

        assert!(bbox.min_lat < 40.7128);
        assert!(bbox.max_lat > 40.7128);
        assert!(bbox.min_lon < -74.0060);
        assert!(bbox.max_lon > -74.0060);

        // Check approximate size (20km / 111km per degree = ~0.18 degrees)
        let lat_span = bbox.max_lat - bbox.min_lat;
        assert!((lat_span - 0.18).abs() < 0.02, "Lat span should be ~0.18 degrees");
    }

    #[test]
    fn test_point_within_bbox() {
        let bbox = calculate_bounding_box(&point(40.7128, -74.0060), 10.0);

        assert!(is_within_bounding_box(&point(40.7128, -74.0060), &bbox));
        assert!(is_within_bounding_box(&point(40.71, -74.0), &bbox));
        assert!(!is_within_bounding_box(&point(50.0, -80.0), &bbox));
    }

    #[test]
    fn test_bbox_across_antimeridian() {
        let bbox = calculate_bounding_box(&point(0.0, 179.95), 50.0);
        assert!(is_within_bounding_box(&point(0.0, -179.95), &bbox));
    }

    #[test]
    fn test_round_km() {
        assert_eq!(round_km(1.23456), 1.23);
        assert_eq!(round_km(0.0), 0.0);
    }
}
