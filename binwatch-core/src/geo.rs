//! Haversine distance between two coordinates.

use crate::model::Coordinate;

/// Mean Earth radius used for all distances, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
/// Errors raised by geographic calculations.
pub enum GeoError {
    /// Latitude or longitude is non-finite or outside its valid range.
    #[error("Invalid coordinate ({lat}, {lng})")]
    InvalidCoordinate {
        /// Offending latitude.
        lat: f64,
        /// Offending longitude.
        lng: f64,
    },
}

/// Great-circle distance in meters between `from` and `to`.
///
/// # Errors
///
/// Returns [`GeoError::InvalidCoordinate`] if either point is outside the valid domain.
pub fn distance(from: Coordinate, to: Coordinate) -> Result<f64, GeoError> {
    from.validate()?;
    to.validate()?;

    if from == to {
        return Ok(0.0);
    }

    let from_lat = from.lat.to_radians();
    let to_lat = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let hav = (delta_lat / 2.0).sin().powi(2)
        + from_lat.cos() * to_lat.cos() * (delta_lng / 2.0).sin().powi(2);
    // rounding can push antipodal points slightly above 1
    let hav = hav.clamp(0.0, 1.0);
    let central_angle = 2.0 * hav.sqrt().atan2((1.0 - hav).sqrt());

    Ok(EARTH_RADIUS_METERS * central_angle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lng: f64) -> Coordinate {
        Coordinate { lat, lng }
    }

    #[test]
    fn identical_points_are_zero_apart() {
        let observer = point(21.0932, 78.9816);
        assert_eq!(distance(observer, observer), Ok(0.0));
    }

    #[test]
    fn one_degree_of_latitude() {
        // 1° of arc on a 6 371 km sphere
        let meters = distance(point(0.0, 0.0), point(1.0, 0.0)).expect("valid points");
        assert!((meters - 111_194.93).abs() < 1.0, "got {meters}");
    }

    #[test]
    fn antipodes_are_half_circumference() {
        let meters = distance(point(0.0, 0.0), point(0.0, 180.0)).expect("valid points");
        let half = std::f64::consts::PI * EARTH_RADIUS_METERS;
        assert!((meters - half).abs() < 1e-3, "got {meters}");
    }

    #[test]
    fn seed_bins_are_a_few_hundred_meters_apart() {
        let first = point(21.09499, 78.98026);
        let third = point(21.09388, 78.97609);
        let meters = distance(first, third).expect("valid points");
        assert!(meters > 400.0 && meters < 500.0, "got {meters}");
    }

    #[test]
    fn symmetric() {
        let nagpur = point(21.1458, 79.0882);
        let delhi = point(28.6139, 77.2090);
        let there = distance(nagpur, delhi).expect("valid points");
        let back = distance(delhi, nagpur).expect("valid points");
        assert!((there - back).abs() <= there * 1e-9);
    }

    #[test]
    fn rejects_invalid_coordinates() {
        let valid = point(21.0, 78.0);
        assert_eq!(
            distance(valid, point(999.0, 78.0)),
            Err(GeoError::InvalidCoordinate {
                lat: 999.0,
                lng: 78.0
            })
        );
        assert!(distance(point(f64::NAN, 78.0), valid).is_err());
    }
}
