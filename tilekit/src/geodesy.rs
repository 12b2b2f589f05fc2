//! Great-circle calculations on a spherical Earth model.
//!
//! All functions assume the sphere of radius [`EQUATORIAL_RADIUS`] that Web
//! Mercator is defined on, so distances computed here are consistent with
//! the projected coordinates in [`crate::mercator`].

use crate::position::Wgs84;

/// Equatorial radius (half major axis) of the WGS84 ellipsoid, in meters.
pub const EQUATORIAL_RADIUS: f64 = 6_378_137.0;
pub const EQUATORIAL_DIAMETER: f64 = 2. * EQUATORIAL_RADIUS;
pub const HALF_EQUATORIAL_PERIMETER: f64 = std::f64::consts::PI * EQUATORIAL_RADIUS;
pub const EQUATORIAL_PERIMETER: f64 = 2. * HALF_EQUATORIAL_PERIMETER;

/// The haversine function, `0.5 * (1 - cos theta)`.
pub fn haversine(theta: f64) -> f64 {
    0.5 * (1. - theta.cos())
}

/// Great-circle distance between two coordinates, in meters.
/// <https://en.wikipedia.org/wiki/Haversine_formula>
///
/// Feeding it invalid (NaN) coordinates is a caller error and yields NaN,
/// not zero.
pub fn distance(a: Wgs84, b: Wgs84) -> f64 {
    let latitude1 = a.latitude().to_radians();
    let latitude2 = b.latitude().to_radians();

    let delta_latitude = (b.latitude() - a.latitude()).to_radians();
    let delta_longitude = (b.longitude() - a.longitude()).to_radians();

    let f = haversine(delta_latitude)
        + latitude1.cos() * latitude2.cos() * haversine(delta_longitude);

    EQUATORIAL_DIAMETER * f.sqrt().asin()
}

/// Initial bearing (azimuth) from `a` to `b` along the great-circle,
/// as a compass angle in [0, 360).
pub fn bearing(a: Wgs84, b: Wgs84) -> f64 {
    let delta_longitude = (b.longitude() - a.longitude()).to_radians();
    let latitude1 = a.latitude().to_radians();
    let latitude2 = b.latitude().to_radians();

    let y = delta_longitude.sin() * latitude2.cos();
    let x = latitude1.cos() * latitude2.sin()
        - latitude1.sin() * latitude2.cos() * delta_longitude.cos();
    let theta = y.atan2(x).to_degrees();

    // atan2 lands in [-180, 180]; floor decomposition keeps the fraction
    // in [0, 1), so moving the whole part into compass range is enough.
    let whole = theta.floor();
    let fraction = theta - whole;
    f64::from((whole as i32 + 360) % 360) + fraction
}

/// The coordinate reached by traveling `distance` meters from `origin` at
/// the given compass `bearing`, along a great-circle.
/// <http://www.movable-type.co.uk/scripts/latlong.html>
pub fn destination(origin: Wgs84, distance: f64, bearing: f64) -> Wgs84 {
    let latitude1 = origin.latitude().to_radians();
    let longitude1 = origin.longitude().to_radians();
    let azimuth = bearing.to_radians();

    let delta = distance / EQUATORIAL_RADIUS;

    let latitude2 = (latitude1.sin() * delta.cos()
        + latitude1.cos() * delta.sin() * azimuth.cos())
    .asin();
    let longitude2 = longitude1
        + (azimuth.sin() * delta.sin() * latitude1.cos())
            .atan2(delta.cos() - latitude1.sin() * latitude2.sin());

    let mut longitude = longitude2.to_degrees();
    if longitude > 180. {
        longitude -= 360.;
    } else if longitude < -180. {
        longitude += 360.;
    }

    // The math cannot escape the domain, save for rounding at the fringe.
    Wgs84::new(longitude, latitude2.to_degrees().clamp(-90., 90.)).unwrap_or_else(|_| Wgs84::invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn paris() -> Wgs84 {
        Wgs84::new(2.3522, 48.8566).unwrap()
    }

    fn london() -> Wgs84 {
        Wgs84::new(-0.1276, 51.5072).unwrap()
    }

    #[test]
    fn distance_paris_to_london() {
        assert_relative_eq!(distance(paris(), london()), 343_914.7, epsilon = 0.1);
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_itself() {
        assert_eq!(distance(paris(), paris()), 0.);
        assert_relative_eq!(distance(paris(), london()), distance(london(), paris()));
    }

    #[test]
    fn bearing_is_a_compass_angle() {
        assert_relative_eq!(bearing(paris(), london()), 330.021094, epsilon = 1e-6);
        assert_relative_eq!(bearing(london(), paris()), 148.115775, epsilon = 1e-6);

        // Cardinal directions.
        let origin = Wgs84::new(0., 0.).unwrap();
        assert_relative_eq!(bearing(origin, Wgs84::new(0., 1.).unwrap()), 0.);
        assert_relative_eq!(bearing(origin, Wgs84::new(1., 0.).unwrap()), 90.);
        assert_relative_eq!(bearing(origin, Wgs84::new(0., -1.).unwrap()), 180.);
        assert_relative_eq!(bearing(origin, Wgs84::new(-1., 0.).unwrap()), 270.);
    }

    #[test]
    fn bearing_just_west_of_north_stays_a_compass_angle() {
        let origin = Wgs84::new(0., 0.).unwrap();
        let almost_north = Wgs84::new(-0.01, 1.).unwrap();

        let bearing = bearing(origin, almost_north);
        assert!((0. ..360.).contains(&bearing), "bearing was {bearing}");
        assert_relative_eq!(bearing, 360. - 0.572881, epsilon = 1e-6);
    }

    #[test]
    fn bearing_stays_in_range() {
        let coordinates = [
            Wgs84::new(2.3522, 48.8566).unwrap(),
            Wgs84::new(-0.1276, 51.5072).unwrap(),
            Wgs84::new(139.6917, 35.6895).unwrap(),
            Wgs84::new(-70.6693, -33.4489).unwrap(),
            Wgs84::new(18.4241, -33.9249).unwrap(),
        ];
        for a in &coordinates {
            for b in &coordinates {
                if a != b {
                    let bearing = bearing(*a, *b);
                    assert!((0. ..360.).contains(&bearing), "bearing was {bearing}");
                }
            }
        }
    }

    #[test]
    fn destination_100km_north_of_paris() {
        let reached = destination(paris(), 100_000., 0.);
        assert_relative_eq!(reached.longitude(), 2.3522, epsilon = 1e-9);
        assert_relative_eq!(reached.latitude(), 49.754915, epsilon = 1e-6);
    }

    #[test]
    fn destination_wraps_longitude_across_the_antimeridian() {
        let origin = Wgs84::new(179.9, 0.).unwrap();
        let reached = destination(origin, 50_000., 90.);
        assert_relative_eq!(reached.longitude(), -179.650842, epsilon = 1e-6);
        assert_relative_eq!(reached.latitude(), 0., epsilon = 1e-9);
    }

    #[test]
    fn destination_inverts_distance_and_bearing() {
        let reached = destination(paris(), 343_914.7, 330.021094);
        assert_relative_eq!(reached.longitude(), london().longitude(), epsilon = 1e-4);
        assert_relative_eq!(reached.latitude(), london().latitude(), epsilon = 1e-4);
    }
}
