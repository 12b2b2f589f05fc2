//! Project WGS84 coordinates into the planar spaces used by web maps.
//! <https://en.wikipedia.org/wiki/Web_Mercator_projection>
//!
//! Three planar systems live here, all defined on the sphere of radius
//! [`EQUATORIAL_RADIUS`]:
//!
//! * [`WebMercator`] — meters, origin at (0° E, 0° N), y grows northward.
//! * [`PseudoWebMercator`] — meters, origin at the top-left corner of the
//!   world map, y grows southward.
//! * [`NormalizedWebMercator`] — the unit square, the native coordinate
//!   space of a tile pyramid.
//!
//! Conversions are pure functions. Any NaN input stays NaN in the output.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use geo_types::Point;

use crate::geodesy::{EQUATORIAL_PERIMETER, EQUATORIAL_RADIUS, HALF_EQUATORIAL_PERIMETER};
use crate::position::{nan_or_fuzzy_eq, Wgs84};

/// Planar coordinate in meters: `x = R*lon`, `y = R*ln(tan(lat/2 + pi/4))`
/// with angles in radians.
///
/// The on-map domain is `[-pi*R, pi*R]` on both axes; values outside it are
/// representable and denote off-map points.
#[derive(Debug, Clone, Copy)]
pub struct WebMercator(Point);

impl WebMercator {
    pub fn new(x: f64, y: f64) -> Self {
        Self(Point::new(x, y))
    }

    pub fn x(&self) -> f64 {
        self.0.x()
    }

    pub fn y(&self) -> f64 {
        self.0.y()
    }

    /// Whether the point lies within the projected world map.
    pub fn is_on_map(&self) -> bool {
        self.x().abs() <= HALF_EQUATORIAL_PERIMETER && self.y().abs() <= HALF_EQUATORIAL_PERIMETER
    }

    pub fn wgs84(&self) -> Wgs84 {
        let longitude = self.x() / EQUATORIAL_RADIUS;
        let latitude = 2. * (self.y() / EQUATORIAL_RADIUS).exp().atan() - FRAC_PI_2;

        Wgs84::new_unchecked(longitude.to_degrees(), latitude.to_degrees())
    }

    pub fn pseudo_web_mercator(&self) -> PseudoWebMercator {
        PseudoWebMercator::new(
            self.x() + HALF_EQUATORIAL_PERIMETER,
            HALF_EQUATORIAL_PERIMETER - self.y(),
        )
    }

    pub fn normalized_web_mercator(&self) -> NormalizedWebMercator {
        NormalizedWebMercator::new(
            (self.x() + HALF_EQUATORIAL_PERIMETER) / EQUATORIAL_PERIMETER,
            (HALF_EQUATORIAL_PERIMETER - self.y()) / EQUATORIAL_PERIMETER,
        )
    }
}

impl PartialEq for WebMercator {
    fn eq(&self, other: &Self) -> bool {
        nan_or_fuzzy_eq(self.x(), other.x()) && nan_or_fuzzy_eq(self.y(), other.y())
    }
}

/// [`WebMercator`] with the origin shifted to the top-left corner of the
/// world map: `x` in `[0, 2*pi*R]` eastward, `y` in `[0, 2*pi*R]` southward.
///
/// Construction normalizes out-of-domain input instead of rejecting it:
/// `x` wraps around the antimeridian, `y` clamps to the map edge.
#[derive(Debug, Clone, Copy)]
pub struct PseudoWebMercator(Point);

impl PseudoWebMercator {
    pub fn new(x: f64, y: f64) -> Self {
        Self(Point::new(
            x.rem_euclid(EQUATORIAL_PERIMETER),
            y.clamp(0., EQUATORIAL_PERIMETER),
        ))
    }

    pub fn x(&self) -> f64 {
        self.0.x()
    }

    pub fn y(&self) -> f64 {
        self.0.y()
    }

    pub fn wgs84(&self) -> Wgs84 {
        self.web_mercator().wgs84()
    }

    pub fn web_mercator(&self) -> WebMercator {
        WebMercator::new(
            self.x() - HALF_EQUATORIAL_PERIMETER,
            HALF_EQUATORIAL_PERIMETER - self.y(),
        )
    }

    pub fn normalized_web_mercator(&self) -> NormalizedWebMercator {
        NormalizedWebMercator::new(
            self.x() / EQUATORIAL_PERIMETER,
            self.y() / EQUATORIAL_PERIMETER,
        )
    }
}

impl PartialEq for PseudoWebMercator {
    fn eq(&self, other: &Self) -> bool {
        nan_or_fuzzy_eq(self.x(), other.x()) && nan_or_fuzzy_eq(self.y(), other.y())
    }
}

/// Web Mercator rescaled to the unit square. `x` grows eastward, `y` grows
/// southward (image convention), so (0, 0) is the north-west corner of the
/// world and (1, 1) the south-east one.
///
/// Out-of-range construction yields NaN components.
#[derive(Debug, Clone, Copy)]
pub struct NormalizedWebMercator(Point);

impl NormalizedWebMercator {
    pub fn new(x: f64, y: f64) -> Self {
        if (0. ..=1.).contains(&x) && (0. ..=1.).contains(&y) {
            Self(Point::new(x, y))
        } else {
            Self(Point::new(f64::NAN, f64::NAN))
        }
    }

    pub fn x(&self) -> f64 {
        self.0.x()
    }

    pub fn y(&self) -> f64 {
        self.0.y()
    }

    pub fn is_valid(&self) -> bool {
        !(self.x().is_nan() || self.y().is_nan())
    }

    pub fn wgs84(&self) -> Wgs84 {
        let longitude = TAU * self.x() - PI;
        let latitude = 2. * (PI - TAU * self.y()).exp().atan() - FRAC_PI_2;

        Wgs84::new_unchecked(longitude.to_degrees(), latitude.to_degrees())
    }

    pub fn web_mercator(&self) -> WebMercator {
        WebMercator::new(
            self.x() * EQUATORIAL_PERIMETER - HALF_EQUATORIAL_PERIMETER,
            HALF_EQUATORIAL_PERIMETER - self.y() * EQUATORIAL_PERIMETER,
        )
    }

    pub fn pseudo_web_mercator(&self) -> PseudoWebMercator {
        PseudoWebMercator::new(
            self.x() * EQUATORIAL_PERIMETER,
            self.y() * EQUATORIAL_PERIMETER,
        )
    }
}

impl PartialEq for NormalizedWebMercator {
    fn eq(&self, other: &Self) -> bool {
        nan_or_fuzzy_eq(self.x(), other.x()) && nan_or_fuzzy_eq(self.y(), other.y())
    }
}

impl Wgs84 {
    pub fn web_mercator(&self) -> WebMercator {
        let x = self.longitude().to_radians() * EQUATORIAL_RADIUS;
        let y = (self.latitude().to_radians() / 2. + PI / 4.).tan().ln() * EQUATORIAL_RADIUS;

        WebMercator::new(x, y)
    }

    pub fn pseudo_web_mercator(&self) -> PseudoWebMercator {
        self.web_mercator().pseudo_web_mercator()
    }

    /// Direct projection into the unit square, the hot path of tile
    /// addressing. Numerically equivalent to going through
    /// [`Wgs84::web_mercator`], without materializing the meters.
    pub fn normalized_web_mercator(&self) -> NormalizedWebMercator {
        let x = self.longitude().to_radians() / TAU + 0.5;
        let y = 0.5 - (self.latitude().to_radians() / 2. + PI / 4.).tan().ln() / TAU;

        NormalizedWebMercator::new(x, y)
    }
}
