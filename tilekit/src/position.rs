//! Geographic positions in the WGS84 reference system.

use geo_types::Point;

use crate::angle::SexagesimalAngle;
use crate::error::Error;

/// Qt-style fuzzy comparison: relative difference below 1e-12.
pub(crate) fn fuzzy_eq(a: f64, b: f64) -> bool {
    (a - b).abs() * 1e12 <= a.abs().min(b.abs())
}

pub(crate) fn nan_or_fuzzy_eq(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || fuzzy_eq(a, b)
}

/// Geographic coordinate: longitude in [-180, 180] and latitude in
/// [-90, 90], both in degrees.
#[derive(Debug, Clone, Copy)]
pub struct Wgs84(Point);

impl Wgs84 {
    /// Construct from decimal degrees.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidCoordinate`] when either component is
    /// outside its domain.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, Error> {
        if is_valid_longitude(longitude) && is_valid_latitude(latitude) {
            Ok(Self(Point::new(longitude, latitude)))
        } else {
            Err(Error::InvalidCoordinate)
        }
    }

    /// Construct from sexagesimal angles.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidCoordinate`] when the decimal value of
    /// either angle is outside its domain, including undefined angles.
    pub fn from_sexagesimal(
        longitude: SexagesimalAngle,
        latitude: SexagesimalAngle,
    ) -> Result<Self, Error> {
        Self::new(longitude.decimal(), latitude.decimal())
    }

    /// The coordinate with both components NaN, denoting "no position".
    pub fn invalid() -> Self {
        Self(Point::new(f64::NAN, f64::NAN))
    }

    /// For conversion results: skips validation, so an off-map projected
    /// point unprojects to an off-range (but inspectable) coordinate.
    pub(crate) fn new_unchecked(longitude: f64, latitude: f64) -> Self {
        Self(Point::new(longitude, latitude))
    }

    pub fn is_valid(&self) -> bool {
        !(self.longitude().is_nan() || self.latitude().is_nan())
    }

    pub fn longitude(&self) -> f64 {
        self.0.x()
    }

    pub fn latitude(&self) -> f64 {
        self.0.y()
    }
}

fn is_valid_longitude(longitude: f64) -> bool {
    (-180. ..=180.).contains(&longitude)
}

fn is_valid_latitude(latitude: f64) -> bool {
    (-90. ..=90.).contains(&latitude)
}

impl PartialEq for Wgs84 {
    fn eq(&self, other: &Self) -> bool {
        let latitude_equal = nan_or_fuzzy_eq(self.latitude(), other.latitude());

        // At the poles the longitude is degenerate, all values name the
        // same point.
        let longitude_equal = (latitude_equal && self.latitude().abs() == 90.)
            || nan_or_fuzzy_eq(self.longitude(), other.longitude());

        longitude_equal && latitude_equal
    }
}

/// Construct [`Wgs84`] from longitude and latitude, in this order.
///
/// # Errors
///
/// Fails with [`Error::InvalidCoordinate`] on out-of-range input.
pub fn lon_lat(lon: f64, lat: f64) -> Result<Wgs84, Error> {
    Wgs84::new(lon, lat)
}

/// Construct [`Wgs84`] from latitude and longitude. Note that it is common
/// standard to write coordinates starting with the latitude.
///
/// # Errors
///
/// Fails with [`Error::InvalidCoordinate`] on out-of-range input.
pub fn lat_lon(lat: f64, lon: f64) -> Result<Wgs84, Error> {
    Wgs84::new(lon, lat)
}

/// Geographic coordinate plus an elevation above the ellipsoid, in meters.
/// NaN elevation means "not measured".
#[derive(Debug, Clone, Copy)]
pub struct ElevationWgs84 {
    coordinate: Wgs84,
    elevation: f64,
}

impl ElevationWgs84 {
    /// # Errors
    ///
    /// Fails with [`Error::InvalidCoordinate`] when longitude or latitude
    /// is out of range. Any elevation is accepted.
    pub fn new(longitude: f64, latitude: f64, elevation: f64) -> Result<Self, Error> {
        Ok(Self {
            coordinate: Wgs84::new(longitude, latitude)?,
            elevation,
        })
    }

    pub fn from_coordinate(coordinate: Wgs84, elevation: f64) -> Self {
        Self {
            coordinate,
            elevation,
        }
    }

    pub fn coordinate(&self) -> Wgs84 {
        self.coordinate
    }

    pub fn longitude(&self) -> f64 {
        self.coordinate.longitude()
    }

    pub fn latitude(&self) -> f64 {
        self.coordinate.latitude()
    }

    pub fn elevation(&self) -> f64 {
        self.elevation
    }
}

impl PartialEq for ElevationWgs84 {
    fn eq(&self, other: &Self) -> bool {
        self.coordinate == other.coordinate && nan_or_fuzzy_eq(self.elevation, other.elevation)
    }
}
