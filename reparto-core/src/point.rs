//! Geographic coordinates and great-circle distance.

use geo::Coord;
use thiserror::Error;

/// Mean Earth radius used by [`haversine_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 position in decimal degrees.
///
/// Converts to and from [`geo::Coord`] with `x = longitude`, `y = latitude`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use reparto_core::GeoPoint;
///
/// let obelisco = GeoPoint::new(-34.6037, -58.3816);
/// let coord: Coord<f64> = obelisco.into();
/// assert_eq!(coord.x, -58.3816);
/// assert_eq!(GeoPoint::from(coord), obelisco);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

/// Errors returned by [`GeoPoint::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeoPointError {
    /// A component was not a decimal number.
    #[error("{axis} {value:?} is not a decimal number")]
    NotANumber { axis: &'static str, value: String },
    /// A component was outside its valid range or not finite.
    #[error("{axis} {value:?} is out of range")]
    OutOfRange { axis: &'static str, value: String },
}

impl GeoPoint {
    /// Construct a point without range checks.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parse the decimal strings a geocoder returns.
    ///
    /// # Errors
    ///
    /// Returns [`GeoPointError`] when either component does not parse, is
    /// not finite, or lies outside `[-90, 90]` / `[-180, 180]`.
    ///
    /// # Examples
    /// ```
    /// use reparto_core::{GeoPoint, GeoPointError};
    ///
    /// let point = GeoPoint::parse("-34.9215", "-57.9545")?;
    /// assert_eq!(point, GeoPoint::new(-34.9215, -57.9545));
    /// assert!(GeoPoint::parse("91", "0").is_err());
    /// # Ok::<(), GeoPointError>(())
    /// ```
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, GeoPointError> {
        let lat = parse_axis("latitude", latitude, 90.0)?;
        let lon = parse_axis("longitude", longitude, 180.0)?;
        Ok(Self::new(lat, lon))
    }

    /// Great-circle distance to `other` in kilometres.
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        haversine_km(*self, *other)
    }
}

fn parse_axis(axis: &'static str, raw: &str, limit: f64) -> Result<f64, GeoPointError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| GeoPointError::NotANumber {
            axis,
            value: raw.to_owned(),
        })?;
    if !value.is_finite() || value.abs() > limit {
        return Err(GeoPointError::OutOfRange {
            axis,
            value: raw.to_owned(),
        });
    }
    Ok(value)
}

impl From<GeoPoint> for Coord<f64> {
    fn from(point: GeoPoint) -> Self {
        Self {
            x: point.longitude,
            y: point.latitude,
        }
    }
}

impl From<Coord<f64>> for GeoPoint {
    fn from(coord: Coord<f64>) -> Self {
        Self::new(coord.y, coord.x)
    }
}

/// Haversine distance between two points on a sphere of radius
/// [`EARTH_RADIUS_KM`].
///
/// `a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlon/2)` and
/// `d = 2R·atan2(√a, √(1−a))`.
///
/// # Examples
/// ```
/// use reparto_core::{GeoPoint, haversine_km};
///
/// let obelisco = GeoPoint::new(-34.6037, -58.3816);
/// let la_plata = GeoPoint::new(-34.9215, -57.9545);
/// let d = haversine_km(obelisco, la_plata);
/// assert!((52.0..=53.5).contains(&d));
/// ```
#[must_use]
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let half_dlat = (to.latitude - from.latitude).to_radians() / 2.0;
    let half_dlon = (to.longitude - from.longitude).to_radians() / 2.0;
    let a = half_dlat.sin().powi(2) + lat1.cos() * lat2.cos() * half_dlon.sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}
