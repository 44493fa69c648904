//! Geographic coordinate type and spatial utilities.
//!
//! # Identity
//!
//! A `Location` is identified by the exact **text** of its coordinates as
//! they appeared in the source data, not by the parsed floats.  Two
//! locations parsed from `"34.0625329"` and `"34.06253290"` are different
//! keys.  This keeps hashing exact and sidesteps float equality entirely;
//! the parsed `f64` values are only used for distance and bearing maths.
//!
//! # Units
//!
//! All distances are in **miles** (great-circle, mean Earth radius).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::{CoreError, CoreResult};

/// Mean Earth radius, kilometres.
const EARTH_RADIUS_KM: f64 = 6_371.0;
const KM_PER_MILE: f64 = 1.609_344;

/// A WGS-84 coordinate carrying both its source text and parsed value.
///
/// Cloning is cheap: the text halves are reference-counted.
#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "(String, String)", into = "(String, String)")
)]
pub struct Location {
    lat: f64,
    lon: f64,
    lat_text: Arc<str>,
    lon_text: Arc<str>,
}

impl Location {
    /// Parse a location from its latitude and longitude text.
    ///
    /// Surrounding whitespace is trimmed; the trimmed text becomes the
    /// location's identity.
    ///
    /// # Errors
    ///
    /// [`CoreError::Parse`] if either half is not a finite number or lies
    /// outside the valid latitude/longitude range.
    pub fn parse(lat: &str, lon: &str) -> CoreResult<Self> {
        let lat_text = lat.trim();
        let lon_text = lon.trim();
        let lat = parse_degrees(lat_text, 90.0, "latitude")?;
        let lon = parse_degrees(lon_text, 180.0, "longitude")?;
        Ok(Self {
            lat,
            lon,
            lat_text: Arc::from(lat_text),
            lon_text: Arc::from(lon_text),
        })
    }

    /// Build a location from numeric degrees.  The identity text is Rust's
    /// shortest round-trip rendering of each value.
    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            lat_text: Arc::from(lat.to_string()),
            lon_text: Arc::from(lon.to_string()),
        }
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat_text(&self) -> &str {
        &self.lat_text
    }

    pub fn lon_text(&self) -> &str {
        &self.lon_text
    }

    /// Haversine great-circle distance in miles.
    pub fn distance_miles(&self, other: &Location) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let u = ((lat2 - lat1) * 0.5).sin();
        let v = ((other.lon - self.lon).to_radians() * 0.5).sin();
        let km = 2.0 * EARTH_RADIUS_KM * (u * u + lat1.cos() * lat2.cos() * v * v).sqrt().asin();
        km / KM_PER_MILE
    }

    /// Bearing of the line `self → other` in degrees, `[0, 360)`.
    ///
    /// Measured counter-clockwise from east on the flat lat/lon plane:
    /// 0° = east, 90° = north, 180° = west, 270° = south.
    pub fn bearing_deg(&self, other: &Location) -> f64 {
        let angle = (other.lat - self.lat).atan2(other.lon - self.lon).to_degrees();
        normalize_degrees(angle)
    }
}

/// Wrap an angle in degrees into `[0, 360)`.
#[inline]
pub fn normalize_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

fn parse_degrees(text: &str, limit: f64, what: &str) -> CoreResult<f64> {
    let value: f64 = text
        .parse()
        .map_err(|_| CoreError::Parse(format!("invalid {what} {text:?}")))?;
    if !value.is_finite() || value.abs() > limit {
        return Err(CoreError::Parse(format!(
            "{what} {text:?} outside ±{limit}"
        )));
    }
    Ok(value)
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.lat_text == other.lat_text && self.lon_text == other.lon_text
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lat_text.hash(state);
        self.lon_text.hash(state);
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat_text, self.lon_text)
    }
}

impl TryFrom<(String, String)> for Location {
    type Error = CoreError;

    fn try_from((lat, lon): (String, String)) -> CoreResult<Self> {
        Location::parse(&lat, &lon)
    }
}

impl From<Location> for (String, String) {
    fn from(loc: Location) -> Self {
        (loc.lat_text.to_string(), loc.lon_text.to_string())
    }
}
