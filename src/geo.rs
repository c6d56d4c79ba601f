//! Spherical-Earth geometry: validated coordinates and Haversine distance.
//!
//! No ellipsoidal correction. Distances are in kilometers at full `f64`
//! precision; rounding is left to whoever displays them.

use crate::error::ValidationError;
use serde::Serialize;

/// Mean Earth radius used by the Haversine formula, in km.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

pub const LAT_RANGE: (f64, f64) = (-90.0, 90.0);
pub const LON_RANGE: (f64, f64) = (-180.0, 180.0);

/// A latitude/longitude pair in degrees, guaranteed within range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            latitude: check_range("latitude", latitude, LAT_RANGE)?,
            longitude: check_range("longitude", longitude, LON_RANGE)?,
        })
    }

    /// Build from raw text, as it arrives in query strings and form posts.
    /// Absent and blank values are both reported as missing.
    pub fn parse(latitude: Option<&str>, longitude: Option<&str>) -> Result<Self, ValidationError> {
        let lat = parse_number("latitude", latitude)?;
        let lon = parse_number("longitude", longitude)?;
        Self::new(lat, lon)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other`, in km.
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        haversine_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Haversine great-circle distance between two points given in degrees.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    // Rounding can push `a` just past 1 for antipodal points.
    let a = ((d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

pub(crate) fn check_range(
    field: &'static str,
    value: f64,
    (min, max): (f64, f64),
) -> Result<f64, ValidationError> {
    // NaN fails `contains`, infinities fall outside the bounds.
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange { field, value, min, max })
    }
}

pub(crate) fn parse_number(field: &'static str, raw: Option<&str>) -> Result<f64, ValidationError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    let Some(text) = raw else {
        return Err(ValidationError::MissingField(field));
    };
    text.parse::<f64>().map_err(|_| ValidationError::NotNumeric {
        field,
        value: text.to_string(),
    })
}

/// "39.8026°N, 89.6437°W"
pub fn format_coords(lat: f64, lon: f64) -> String {
    let ns = if lat >= 0.0 { 'N' } else { 'S' };
    let ew = if lon >= 0.0 { 'E' } else { 'W' };
    format!("{:.4}\u{00B0}{}, {:.4}\u{00B0}{}", lat.abs(), ns, lon.abs(), ew)
}
