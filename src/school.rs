//! School records, unvalidated registration input, and the seed data.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::geo::{self, Coordinates, LAT_RANGE, LON_RANGE};

/// A registered school. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub id: u64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A proximity query row: the school plus its distance from the query point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSchool {
    #[serde(flatten)]
    pub school: School,
    /// Kilometers, full precision.
    pub distance: f64,
}

/// A coordinate as submitted: JSON clients send numbers, forms send text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CoordinateValue {
    Number(f64),
    Text(String),
}

impl From<f64> for CoordinateValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for CoordinateValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Registration input before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SchoolDraft {
    pub name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<CoordinateValue>,
    pub longitude: Option<CoordinateValue>,
}

/// A draft that passed validation; only an id is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSchool {
    pub name: String,
    pub address: String,
    pub location: Coordinates,
}

impl SchoolDraft {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        latitude: impl Into<CoordinateValue>,
        longitude: impl Into<CoordinateValue>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            address: Some(address.into()),
            latitude: Some(latitude.into()),
            longitude: Some(longitude.into()),
        }
    }

    /// Check fields in order name, address, latitude, longitude and report
    /// the first problem found.
    pub fn validate(&self) -> Result<ValidSchool, ValidationError> {
        let name = required_text("name", self.name.as_deref())?;
        let address = required_text("address", self.address.as_deref())?;
        let lat = coordinate("latitude", self.latitude.as_ref(), LAT_RANGE)?;
        let lon = coordinate("longitude", self.longitude.as_ref(), LON_RANGE)?;
        Ok(ValidSchool {
            name,
            address,
            location: Coordinates::new(lat, lon)?,
        })
    }
}

fn required_text(field: &'static str, value: Option<&str>) -> Result<String, ValidationError> {
    let value = value.ok_or(ValidationError::MissingField(field))?;
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(value.to_string())
}

fn coordinate(
    field: &'static str,
    value: Option<&CoordinateValue>,
    range: (f64, f64),
) -> Result<f64, ValidationError> {
    let n = match value {
        None => return Err(ValidationError::MissingField(field)),
        Some(CoordinateValue::Number(n)) => *n,
        Some(CoordinateValue::Text(s)) => geo::parse_number(field, Some(s.as_str()))?,
    };
    geo::check_range(field, n, range)
}

/// The three Springfield, IL schools every fresh registry starts with.
pub fn seed_schools() -> Vec<School> {
    vec![
        School {
            id: 1,
            name: "Central High School".into(),
            address: "123 Education Ave, Springfield, IL 62701".into(),
            latitude: 39.8026,
            longitude: -89.6437,
        },
        School {
            id: 2,
            name: "Westside Elementary".into(),
            address: "456 Learning Blvd, Springfield, IL 62702".into(),
            latitude: 39.8107,
            longitude: -89.6589,
        },
        School {
            id: 3,
            name: "Southview Academy".into(),
            address: "789 Knowledge St, Springfield, IL 62703".into(),
            latitude: 39.7906,
            longitude: -89.6334,
        },
    ]
}
