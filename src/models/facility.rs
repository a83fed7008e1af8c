use serde::{Deserialize, Serialize};

use super::common::null_as_default;
use crate::error::{HealthCrmError, Result};

// ==================================================================================================
// Input Models
// ==================================================================================================

/// Facility payload for create and update calls
///
/// Empty fields are left out so the same type can carry a partial update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub facility_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub county: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub country: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<Contact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<Identifier>,
    #[serde(
        rename = "businesshours",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub business_hours: Vec<BusinessHours>,
}

/// Geographic location of a facility, or a reference point for proximity search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub latitude: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub longitude: String,
    /// Search radius; only used as the `distance` query parameter
    #[serde(skip)]
    pub radius: Option<String>,
}

impl Coordinates {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
            radius: None,
        }
    }

    pub fn with_radius(mut self, radius: impl Into<String>) -> Self {
        self.radius = Some(radius.into());
        self
    }

    /// Render as `latitude,longitude` after checking both are in range
    pub fn to_ref_location(&self) -> Result<String> {
        let latitude = parse_degrees(&self.latitude, "latitude", 90.0)?;
        let longitude = parse_degrees(&self.longitude, "longitude", 180.0)?;
        Ok(format!("{},{}", latitude, longitude))
    }
}

fn parse_degrees(value: &str, name: &str, limit: f64) -> Result<f64> {
    let degrees: f64 = value
        .trim()
        .parse()
        .map_err(|_| HealthCrmError::validation(format!("invalid {}: {:?}", name, value)))?;

    if !degrees.is_finite() || degrees.abs() > limit {
        return Err(HealthCrmError::validation(format!(
            "{} out of range: {}",
            name, value
        )));
    }

    Ok(degrees)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub contact_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub contact_value: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,
}

/// Facility identifier such as an MFL code or Slade code
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub identifier_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub identifier_value: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub valid_from: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub valid_to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessHours {
    pub day: String,
    pub opening_time: String,
    pub closing_time: String,
}

// ==================================================================================================
// Output Models
// ==================================================================================================

/// Facility as returned by the CRM
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacilityOutput {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub facility_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub county: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub coordinates: CoordinatesOutput,
    #[serde(deserialize_with = "null_as_default")]
    pub contacts: Vec<ContactOutput>,
    #[serde(deserialize_with = "null_as_default")]
    pub identifiers: Vec<IdentifierOutput>,
    #[serde(rename = "businesshours", deserialize_with = "null_as_default")]
    pub business_hours: Vec<BusinessHoursOutput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatesOutput {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub latitude: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactOutput {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub contact_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub contact_value: String,
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(deserialize_with = "null_as_default")]
    pub active: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub facility_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentifierOutput {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub identifier_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub identifier_value: String,
    #[serde(deserialize_with = "null_as_default")]
    pub valid_from: String,
    #[serde(deserialize_with = "null_as_default")]
    pub valid_to: String,
    #[serde(deserialize_with = "null_as_default")]
    pub facility_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessHoursOutput {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub day: String,
    #[serde(deserialize_with = "null_as_default")]
    pub opening_time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub closing_time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub facility_id: String,
}
