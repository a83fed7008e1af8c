use serde::{Deserialize, Serialize};

use super::common::null_as_default;

use super::facility::{ContactOutput, IdentifierOutput};

/// Practitioner as listed in the CRM directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Practitioner {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub other_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub gender: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub specialties: Vec<Specialty>,
    #[serde(deserialize_with = "null_as_default")]
    pub facilities: Vec<PractitionerFacility>,
    #[serde(deserialize_with = "null_as_default")]
    pub contacts: Vec<ContactOutput>,
    #[serde(deserialize_with = "null_as_default")]
    pub identifiers: Vec<IdentifierOutput>,
}

impl Practitioner {
    pub fn full_name(&self) -> String {
        [&self.first_name, &self.other_name, &self.last_name]
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Facility a practitioner is attached to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PractitionerFacility {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Specialty {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}
