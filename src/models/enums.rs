// Enumerations shared by the identity endpoints

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HealthCrmError;

/// Kinds of person identifiers the CRM stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentifierType {
    NationalId,
    PassportNo,
    MilitaryId,
    AlienId,
    NhifNo,
    PatientNo,
    PayerMemberNo,
    SmartMemberNo,
    FhirPatientId,
    ErpCustomerId,
    CccNumber,
}

impl IdentifierType {
    pub const ALL: [IdentifierType; 11] = [
        IdentifierType::NationalId,
        IdentifierType::PassportNo,
        IdentifierType::MilitaryId,
        IdentifierType::AlienId,
        IdentifierType::NhifNo,
        IdentifierType::PatientNo,
        IdentifierType::PayerMemberNo,
        IdentifierType::SmartMemberNo,
        IdentifierType::FhirPatientId,
        IdentifierType::ErpCustomerId,
        IdentifierType::CccNumber,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierType::NationalId => "NATIONAL_ID",
            IdentifierType::PassportNo => "PASSPORT_NO",
            IdentifierType::MilitaryId => "MILITARY_ID",
            IdentifierType::AlienId => "ALIEN_ID",
            IdentifierType::NhifNo => "NHIF_NO",
            IdentifierType::PatientNo => "PATIENT_NO",
            IdentifierType::PayerMemberNo => "PAYER_MEMBER_NO",
            IdentifierType::SmartMemberNo => "SMART_MEMBER_NO",
            IdentifierType::FhirPatientId => "FHIR_PATIENT_ID",
            IdentifierType::ErpCustomerId => "ERP_CUSTOMER_ID",
            IdentifierType::CccNumber => "CCC_NUMBER",
        }
    }
}

impl fmt::Display for IdentifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdentifierType {
    type Err = HealthCrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IdentifierType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| HealthCrmError::validation(format!("{} is not a valid IdentifierType", s)))
    }
}

/// Kinds of person contacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactType {
    PhoneNumber,
    Email,
}

impl ContactType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactType::PhoneNumber => "PHONE_NUMBER",
            ContactType::Email => "EMAIL",
        }
    }
}

impl fmt::Display for ContactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactType {
    type Err = HealthCrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PHONE_NUMBER" => Ok(ContactType::PhoneNumber),
            "EMAIL" => Ok(ContactType::Email),
            _ => Err(HealthCrmError::validation(format!(
                "{} is not a valid ContactType",
                s
            ))),
        }
    }
}

/// Administrative gender as the CRM records it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenderType {
    #[serde(rename = "MALE")]
    Male,
    #[serde(rename = "FEMALE")]
    Female,
    #[serde(rename = "OTHER")]
    Other,
    /// Asked but unknown
    #[serde(rename = "ASKU")]
    Asku,
    /// Unknown
    #[serde(rename = "UNK")]
    Unk,
}

impl GenderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenderType::Male => "MALE",
            GenderType::Female => "FEMALE",
            GenderType::Other => "OTHER",
            GenderType::Asku => "ASKU",
            GenderType::Unk => "UNK",
        }
    }

    /// Map a free-form gender label (e.g. from a user profile) to a CRM gender
    pub fn from_gender_label(label: &str) -> GenderType {
        let normalized: String = label
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match normalized.as_str() {
            "male" => GenderType::Male,
            "female" => GenderType::Female,
            "agender" | "bigender" | "genderqueer" | "nonbinary" | "transgender"
            | "twospirit" | "other" => GenderType::Other,
            "prefernottosay" => GenderType::Asku,
            _ => GenderType::Unk,
        }
    }
}

impl fmt::Display for GenderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenderType {
    type Err = HealthCrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MALE" => Ok(GenderType::Male),
            "FEMALE" => Ok(GenderType::Female),
            "OTHER" => Ok(GenderType::Other),
            "ASKU" => Ok(GenderType::Asku),
            "UNK" => Ok(GenderType::Unk),
            _ => Err(HealthCrmError::validation(format!(
                "{} is not a valid GenderType",
                s
            ))),
        }
    }
}
