// Person profiles and identity lookups

use serde::{Deserialize, Serialize};

use super::common::null_as_default;

use super::enums::{ContactType, GenderType, IdentifierType};

/// Profile registration payload
///
/// The CRM accepts it asynchronously and answers 202 with the stored profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileInput {
    pub profile_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub other_name: String,
    pub date_of_birth: String,
    pub gender: GenderType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub enrolment_date: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub slade_code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_code: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<ProfileContactInput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<ProfileIdentifierInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileContactInput {
    pub contact_type: ContactType,
    pub contact_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileIdentifierInput {
    pub identifier_type: IdentifierType,
    pub identifier_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileOutput {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub profile_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub health_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub slade_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileIdentifierOutput {
    #[serde(deserialize_with = "null_as_default")]
    pub identifier_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub identifier_value: String,
    #[serde(deserialize_with = "null_as_default")]
    pub slade_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileContactOutput {
    #[serde(deserialize_with = "null_as_default")]
    pub contact_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub contact_value: String,
    #[serde(deserialize_with = "null_as_default")]
    pub slade_code: String,
}

/// Attributes used to look up an existing person
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchProfileInput {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<ProfileIdentifierInput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<ProfileContactInput>,
}

/// Check whether an identifier already belongs to a person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyIdentifierInput {
    pub identifier_type: IdentifierType,
    pub identifier_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyIdentifierOutput {
    #[serde(deserialize_with = "null_as_default")]
    pub is_valid: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub health_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile() -> ProfileInput {
        ProfileInput {
            profile_id: uuid::Uuid::new_v4().to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            other_name: String::new(),
            date_of_birth: "1990-01-01".to_string(),
            gender: GenderType::Male,
            enrolment_date: "2024-01-01".to_string(),
            slade_code: "50202".to_string(),
            service_code: "05".to_string(),
            contacts: vec![ProfileContactInput {
                contact_type: ContactType::PhoneNumber,
                contact_value: "+254711223344".to_string(),
            }],
            identifiers: vec![ProfileIdentifierInput {
                identifier_type: IdentifierType::NationalId,
                identifier_value: "12345678".to_string(),
            }],
        }
    }

    #[test]
    fn test_profile_input_wire_format() {
        let value = serde_json::to_value(profile()).unwrap();

        assert_eq!(value["gender"], "MALE");
        assert_eq!(value["contacts"][0]["contact_type"], "PHONE_NUMBER");
        assert_eq!(value["identifiers"][0]["identifier_type"], "NATIONAL_ID");
        assert!(value.get("other_name").is_none());
    }

    #[test]
    fn test_match_profile_input_omits_empty_lists() {
        let input = MatchProfileInput {
            identifiers: vec![ProfileIdentifierInput {
                identifier_type: IdentifierType::PassportNo,
                identifier_value: "A123".to_string(),
            }],
            contacts: Vec::new(),
        };

        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({"identifiers": [{"identifier_type": "PASSPORT_NO", "identifier_value": "A123"}]})
        );
    }

    #[test]
    fn test_decode_outputs_with_defaults() {
        let profile: ProfileOutput =
            serde_json::from_value(json!({"id": "1", "health_id": "H-9"})).unwrap();
        assert_eq!(profile.health_id, "H-9");
        assert_eq!(profile.slade_code, "");

        let verify: VerifyIdentifierOutput = serde_json::from_value(json!({})).unwrap();
        assert!(!verify.is_valid);

        let verify: VerifyIdentifierOutput = serde_json::from_value(
            json!({"is_valid": null, "health_id": null, "message": "not found"}),
        )
        .unwrap();
        assert!(!verify.is_valid);
        assert_eq!(verify.health_id, "");
        assert_eq!(verify.message, "not found");
    }
}
