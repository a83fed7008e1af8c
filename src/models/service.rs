use serde::{Deserialize, Serialize};

use super::common::null_as_default;

/// Payload for creating a service or linking services to a facility
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacilityServiceInput {
    pub name: String,
    pub description: String,
    pub identifiers: Vec<ServiceIdentifierInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceIdentifierInput {
    pub identifier_type: String,
    pub identifier_value: String,
}

/// Healthcare service offered by one or more facilities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacilityService {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub identifiers: Vec<ServiceIdentifier>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceIdentifier {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub identifier_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub identifier_value: String,
    #[serde(deserialize_with = "null_as_default")]
    pub service_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_service_input_serializes_all_fields() {
        let input = FacilityServiceInput {
            name: "Weight".to_string(),
            description: "Weight in Kg".to_string(),
            identifiers: vec![ServiceIdentifierInput {
                identifier_type: "CIEL".to_string(),
                identifier_value: "1234".to_string(),
            }],
        };

        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({
                "name": "Weight",
                "description": "Weight in Kg",
                "identifiers": [{"identifier_type": "CIEL", "identifier_value": "1234"}]
            })
        );
    }

    #[test]
    fn test_service_output_tolerates_missing_fields() {
        let service: FacilityService = serde_json::from_value(json!({
            "id": "s-1",
            "name": "Oncology",
            "identifiers": [{"id": "i-1", "identifier_type": "CIEL", "service_id": "s-1"}]
        }))
        .unwrap();

        assert_eq!(service.id, "s-1");
        assert_eq!(service.description, "");
        assert_eq!(service.identifiers[0].service_id, "s-1");
        assert_eq!(service.identifiers[0].identifier_value, "");
    }

    #[test]
    fn test_service_output_tolerates_nulls() {
        let service: FacilityService = serde_json::from_value(json!({
            "id": "s-1",
            "description": null,
            "identifiers": null
        }))
        .unwrap();

        assert_eq!(service.description, "");
        assert!(service.identifiers.is_empty());
    }
}
