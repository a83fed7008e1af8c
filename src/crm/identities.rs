use reqwest::StatusCode;

use super::{require_id, HealthCrm};
use crate::error::{HealthCrmError, Result};
use crate::http_client::expect_json;
use crate::models::{
    IdentifierType, MatchProfileInput, ProfileContactOutput, ProfileIdentifierOutput, ProfileInput,
    ProfileOutput, VerifyIdentifierInput, VerifyIdentifierOutput,
};
use crate::query::{QueryKey, QueryParams};

impl HealthCrm {
    /// Register a person profile; the CRM answers 202 Accepted
    pub async fn create_profile(&self, profile: &ProfileInput) -> Result<ProfileOutput> {
        let response = self.http.post("/v1/identities/profiles/", profile).await?;
        let output: ProfileOutput = expect_json(response, StatusCode::ACCEPTED).await?;

        tracing::info!(profile_id = %output.profile_id, "Submitted profile to Health CRM");
        Ok(output)
    }

    pub async fn match_profile(&self, input: &MatchProfileInput) -> Result<ProfileOutput> {
        if input.identifiers.is_empty() && input.contacts.is_empty() {
            return Err(HealthCrmError::validation(
                "at least one identifier or contact is required to match a profile",
            ));
        }

        let response = self
            .http
            .post("/v1/identities/profiles/match_profile/", input)
            .await?;
        expect_json(response, StatusCode::OK).await
    }

    /// Identifiers recorded for a person, optionally limited to one type
    ///
    /// `identifier_type` must be one of the [`IdentifierType`] wire names.
    pub async fn get_person_identifiers(
        &self,
        health_id: &str,
        identifier_type: Option<&str>,
    ) -> Result<Vec<ProfileIdentifierOutput>> {
        let health_id = require_id("health ID", health_id)?;

        let mut query = QueryParams::new();
        if let Some(kind) = identifier_type.filter(|t| !t.is_empty()) {
            let kind: IdentifierType = kind.parse()?;
            query.set(QueryKey::IdentifierType, kind.as_str());
        }

        let path = format!("/v1/identities/persons/{}/identifiers/", health_id);
        let response = self.http.get(&path, Some(&query)).await?;
        expect_json(response, StatusCode::OK).await
    }

    pub async fn get_person_contacts(&self, health_id: &str) -> Result<Vec<ProfileContactOutput>> {
        let health_id = require_id("health ID", health_id)?;
        let path = format!("/v1/identities/persons/{}/contacts/", health_id);

        let response = self.http.get(&path, None).await?;
        expect_json(response, StatusCode::OK).await
    }

    pub async fn verify_identifier(
        &self,
        input: &VerifyIdentifierInput,
    ) -> Result<VerifyIdentifierOutput> {
        require_id("identifier value", &input.identifier_value)?;

        let response = self
            .http
            .post("/v1/identities/identifiers/verify/", input)
            .await?;
        expect_json(response, StatusCode::OK).await
    }
}
