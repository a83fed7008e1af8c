use reqwest::StatusCode;

use super::{require_id, require_ids, HealthCrm};
use crate::error::{HealthCrmError, Result};
use crate::http_client::expect_json;
use crate::models::{FacilityService, FacilityServiceInput, Page, Pagination};
use crate::query::{QueryKey, QueryParams};

const SERVICES_PATH: &str = "/v1/facilities/services/";

impl HealthCrm {
    /// List the services owned by a CRM service code
    ///
    /// Falls back to the configured code when `crm_service_code` is `None`.
    pub async fn get_services(
        &self,
        pagination: Option<Pagination>,
        crm_service_code: Option<&str>,
    ) -> Result<Page<FacilityService>> {
        let mut query = QueryParams::new();
        if let Some(pagination) = pagination {
            pagination.apply(&mut query);
        }

        let service_code = crm_service_code
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .unwrap_or(&self.crm_service_code);
        query.set(QueryKey::CrmServiceCode, service_code);

        let response = self.http.get(SERVICES_PATH, Some(&query)).await?;
        expect_json(response, StatusCode::OK).await
    }

    pub async fn get_service(&self, service_id: &str) -> Result<FacilityService> {
        let service_id = require_id("service ID", service_id)?;
        let path = format!("/v1/facilities/services/{}", service_id);

        let response = self.http.get(&path, None).await?;
        expect_json(response, StatusCode::OK).await
    }

    pub async fn get_multiple_services<S: AsRef<str>>(
        &self,
        service_ids: &[S],
    ) -> Result<Page<FacilityService>> {
        require_ids("service ID", service_ids)?;

        let mut query = QueryParams::new();
        query.join(
            QueryKey::ServiceIds,
            service_ids
                .iter()
                .map(|id| id.as_ref().trim())
                .filter(|id| !id.is_empty()),
        );

        let response = self
            .http
            .get("/v1/facilities/services", Some(&query))
            .await?;
        expect_json(response, StatusCode::OK).await
    }

    pub async fn create_service(&self, input: &FacilityServiceInput) -> Result<FacilityService> {
        let response = self.http.post(SERVICES_PATH, input).await?;
        let service: FacilityService = expect_json(response, StatusCode::OK).await?;

        tracing::info!(service_id = %service.id, "Created service in Health CRM");
        Ok(service)
    }

    /// Attach one or more services to a facility
    pub async fn link_service_to_facility(
        &self,
        facility_id: &str,
        services: &[FacilityServiceInput],
    ) -> Result<FacilityService> {
        let facility_id = require_id("facility ID", facility_id)?;
        require_services(services)?;
        let path = format!("/v1/facilities/facilities/{}/add_services/", facility_id);

        let response = self.http.post(&path, services).await?;
        expect_json(response, StatusCode::CREATED).await
    }
}

fn require_services(services: &[FacilityServiceInput]) -> Result<()> {
    if services.is_empty() {
        return Err(HealthCrmError::validation("at least one service is required"));
    }
    Ok(())
}
