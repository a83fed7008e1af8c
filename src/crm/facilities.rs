use reqwest::StatusCode;

use super::{require_id, require_ids, HealthCrm};
use crate::error::{HealthCrmError, Result};
use crate::http_client::expect_json;
use crate::models::{Coordinates, Facility, FacilityOutput, Page, Pagination};
use crate::query::{QueryKey, QueryParams};

const FACILITIES_PATH: &str = "/v1/facilities/facilities/";

/// Filters accepted by [`HealthCrm::get_facilities`]
///
/// `service_ids` and `search` are mutually exclusive. `identifier_type` and
/// `identifier_value` must be given together.
#[derive(Debug, Clone, Default)]
pub struct FacilityFilter {
    /// Reference point; its radius, if any, becomes the search distance
    pub location: Option<Coordinates>,
    pub service_ids: Vec<String>,
    /// Matches facility or service names
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
    /// Overrides the configured CRM service code
    pub crm_service_code: Option<String>,
    pub identifier_type: Option<String>,
    pub identifier_value: Option<String>,
}

impl FacilityFilter {
    pub(crate) fn to_query(&self, default_service_code: &str) -> Result<QueryParams> {
        let search = non_empty(&self.search);
        let identifier_type = non_empty(&self.identifier_type);
        let identifier_value = non_empty(&self.identifier_value);

        if !self.service_ids.is_empty() && search.is_some() {
            return Err(HealthCrmError::validation(
                "both service IDs and search parameter cannot be provided simultaneously",
            ));
        }

        match (identifier_type, identifier_value) {
            (Some(_), None) => {
                return Err(HealthCrmError::validation(
                    "identifier value is required when identifier type is provided",
                ))
            }
            (None, Some(_)) => {
                return Err(HealthCrmError::validation(
                    "identifier type is required when identifier value is provided",
                ))
            }
            _ => {}
        }

        let mut query = QueryParams::new();

        if let Some(pagination) = &self.pagination {
            pagination.apply(&mut query);
        }

        if let Some(location) = &self.location {
            query.set(QueryKey::RefLocation, location.to_ref_location()?);
            if let Some(radius) = location.radius.as_deref().filter(|r| !r.is_empty()) {
                query.set(QueryKey::Distance, radius);
            }
        }

        for id in &self.service_ids {
            query.append(QueryKey::Service, id.as_str());
        }

        if let Some(search) = search {
            query.set(QueryKey::Search, search);
        }

        if let (Some(kind), Some(value)) = (identifier_type, identifier_value) {
            query
                .set(QueryKey::IdentifierType, kind)
                .set(QueryKey::IdentifierValue, value);
        }

        let service_code = non_empty(&self.crm_service_code).unwrap_or(default_service_code);
        query.set(QueryKey::CrmServiceCode, service_code);

        Ok(query)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl HealthCrm {
    pub async fn create_facility(&self, facility: &Facility) -> Result<FacilityOutput> {
        let response = self.http.post(FACILITIES_PATH, facility).await?;
        let output: FacilityOutput = expect_json(response, StatusCode::CREATED).await?;

        tracing::info!(facility_id = %output.id, "Created facility in Health CRM");
        Ok(output)
    }

    pub async fn get_facility_by_id(&self, id: &str) -> Result<FacilityOutput> {
        let id = require_id("facility ID", id)?;
        let path = format!("{}{}/", FACILITIES_PATH, id);

        let response = self.http.get(&path, None).await?;
        expect_json(response, StatusCode::OK).await
    }

    /// Partially update a facility; empty fields in `update` are left untouched
    pub async fn update_facility(&self, id: &str, update: &Facility) -> Result<FacilityOutput> {
        let id = require_id("facility ID", id)?;
        let path = format!("{}{}/", FACILITIES_PATH, id);

        let response = self.http.patch(&path, update).await?;
        expect_json(response, StatusCode::OK).await
    }

    /// List facilities, optionally near a location, offering given services,
    /// matching a search term or carrying a given identifier
    pub async fn get_facilities(&self, filter: &FacilityFilter) -> Result<Page<FacilityOutput>> {
        let query = filter.to_query(&self.crm_service_code)?;

        let response = self.http.get(FACILITIES_PATH, Some(&query)).await?;
        expect_json(response, StatusCode::OK).await
    }

    pub async fn get_facilities_offering_a_service(
        &self,
        service_id: &str,
        pagination: Option<Pagination>,
    ) -> Result<Page<FacilityOutput>> {
        let service_id = require_id("service ID", service_id)?;

        let mut query = QueryParams::new();
        query.append(QueryKey::Service, service_id);
        if let Some(pagination) = pagination {
            pagination.apply(&mut query);
        }

        let response = self.http.get(FACILITIES_PATH, Some(&query)).await?;
        expect_json(response, StatusCode::OK).await
    }

    /// Fetch several facilities in one call
    pub async fn get_multiple_facilities<S: AsRef<str>>(
        &self,
        facility_ids: &[S],
    ) -> Result<Page<FacilityOutput>> {
        require_ids("facility ID", facility_ids)?;

        let mut query = QueryParams::new();
        query.join(
            QueryKey::FacilityIds,
            facility_ids
                .iter()
                .map(|id| id.as_ref().trim())
                .filter(|id| !id.is_empty()),
        );

        let response = self
            .http
            .get("/v1/facilities/facilities", Some(&query))
            .await?;
        expect_json(response, StatusCode::OK).await
    }
}
