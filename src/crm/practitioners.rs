use reqwest::StatusCode;

use super::{require_id, HealthCrm};
use crate::error::Result;
use crate::http_client::expect_json;
use crate::models::{Coordinates, Page, Pagination, Practitioner, Specialty};
use crate::query::{QueryKey, QueryParams};

const PRACTITIONERS_PATH: &str = "/v1/practitioners/practitioners/";

/// Filters accepted by [`HealthCrm::get_practitioners`]
#[derive(Debug, Clone, Default)]
pub struct PractitionerFilter {
    pub location: Option<Coordinates>,
    /// Only practitioners at facilities offering these services
    pub service_ids: Vec<String>,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl PractitionerFilter {
    pub(crate) fn to_query(&self) -> Result<QueryParams> {
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

        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query.set(QueryKey::Search, search);
        }

        Ok(query)
    }
}

impl HealthCrm {
    pub async fn get_practitioners(
        &self,
        filter: &PractitionerFilter,
    ) -> Result<Page<Practitioner>> {
        let query = filter.to_query()?;

        let response = self.http.get(PRACTITIONERS_PATH, Some(&query)).await?;
        expect_json(response, StatusCode::OK).await
    }

    pub async fn get_practitioner_by_id(&self, id: &str) -> Result<Practitioner> {
        let id = require_id("practitioner ID", id)?;
        let path = format!("{}{}/", PRACTITIONERS_PATH, id);

        let response = self.http.get(&path, None).await?;
        expect_json(response, StatusCode::OK).await
    }

    pub async fn get_specialties(&self, pagination: Option<Pagination>) -> Result<Page<Specialty>> {
        let mut query = QueryParams::new();
        if let Some(pagination) = pagination {
            pagination.apply(&mut query);
        }

        let response = self
            .http
            .get("/v1/practitioners/specialties/", Some(&query))
            .await?;
        expect_json(response, StatusCode::OK).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crm::test_support::client_for;
    use mockito::Matcher;

    #[test]
    fn test_filter_query() {
        let filter = PractitionerFilter {
            location: Some(Coordinates::new("-1.29", "36.79")),
            search: Some(" Wanjiru ".to_string()),
            ..Default::default()
        };

        let query = filter.to_query().unwrap();
        assert_eq!(query.get(QueryKey::RefLocation), Some("-1.29,36.79"));
        assert_eq!(query.get(QueryKey::Distance), None);
        assert_eq!(query.get(QueryKey::Search), Some("Wanjiru"));
    }

    #[tokio::test]
    async fn test_get_practitioners() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/practitioners/practitioners/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "2".into()),
                Matcher::UrlEncoded("page_size".into(), "20".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"count":21,"current_page":2,"results":[{"id":"p-21","first_name":"Jane"}]}"#)
            .create_async()
            .await;

        let crm = client_for(&server.url(), "token");
        let filter = PractitionerFilter {
            pagination: Some(Pagination::new(2, 20)),
            ..Default::default()
        };

        let page = crm.get_practitioners(&filter).await.unwrap();
        assert_eq!(page.current_page, Some(2));
        assert_eq!(page.results[0].id, "p-21");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_practitioner_by_id_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/practitioners/practitioners/missing/")
            .with_status(404)
            .with_body(r#"{"detail":"Not found."}"#)
            .create_async()
            .await;

        let crm = client_for(&server.url(), "token");
        let err = crm.get_practitioner_by_id("missing").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_get_specialties() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/practitioners/specialties/")
            .with_status(200)
            .with_body(r#"{"results":[{"id":"sp-1","name":"Oncology"}]}"#)
            .create_async()
            .await;

        let crm = client_for(&server.url(), "token");
        let page = crm.get_specialties(None).await.unwrap();
        assert_eq!(page.results[0].name, "Oncology");
    }
}
