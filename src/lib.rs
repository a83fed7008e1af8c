// Health CRM client library
//
// Typed async access to the Health CRM facility, service, practitioner and
// identity endpoints, with OAuth2 token handling built in.

pub mod auth;
pub mod config;
pub mod crm;
pub mod error;
pub mod http_client;
pub mod models;
pub mod query;

pub use auth::{Credentials, TokenManager};
pub use config::{Config, RefreshMode};
pub use crm::{FacilityFilter, HealthCrm, PractitionerFilter};
pub use error::{HealthCrmError, Result};
