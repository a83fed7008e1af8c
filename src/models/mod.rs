// Data models for the Health CRM JSON shapes

pub mod common;
pub mod enums;
pub mod facility;
pub mod practitioner;
pub mod profile;
pub mod service;

pub use common::{Page, Pagination};
pub use enums::{ContactType, GenderType, IdentifierType};
pub use facility::{
    BusinessHours, BusinessHoursOutput, Contact, ContactOutput, Coordinates, CoordinatesOutput,
    Facility, FacilityOutput, Identifier, IdentifierOutput,
};
pub use practitioner::{Practitioner, PractitionerFacility, Specialty};
pub use profile::{
    MatchProfileInput, ProfileContactInput, ProfileContactOutput, ProfileIdentifierInput,
    ProfileIdentifierOutput, ProfileInput, ProfileOutput, VerifyIdentifierInput,
    VerifyIdentifierOutput,
};
pub use service::{FacilityService, FacilityServiceInput, ServiceIdentifier, ServiceIdentifierInput};
