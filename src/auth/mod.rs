// Authentication module
// Manages the OAuth2 token lifecycle for the Health CRM

mod exchange;
mod manager;
mod types;

pub use manager::TokenManager;
pub use types::Credentials;
