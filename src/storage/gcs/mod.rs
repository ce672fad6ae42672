//! Google Cloud Storage backend via the XML interoperability API
//!
//! Requests are authenticated with HMAC credentials and legacy GOOG1
//! signatures, so no OAuth token exchange is needed.

pub mod acl;
pub mod bucket;
pub mod client;
pub mod objects;
pub mod provider;
pub mod request;
pub mod signer;

pub use provider::GcsStorage;
