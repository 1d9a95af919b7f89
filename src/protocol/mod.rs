//! SCIM protocol envelope shared by the adapter and its delegates.
//!
//! - [`ScimResponse`] - status, headers and opaque body produced by a resource manager
//! - [`constants`] - query parameter names, media types and message schema URIs

pub mod constants;
mod response;

pub use response::ScimResponse;
