//! Transport-agnostic resource endpoint.
//!
//! [`ResourceEndpoint`] is the adapter between an inbound request and a delegate
//! resource manager. Each operation resolves the user manager, builds a fresh
//! delegate, makes exactly one delegate call with the request fields as given, and
//! returns the delegate's [`ScimResponse`](crate::protocol::ScimResponse) unchanged.
//! Delegate errors propagate untouched.
//!
//! # Examples
//!
//! ```rust,no_run
//! use scim_endpoint::endpoint::ResourceEndpoint;
//! use scim_endpoint::manager::{GroupResourceManager, InMemoryUserManager, SharedManager};
//! use scim_endpoint::request::RequestContext;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let locator = SharedManager::new(InMemoryUserManager::new());
//! let endpoint = ResourceEndpoint::new("Group", locator, GroupResourceManager::new);
//!
//! let response = endpoint.get(RequestContext::for_resource("123")).await?;
//! assert_eq!(response.status, 404);
//! # Ok(())
//! # }
//! ```

mod core;

pub use core::{EndpointOperation, ResourceEndpoint};
