//! HTTP endpoint adapter for SCIM 2.0 resource collections.
//!
//! The crate fronts a delegate resource manager with the six SCIM interactions of a
//! collection (get, list, create, search, replace, delete). The adapter itself is
//! thin: it builds a per-call [`RequestContext`], makes one delegate call and passes
//! the delegate's [`ScimResponse`] through unchanged. Protocol semantics live in the
//! delegate.
//!
//! # Core Components
//!
//! - [`ResourceEndpoint`] - transport-agnostic adapter
//! - [`ResourceManager`] - trait implemented by delegate resource managers
//! - [`ManagerLocator`] - injected source of the user manager
//! - [`http`] - axum routes and response conversion
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use scim_endpoint::{ScimHttpServer, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = ScimHttpServer::in_memory(ServerConfig::with_port(8080))?;
//! server.start().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod manager;
pub mod protocol;
pub mod request;
pub mod server;

// Re-export commonly used types for convenience
pub use config::{ResourceNames, ServerConfig};
pub use endpoint::{EndpointOperation, ResourceEndpoint};
pub use error::{BuildError, ErrorKind, ScimError, ScimResult};
pub use manager::{
    GroupResourceManager, InMemoryUserManager, ManagerLocator, ResourceManager,
    ResourceManagerFactory, SharedManager, UserManager,
};
pub use protocol::ScimResponse;
pub use request::{QueryParams, RequestContext};
pub use server::ScimHttpServer;
