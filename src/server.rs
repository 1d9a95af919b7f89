//! HTTP server hosting one SCIM resource collection.

use crate::config::ServerConfig;
use crate::endpoint::ResourceEndpoint;
use crate::error::{BuildError, BuildResult};
use crate::http;
use crate::manager::{GroupResourceManager, InMemoryUserManager, SharedManager};
use axum::Router;
use log::info;
use tokio::net::TcpListener;

/// SCIM endpoint server
pub struct ScimHttpServer {
    config: ServerConfig,
    router: Router,
}

impl ScimHttpServer {
    /// Create a server around a prebuilt router, e.g. from [`http::app`].
    pub fn new(config: ServerConfig, router: Router) -> BuildResult<Self> {
        config.validate()?;
        Ok(Self { config, router })
    }

    /// Create a server for Groups backed by the in-memory user manager.
    pub fn in_memory(config: ServerConfig) -> BuildResult<Self> {
        config.validate()?;
        let collection_path = config.collection_path();
        let location_base = collection_path.clone();
        let endpoint = ResourceEndpoint::new(
            config.resource.singular.clone(),
            SharedManager::new(InMemoryUserManager::new()),
            move || GroupResourceManager::new().with_location_base(location_base.clone()),
        );
        let router = http::app(&collection_path, endpoint);
        Ok(Self { config, router })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the process is stopped.
    pub async fn start(self) -> BuildResult<()> {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        info!(
            "SCIM endpoint listening on {} at {}",
            listener.local_addr()?,
            self.config.collection_path()
        );
        axum::serve(listener, self.router)
            .await
            .map_err(BuildError::from)
    }
}
