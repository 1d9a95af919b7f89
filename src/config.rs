//! Server configuration.
//!
//! Defaults can be overridden from the environment (`SCIM_HOST`, `SCIM_PORT`,
//! `SCIM_BASE_PATH`) and then from command-line flags in the binary.

use crate::error::{BuildError, BuildResult};
use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path prefix of all SCIM collections (default: "/scim/v2")
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Names of the served resource type
    #[serde(default)]
    pub resource: ResourceNames,
}

/// Singular and plural name of a resource type, e.g. `Group` / `Groups`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNames {
    pub singular: String,
    pub plural: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_base_path() -> String {
    "/scim/v2".to_string()
}

impl Default for ResourceNames {
    fn default() -> Self {
        Self {
            singular: "Group".to_string(),
            plural: "Groups".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_path: default_base_path(),
            resource: ResourceNames::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Build a config from defaults overridden by environment variables.
    pub fn from_env() -> BuildResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> BuildResult<Self> {
        let mut config = Self::default();
        if let Some(host) = lookup("SCIM_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("SCIM_PORT") {
            config.port = port.parse().map_err(|_| BuildError::InvalidConfiguration {
                message: format!("SCIM_PORT must be a port number, got '{}'", port),
            })?;
        }
        if let Some(base_path) = lookup("SCIM_BASE_PATH") {
            config.base_path = base_path;
        }
        Ok(config)
    }

    /// Check the values that cannot be expressed in the types.
    pub fn validate(&self) -> BuildResult<()> {
        if !self.base_path.starts_with('/') {
            return Err(BuildError::InvalidConfiguration {
                message: format!("base path must start with '/', got '{}'", self.base_path),
            });
        }
        if self.resource.singular.trim().is_empty() || self.resource.plural.trim().is_empty() {
            return Err(BuildError::InvalidConfiguration {
                message: "resource names cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Path of the resource collection, e.g. `/scim/v2/Groups`.
    pub fn collection_path(&self) -> String {
        format!(
            "{}/{}",
            self.base_path.trim_end_matches('/'),
            self.resource.plural
        )
    }
}
