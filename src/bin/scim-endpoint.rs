//! # SCIM Endpoint Server
//!
//! Serves a SCIM `/Groups` collection backed by the in-memory group manager.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin scim-endpoint -- --port 8080
//! RUST_LOG=debug SCIM_BASE_PATH=/scim/v2 cargo run --bin scim-endpoint
//! ```
//!
//! Flags override the `SCIM_HOST`, `SCIM_PORT` and `SCIM_BASE_PATH` environment
//! variables, which override the built-in defaults.

use clap::Parser;
use scim_endpoint::{ScimHttpServer, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "scim-endpoint", version, about = "SCIM 2.0 Groups endpoint")]
struct Args {
    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to
    #[arg(long, short)]
    port: Option<u16>,

    /// Path prefix of the SCIM collections
    #[arg(long)]
    base_path: Option<String>,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    if let Err(e) = run(Args::parse()).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), scim_endpoint::BuildError> {
    let mut config = ServerConfig::from_env()?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(base_path) = args.base_path {
        config.base_path = base_path;
    }

    ScimHttpServer::in_memory(config)?.start().await
}
