//! JSON-RPC 2.0 surface for the incident service
//!
//! Exposes the query engine as server actions over LSP-style framed stdio:
//! - `incidents/query`: `IncidentQuery` in, `IncidentPage` out
//! - `incidents/filter_options`: distinct severities, statuses and types
//! - `incidents/stats`: dashboard aggregates

pub mod methods;
pub mod protocol;
pub mod server;
pub mod transport;

use std::sync::Arc;

pub use methods::{register_incident_methods, ALL_METHODS};
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use server::{JsonRpcServer, MethodHandler};
pub use transport::{FramedTransport, StdioTransport, Transport};

use crate::config::Settings;
use crate::service::IncidentService;

pub const JSONRPC_VERSION: &str = "2.0";

/// Build a server for the configured transport with every incident method registered
pub async fn create_safedesk_server(
    settings: &Settings,
    service: Arc<dyn IncidentService>,
) -> anyhow::Result<JsonRpcServer> {
    let server = match settings.server.transport.as_str() {
        "stdio" => JsonRpcServer::stdio(),
        other => anyhow::bail!("Unsupported transport type: {}", other),
    };

    register_incident_methods(&server, service).await;
    let methods = server.registered_methods().await;
    tracing::debug!(?methods, "Methods registered");
    Ok(server)
}
