//! JSON-RPC method names and their handlers

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::jsonrpc::protocol::{error_codes, JsonRpcError};
use crate::jsonrpc::server::JsonRpcServer;
use crate::models::IncidentQuery;
use crate::service::IncidentService;

pub const QUERY_INCIDENTS: &str = "incidents/query";
pub const FILTER_OPTIONS: &str = "incidents/filter_options";
pub const DASHBOARD_STATS: &str = "incidents/stats";

/// All supported JSON-RPC methods
pub const ALL_METHODS: &[&str] = &[QUERY_INCIDENTS, FILTER_OPTIONS, DASHBOARD_STATS];

/// Register the incident methods against `service`
///
/// `incidents/query` accepts the query object directly as params:
/// ```json
/// {
///   "pagination": { "pageIndex": 0, "pageSize": 10 },
///   "sorting": [{ "id": "date", "desc": true }],
///   "columnFilters": [{ "id": "severity", "value": ["High"] }],
///   "globalFilter": "warehouse"
/// }
/// ```
/// Missing params mean the default query.
pub async fn register_incident_methods(server: &JsonRpcServer, service: Arc<dyn IncidentService>) {
    {
        let service = Arc::clone(&service);
        server
            .register_method(QUERY_INCIDENTS, move |params| {
                let service = Arc::clone(&service);
                async move {
                    let query: IncidentQuery = parse_params(params)?;
                    let page = service.get_incidents(query).await?;
                    to_result(&page)
                }
            })
            .await;
    }

    {
        let service = Arc::clone(&service);
        server
            .register_method(FILTER_OPTIONS, move |_params| {
                let service = Arc::clone(&service);
                async move { to_result(&service.get_filter_options().await?) }
            })
            .await;
    }

    server
        .register_method(DASHBOARD_STATS, move |_params| {
            let service = Arc::clone(&service);
            async move { to_result(&service.get_dashboard_stats().await?) }
        })
        .await;

    tracing::info!("Registered {} incident JSON-RPC methods", ALL_METHODS.len());
}

fn parse_params<T>(params: Option<serde_json::Value>) -> Result<T, JsonRpcError>
where
    T: DeserializeOwned + Default,
{
    match params {
        None | Some(serde_json::Value::Null) => {
            debug!("No params supplied, using defaults");
            Ok(T::default())
        }
        Some(value) => {
            serde_json::from_value(value.clone()).map_err(|e| create_parse_error::<T>(&e, &value))
        }
    }
}

fn to_result<T: Serialize>(value: &T) -> Result<serde_json::Value, JsonRpcError> {
    serde_json::to_value(value).map_err(JsonRpcError::internal)
}

/// Invalid-params error naming the expected type and the fields actually received
pub(crate) fn create_parse_error<T>(
    error: &serde_json::Error,
    params: &serde_json::Value,
) -> JsonRpcError {
    let type_name = std::any::type_name::<T>()
        .rsplit("::")
        .next()
        .unwrap_or("Request");

    let received_fields: Vec<&str> = match params {
        serde_json::Value::Object(map) => map.keys().map(|s| s.as_str()).collect(),
        _ => vec![],
    };

    let hint = if received_fields.is_empty() {
        "No parameters provided".to_string()
    } else {
        format!("Received fields: {}", received_fields.join(", "))
    };

    JsonRpcError::custom(
        error_codes::INVALID_PARAMS,
        format!("Invalid {}: {}. {}", type_name, error, hint),
        Some(serde_json::json!({
            "parse_error": error.to_string(),
            "received": params,
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::jsonrpc::transport::FramedTransport;
    use crate::service::MockIncidentService;

    #[tokio::test]
    async fn test_registers_every_incident_method() {
        let (_client, server_end) = tokio::io::duplex(1024);
        let (read, write) = tokio::io::split(server_end);
        let server = JsonRpcServer::new(Box::new(FramedTransport::new(read, write, "duplex")));

        register_incident_methods(&server, Arc::new(MockIncidentService::new())).await;

        let mut expected: Vec<String> = ALL_METHODS.iter().map(|m| m.to_string()).collect();
        expected.sort();
        assert_eq!(server.registered_methods().await, expected);
    }

    #[tokio::test]
    async fn test_service_errors_keep_their_code() {
        let (_client, server_end) = tokio::io::duplex(1024);
        let (read, write) = tokio::io::split(server_end);
        let server = JsonRpcServer::new(Box::new(FramedTransport::new(read, write, "duplex")));

        let mut service = MockIncidentService::new();
        service
            .expect_get_dashboard_stats()
            .returning(|| Err(crate::SafedeskError::service("backend unavailable")));
        register_incident_methods(&server, Arc::new(service)).await;

        let request = crate::jsonrpc::JsonRpcRequest::new(
            DASHBOARD_STATS,
            None,
            Some(serde_json::json!(1)),
        );
        let response = server.process_request(request).await.unwrap();
        assert!(response.is_error());
        assert_eq!(
            response.error.unwrap().code,
            crate::SafedeskError::service("backend unavailable").error_code()
        );
    }

    #[test]
    fn test_serialization_failure_is_internal_error() {
        let mut map = std::collections::HashMap::new();
        map.insert(vec![1u8], 1);
        let error = to_result(&map).unwrap_err();
        assert_eq!(error.code, error_codes::INTERNAL_ERROR);
        assert!(error.message.starts_with("Internal error"));
    }

    #[test]
    fn test_missing_params_use_default_query() {
        let query: IncidentQuery = parse_params(None).unwrap();
        assert_eq!(query, IncidentQuery::default());
    }

    #[test]
    fn test_parse_error_lists_received_fields() {
        let params = serde_json::json!({ "pagination": { "pageIndex": "first" } });
        let error = parse_params::<IncidentQuery>(Some(params)).unwrap_err();

        assert_eq!(error.code, error_codes::INVALID_PARAMS);
        assert!(error.message.starts_with("Invalid IncidentQuery"));
        assert!(error.message.contains("Received fields: pagination"));
    }
}
