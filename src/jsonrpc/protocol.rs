//! JSON-RPC 2.0 message types
//!
//! Just enough of the protocol for request/response over an LSP-style framed stream.
//! Batches and server-initiated notifications are not used.

use serde::{Deserialize, Serialize};

use crate::jsonrpc::JSONRPC_VERSION;
use crate::SafedeskError;

/// JSON-RPC 2.0 Request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
    /// Request ID (string or number); absent for notifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 Response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    /// Null when the request id could not be determined
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 Error object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

impl JsonRpcRequest {
    pub fn new(
        method: impl Into<String>,
        params: Option<serde_json::Value>,
        id: Option<serde_json::Value>,
    ) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }

    /// Check if this is a notification (no response expected)
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    pub fn validate(&self) -> Result<(), JsonRpcError> {
        if self.jsonrpc != JSONRPC_VERSION {
            return Err(JsonRpcError::new(
                error_codes::INVALID_REQUEST,
                "Invalid JSON-RPC version",
            ));
        }

        if self.method.is_empty() {
            return Err(JsonRpcError::new(
                error_codes::INVALID_REQUEST,
                "Method name cannot be empty",
            ));
        }

        if self.method.starts_with("rpc.") {
            return Err(JsonRpcError::new(
                error_codes::INVALID_REQUEST,
                "Method names starting with 'rpc.' are reserved",
            ));
        }

        Ok(())
    }
}

impl JsonRpcResponse {
    pub fn success(result: serde_json::Value, id: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(error: JsonRpcError, id: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }

    pub fn parse_error(detail: impl std::fmt::Display) -> Self {
        Self::error(
            JsonRpcError::new(error_codes::PARSE_ERROR, format!("Parse error: {}", detail)),
            None,
        )
    }

    pub fn invalid_request(detail: impl std::fmt::Display, id: Option<serde_json::Value>) -> Self {
        Self::error(
            JsonRpcError::new(
                error_codes::INVALID_REQUEST,
                format!("Invalid Request: {}", detail),
            ),
            id,
        )
    }

    pub fn method_not_found(method: &str, id: Option<serde_json::Value>) -> Self {
        Self::error(
            JsonRpcError::custom(
                error_codes::METHOD_NOT_FOUND,
                "Method not found".to_string(),
                Some(serde_json::json!({ "method": method })),
            ),
            id,
        )
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl JsonRpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create a custom application error
    pub fn custom(code: i32, message: String, data: Option<serde_json::Value>) -> Self {
        Self { code, message, data }
    }

    pub fn internal(message: impl std::fmt::Display) -> Self {
        Self::new(
            error_codes::INTERNAL_ERROR,
            format!("Internal error: {}", message),
        )
    }
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

/// Convert SafedeskError to a JSON-RPC error carrying the application code
impl From<SafedeskError> for JsonRpcError {
    fn from(error: SafedeskError) -> Self {
        let data = match &error {
            SafedeskError::Dataset {
                incident_id: Some(id),
                ..
            } => Some(serde_json::json!({ "incident_id": id })),
            _ => None,
        };

        JsonRpcError {
            code: error.error_code(),
            message: error.user_message(),
            data,
        }
    }
}
