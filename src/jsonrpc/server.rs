//! JSON-RPC server implementation with method dispatch
//!
//! Reads framed requests from a [`Transport`], routes them to registered handlers
//! and writes the responses back. Requests are handled one at a time in arrival
//! order until the peer closes the stream.

use anyhow::Result;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use crate::jsonrpc::{
    protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse},
    transport::{StdioTransport, Transport},
};

/// Method handler function signature
/// Takes JSON parameters and returns a JSON result
pub type MethodHandler = Arc<
    dyn Fn(Option<serde_json::Value>) -> BoxFuture<'static, Result<serde_json::Value, JsonRpcError>>
        + Send
        + Sync,
>;

type MethodTable = Arc<Mutex<HashMap<String, MethodHandler>>>;

pub struct JsonRpcServer {
    transport: Box<dyn Transport>,
    methods: MethodTable,
}

impl JsonRpcServer {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            methods: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn stdio() -> Self {
        Self::new(Box::new(StdioTransport::stdio()))
    }

    /// Register a method handler
    pub async fn register_method<F, Fut>(&self, method_name: impl Into<String>, handler: F)
    where
        F: Fn(Option<serde_json::Value>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<serde_json::Value, JsonRpcError>> + Send + 'static,
    {
        let method_name = method_name.into();
        let wrapped_handler: MethodHandler = Arc::new(move |params| Box::pin(handler(params)));

        let mut methods = self.methods.lock().await;
        methods.insert(method_name.clone(), wrapped_handler);

        debug!("Registered method: {}", method_name);
    }

    /// Serve requests until the peer closes the stream
    #[instrument(skip(self))]
    pub async fn serve(&mut self) -> Result<()> {
        info!(
            "Starting JSON-RPC server with {} transport",
            self.transport.description()
        );

        let methods = Arc::clone(&self.methods);

        loop {
            let message = match self.transport.read_message().await {
                Ok(Some(message)) => message,
                Ok(None) => {
                    info!("Client closed the connection");
                    break;
                }
                Err(e) => {
                    // Framing is lost; there is no way to resynchronise the stream
                    error!("Failed to read message: {}", e);
                    let response = JsonRpcResponse::parse_error(&e);
                    if let Err(write_err) = self.transport.write_response(&response).await {
                        error!("Failed to send error response: {}", write_err);
                    }
                    break;
                }
            };

            if let Some(response) = dispatch_message(&methods, &message).await {
                if let Err(e) = self.transport.write_response(&response).await {
                    error!("Failed to send response: {}", e);
                    break;
                }
            }
        }

        if let Err(e) = self.transport.close().await {
            warn!("Failed to close transport: {}", e);
        }
        info!("JSON-RPC server stopped");
        Ok(())
    }

    /// Decode one message body and dispatch it
    pub async fn handle_message(&self, message: &str) -> Option<JsonRpcResponse> {
        dispatch_message(&self.methods, message).await
    }

    /// Process a JSON-RPC request and return a response (if needed)
    pub async fn process_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        dispatch_request(&self.methods, request).await
    }

    pub async fn registered_methods(&self) -> Vec<String> {
        let methods = self.methods.lock().await;
        let mut names: Vec<String> = methods.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn transport_description(&self) -> &'static str {
        self.transport.description()
    }
}

async fn dispatch_message(methods: &MethodTable, message: &str) -> Option<JsonRpcResponse> {
    let value: serde_json::Value = match serde_json::from_str(message) {
        Ok(value) => value,
        Err(e) => {
            warn!("Malformed JSON-RPC message: {}", e);
            return Some(JsonRpcResponse::parse_error(e));
        }
    };

    let id = value.get("id").cloned();
    match serde_json::from_value::<JsonRpcRequest>(value) {
        Ok(request) => dispatch_request(methods, request).await,
        Err(e) => Some(JsonRpcResponse::invalid_request(e, id)),
    }
}

async fn dispatch_request(methods: &MethodTable, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
    let request_id = request.id.clone();
    let is_notification = request.is_notification();

    debug!(method = %request.method, id = ?request_id, "Dispatching request");

    if let Err(error) = request.validate() {
        if is_notification {
            warn!("Invalid notification: {}", error.message);
            return None;
        }
        return Some(JsonRpcResponse::error(error, request_id));
    }

    let handler = {
        let methods = methods.lock().await;
        methods.get(&request.method).cloned()
    };

    let Some(handler) = handler else {
        if is_notification {
            warn!("Method not found for notification: {}", request.method);
            return None;
        }
        return Some(JsonRpcResponse::method_not_found(&request.method, request_id));
    };

    match handler(request.params).await {
        Ok(_) if is_notification => None,
        Ok(result) => Some(JsonRpcResponse::success(result, request_id)),
        Err(error) => {
            if is_notification {
                error!(
                    "Error in notification handler for {}: {}",
                    request.method, error.message
                );
                return None;
            }
            warn!(method = %request.method, code = error.code, "Request failed: {}", error.message);
            Some(JsonRpcResponse::error(error, request_id))
        }
    }
}
