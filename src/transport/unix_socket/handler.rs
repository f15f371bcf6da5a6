//! JSON-RPC request handler for Unix socket transport

use std::sync::Arc;
use tracing::debug;

use crate::{
    core::{manager::NetworkAssociationManager, types::Credential},
    platform::ConnectivityPlatform,
    protocol::{
        ConnectToWifiParams, ConnectToWifiResponse, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
        Request, RequestId, Response, StatusResponse,
    },
};

/// JSON-RPC request handler
pub struct RequestHandler<P: ConnectivityPlatform> {
    manager: Arc<NetworkAssociationManager<P>>,
}

impl<P: ConnectivityPlatform> RequestHandler<P> {
    /// Create a new request handler
    pub fn new(manager: Arc<NetworkAssociationManager<P>>) -> Self {
        Self { manager }
    }

    /// Handle a JSON-RPC request
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.request {
            Request::ConnectToWifi(params) => self.handle_connect_to_wifi(params, request.id).await,
            Request::GetStatus => self.handle_get_status(request.id).await,
        }
    }

    async fn handle_connect_to_wifi(
        &self,
        params: ConnectToWifiParams,
        id: RequestId,
    ) -> JsonRpcResponse {
        debug!(?params, "Handling connect_to_wifi request");

        // Missing values are validated by the manager like empty ones
        let ssid = params.ssid.unwrap_or_default();
        let credential = Credential::new(params.password.unwrap_or_default());

        match self.manager.request(&ssid, credential).await {
            Ok(accepted) => JsonRpcResponse::success(
                Response::ConnectToWifi(ConnectToWifiResponse::accepted(accepted.state)),
                id,
            ),
            Err(e) => JsonRpcResponse::error(JsonRpcError::from(&e), id),
        }
    }

    async fn handle_get_status(&self, id: RequestId) -> JsonRpcResponse {
        let status = self.manager.status().await;
        JsonRpcResponse::success(Response::Status(StatusResponse::ok(status)), id)
    }
}
