//! JSON-RPC 2.0 message envelope

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    core::error::AssociationError,
    protocol::{notification::Notification, request::Request, response::Response},
};

/// JSON-RPC 2.0 request wrapper
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(flatten)]
    pub request: Request,
    pub id: RequestId,
}

/// JSON-RPC 2.0 response wrapper
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Response>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: RequestId,
}

/// JSON-RPC 2.0 notification wrapper
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonRpcNotification {
    pub jsonrpc: String,
    #[serde(flatten)]
    pub notification: Notification,
}

/// Request ID (number, string, or null when it could not be determined)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
    Null,
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Standard JSON-RPC error codes
impl JsonRpcError {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;

    // Custom error codes
    pub const UNSUPPORTED_PLATFORM: i32 = -32001;
    pub const BACKEND_ERROR: i32 = -32003;

    pub fn parse_error() -> Self {
        Self {
            code: Self::PARSE_ERROR,
            message: "Parse error".to_string(),
            data: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            code: Self::INVALID_REQUEST,
            message: message.into(),
            data: None,
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: Self::METHOD_NOT_FOUND,
            message: format!("Method not found: {}", method),
            data: None,
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: Self::INVALID_PARAMS,
            message: message.into(),
            data: Some(json!({ "kind": "INVALID_ARGS" })),
        }
    }

    pub fn unsupported_platform() -> Self {
        Self {
            code: Self::UNSUPPORTED_PLATFORM,
            message: "Platform does not support WiFi association requests".to_string(),
            data: Some(json!({ "kind": "UNSUPPORTED_VERSION" })),
        }
    }

    pub fn backend_error(message: impl Into<String>) -> Self {
        Self {
            code: Self::BACKEND_ERROR,
            message: message.into(),
            data: None,
        }
    }
}

impl From<&AssociationError> for JsonRpcError {
    fn from(error: &AssociationError) -> Self {
        match error {
            AssociationError::InvalidArgument(_) => Self::invalid_params(error.to_string()),
            AssociationError::UnsupportedPlatform => Self::unsupported_platform(),
            AssociationError::SubmissionFailed(_) => Self::backend_error(error.to_string()),
        }
    }
}

impl JsonRpcRequest {
    pub fn new(request: Request, id: RequestId) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            request,
            id,
        }
    }

    /// Parse one request line
    ///
    /// A `connect_to_wifi` call without `params` is read as one with empty
    /// params, so missing arguments reach argument validation.
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line).or_else(|e| {
            let mut value: Value = serde_json::from_str(line)?;

            let bare_connect = value.get("method").and_then(Value::as_str)
                == Some("connect_to_wifi")
                && value.get("params").is_none();
            if !bare_connect {
                return Err(e);
            }

            if let Some(object) = value.as_object_mut() {
                object.insert("params".to_string(), json!({}));
            }
            serde_json::from_value(value)
        })
    }
}

impl JsonRpcResponse {
    pub fn success(result: Response, id: RequestId) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(error: JsonRpcError, id: RequestId) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }

    /// Build the error response for a line that is not a valid request
    ///
    /// Distinguishes unparseable JSON, a non-request object, an unknown
    /// method and a known method with unusable params.
    pub fn rejecting(line: &str) -> Self {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(_) => return Self::error(JsonRpcError::parse_error(), RequestId::Null),
        };

        let id = value
            .get("id")
            .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok())
            .unwrap_or(RequestId::Null);

        let error = match value.get("method").and_then(Value::as_str) {
            None => JsonRpcError::invalid_request("Missing method"),
            Some(method) if Request::METHODS.contains(&method) => {
                if value.get("id").is_none() {
                    JsonRpcError::invalid_request("Missing id")
                } else {
                    JsonRpcError::invalid_params(format!("Invalid params for {}", method))
                }
            }
            Some(method) => JsonRpcError::method_not_found(method),
        };

        Self::error(error, id)
    }
}

impl JsonRpcNotification {
    pub fn new(notification: Notification) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            notification,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{
            callback::AssociationEvent,
            error::PlatformError,
            types::{AssociationState, CallbackHandle, NetworkEvent, NetworkRef},
        },
        protocol::{request::ConnectToWifiParams, response::ConnectToWifiResponse},
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn test_jsonrpc_request_serialization() {
        let request = JsonRpcRequest::new(Request::GetStatus, RequestId::Number(1));
        let json = serde_json::to_string(&request).unwrap();

        assert!(json.contains(r#""jsonrpc":"2.0""#));
        assert!(json.contains(r#""method":"get_status""#));
        assert!(json.contains(r#""id":1"#));

        let deserialized: JsonRpcRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, request);
    }

    #[test]
    fn test_jsonrpc_connect_request_from_client_json() {
        let json = r#"{"jsonrpc":"2.0","method":"connect_to_wifi","params":{"ssid":"HomeNet","password":"hunter22"},"id":"abc-123"}"#;
        let request: JsonRpcRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.id, RequestId::String("abc-123".to_string()));
        assert_eq!(
            request.request,
            Request::ConnectToWifi(ConnectToWifiParams {
                ssid: Some("HomeNet".to_string()),
                password: Some("hunter22".to_string()),
            })
        );
    }

    #[test]
    fn test_jsonrpc_response_success() {
        let response = JsonRpcResponse::success(
            Response::ConnectToWifi(ConnectToWifiResponse::accepted(AssociationState::Requested)),
            RequestId::Number(1),
        );
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains(r#""result""#));
        assert!(json.contains(r#""accepted":true"#));
        assert!(!json.contains(r#""error""#));

        let deserialized: JsonRpcResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, response);
    }

    #[test]
    fn test_jsonrpc_response_error() {
        let response =
            JsonRpcResponse::error(JsonRpcError::unsupported_platform(), RequestId::Number(1));
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains(r#""code":-32001"#));
        assert!(json.contains(r#""kind":"UNSUPPORTED_VERSION""#));
        assert!(!json.contains(r#""result""#));
    }

    #[test]
    fn test_jsonrpc_notification() {
        let notif = JsonRpcNotification::new(Notification::from(&AssociationEvent {
            handle: CallbackHandle::new(),
            event: NetworkEvent::Lost(NetworkRef::new(1)),
        }));
        let json = serde_json::to_string(&notif).unwrap();

        assert!(json.contains(r#""method":"network_event""#));
        assert!(!json.contains(r#""id""#)); // notifications don't have id

        let deserialized: JsonRpcNotification = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, notif);
    }

    #[test]
    fn test_error_from_association_error() {
        let err = JsonRpcError::from(&AssociationError::InvalidArgument("SSID missing".into()));
        assert_eq!(err.code, JsonRpcError::INVALID_PARAMS);
        assert_eq!(err.data, Some(json!({ "kind": "INVALID_ARGS" })));

        let err = JsonRpcError::from(&AssociationError::UnsupportedPlatform);
        assert_eq!(err.code, JsonRpcError::UNSUPPORTED_PLATFORM);

        let err = JsonRpcError::from(&AssociationError::SubmissionFailed(
            PlatformError::RegistrationFailed("busy".into()),
        ));
        assert_eq!(err.code, JsonRpcError::BACKEND_ERROR);
    }

    #[test]
    fn test_rejecting_parse_error() {
        let response = JsonRpcResponse::rejecting("{not json");
        assert_eq!(response.id, RequestId::Null);
        assert_eq!(response.error.unwrap().code, JsonRpcError::PARSE_ERROR);

        let json = serde_json::to_string(&JsonRpcResponse::rejecting("{not json")).unwrap();
        assert!(json.contains(r#""id":null"#));
    }

    #[test]
    fn test_rejecting_unknown_method() {
        let response = JsonRpcResponse::rejecting(r#"{"jsonrpc":"2.0","method":"scan","id":7}"#);
        assert_eq!(response.id, RequestId::Number(7));
        assert_eq!(response.error.unwrap().code, JsonRpcError::METHOD_NOT_FOUND);
    }

    #[test]
    fn test_rejecting_connect_without_params() {
        let response =
            JsonRpcResponse::rejecting(r#"{"jsonrpc":"2.0","method":"connect_to_wifi","id":2}"#);
        assert_eq!(response.id, RequestId::Number(2));
        assert_eq!(response.error.unwrap().code, JsonRpcError::INVALID_PARAMS);
    }

    #[test]
    fn test_parse_connect_without_params() {
        let request =
            JsonRpcRequest::parse(r#"{"jsonrpc":"2.0","method":"connect_to_wifi","id":2}"#)
                .unwrap();

        assert_eq!(request.id, RequestId::Number(2));
        assert_eq!(
            request.request,
            Request::ConnectToWifi(ConnectToWifiParams::default())
        );
    }

    #[test]
    fn test_parse_keeps_other_failures() {
        assert!(JsonRpcRequest::parse("{not json").is_err());
        assert!(JsonRpcRequest::parse(r#"{"jsonrpc":"2.0","method":"scan","id":1}"#).is_err());
        assert!(JsonRpcRequest::parse(r#"{"jsonrpc":"2.0","method":"connect_to_wifi"}"#).is_err());
    }

    #[test]
    fn test_rejecting_missing_method() {
        let response = JsonRpcResponse::rejecting(r#"{"jsonrpc":"2.0","id":3}"#);
        assert_eq!(response.error.unwrap().code, JsonRpcError::INVALID_REQUEST);
    }
}
