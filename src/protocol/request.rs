//! Request message types

use serde::{Deserialize, Serialize};

/// Request messages from client to server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "method", content = "params")]
#[serde(rename_all = "snake_case")]
pub enum Request {
    /// Request association with a WiFi network
    ConnectToWifi(ConnectToWifiParams),

    /// Get association status
    GetStatus,
}

impl Request {
    /// Method names this server understands
    pub const METHODS: &'static [&'static str] = &["connect_to_wifi", "get_status"];
}

/// Parameters for connect_to_wifi request
///
/// Both fields are optional on the wire so that a missing value is
/// reported as an invalid argument rather than a malformed request.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectToWifiParams {
    /// Network SSID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,

    /// WPA2 passphrase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl std::fmt::Debug for ConnectToWifiParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectToWifiParams")
            .field("ssid", &self.ssid)
            .field("password", &self.password.as_ref().map(|_| "******"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_get_status() {
        let request = Request::GetStatus;
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"method":"get_status"}"#);
    }

    #[test]
    fn test_request_connect_serialization() {
        let request = Request::ConnectToWifi(ConnectToWifiParams {
            ssid: Some("HomeNet".to_string()),
            password: Some("hunter22".to_string()),
        });

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""method":"connect_to_wifi""#));
        assert!(json.contains(r#""ssid":"HomeNet""#));

        let deserialized: Request = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, request);
    }

    #[test]
    fn test_request_connect_missing_fields() {
        let json = r#"{"method":"connect_to_wifi","params":{"ssid":null}}"#;
        let request: Request = serde_json::from_str(json).unwrap();

        assert_eq!(
            request,
            Request::ConnectToWifi(ConnectToWifiParams::default())
        );
    }

    #[test]
    fn test_connect_params_debug_redacts_password() {
        let params = ConnectToWifiParams {
            ssid: Some("HomeNet".to_string()),
            password: Some("hunter22".to_string()),
        };

        let debug = format!("{:?}", params);
        assert!(debug.contains("HomeNet"));
        assert!(!debug.contains("hunter22"));
    }

    #[test]
    fn test_methods_match_serialized_names() {
        let connect = serde_json::to_value(Request::ConnectToWifi(Default::default())).unwrap();
        let status = serde_json::to_value(Request::GetStatus).unwrap();

        assert!(Request::METHODS.contains(&connect["method"].as_str().unwrap()));
        assert!(Request::METHODS.contains(&status["method"].as_str().unwrap()));
    }
}
