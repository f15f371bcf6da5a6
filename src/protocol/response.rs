//! Response message types

use serde::{Deserialize, Serialize};

use crate::core::types::{AssociationState, AssociationStatus};

/// Response messages from server to client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Response {
    /// Association request accepted
    ConnectToWifi(ConnectToWifiResponse),

    /// Status response
    Status(StatusResponse),
}

/// Response for connect_to_wifi request
///
/// `accepted` means submitted. The association itself is reported later
/// through `network_event` notifications.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectToWifiResponse {
    pub status: String,
    pub accepted: bool,
    pub state: AssociationState,
}

/// Response for get_status request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
    #[serde(flatten)]
    pub association: AssociationStatus,
}

impl ConnectToWifiResponse {
    pub fn accepted(state: AssociationState) -> Self {
        Self {
            status: "ok".to_string(),
            accepted: true,
            state,
        }
    }
}

impl StatusResponse {
    pub fn ok(association: AssociationStatus) -> Self {
        Self {
            status: "ok".to_string(),
            association,
        }
    }
}
