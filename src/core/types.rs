//! Domain types for WiFi association

use serde::{Deserialize, Serialize};

use crate::core::error::{AssociationError, AssociationResult};

const REDACTED: &str = "******";

/// Secret passphrase for a network association
///
/// The value is never printed: `Debug` and `Display` both render a mask.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Expose the secret for handing it to the platform
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(REDACTED)
    }
}

impl std::fmt::Display for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(REDACTED)
    }
}

/// A request to associate with one access point
///
/// Built only through [`AssociationRequest::new`], which enforces that both
/// fields are non-empty. Immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationRequest {
    ssid: String,
    credential: Credential,
}

impl AssociationRequest {
    pub fn new(ssid: impl Into<String>, credential: Credential) -> AssociationResult<Self> {
        let ssid = ssid.into();

        if ssid.is_empty() {
            return Err(AssociationError::InvalidArgument("SSID missing".into()));
        }

        if credential.is_empty() {
            return Err(AssociationError::InvalidArgument("password missing".into()));
        }

        Ok(Self { ssid, credential })
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}

/// Registration token tying network events to one association request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallbackHandle(uuid::Uuid);

impl CallbackHandle {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for CallbackHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CallbackHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque platform network identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkRef(u64);

impl NetworkRef {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NetworkRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capabilities reported for an available network
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkCapabilities {
    /// Assigned IPv4 address, once known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Whether the network has been validated as usable
    pub validated: bool,
}

/// Connectivity events delivered for a registered callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkEvent {
    Available(NetworkRef),
    Unavailable,
    Lost(NetworkRef),
    CapabilitiesChanged(NetworkRef, NetworkCapabilities),
    BlockedStatusChanged(NetworkRef, bool),
}

impl NetworkEvent {
    /// Network the event refers to, if any
    pub fn network(&self) -> Option<NetworkRef> {
        match self {
            NetworkEvent::Available(network)
            | NetworkEvent::Lost(network)
            | NetworkEvent::CapabilitiesChanged(network, _)
            | NetworkEvent::BlockedStatusChanged(network, _) => Some(*network),
            NetworkEvent::Unavailable => None,
        }
    }
}

/// Lifecycle of a callback registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationState {
    Idle,
    Requested,
    Available,
    Unavailable,
    Lost,
    Released,
}

/// Snapshot of the manager's single request slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationStatus {
    pub state: AssociationState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<CallbackHandle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bound_network: Option<NetworkRef>,
}

/// Acceptance token returned once a request has been submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accepted {
    pub handle: CallbackHandle,
    /// Slot state at the moment the request was accepted
    pub state: AssociationState,
}

/// Session identifier for transport connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_credential_is_redacted() {
        let credential = Credential::new("hunter22");
        assert_eq!(format!("{:?}", credential), "******");
        assert_eq!(credential.to_string(), "******");
        assert_eq!(credential.expose(), "hunter22");
    }

    #[test]
    fn test_association_request_debug_hides_credential() {
        let request = AssociationRequest::new("HomeNet", Credential::new("hunter22")).unwrap();
        let debug = format!("{:?}", request);
        assert!(debug.contains("HomeNet"));
        assert!(!debug.contains("hunter22"));
    }

    #[test]
    fn test_association_request_rejects_empty_fields() {
        assert!(matches!(
            AssociationRequest::new("", Credential::new("pw")),
            Err(AssociationError::InvalidArgument(_))
        ));
        assert!(matches!(
            AssociationRequest::new("HomeNet", Credential::new("")),
            Err(AssociationError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_network_event_network() {
        let net = NetworkRef::new(7);
        assert_eq!(NetworkEvent::Available(net).network(), Some(net));
        assert_eq!(NetworkEvent::Unavailable.network(), None);
        assert_eq!(
            NetworkEvent::BlockedStatusChanged(net, true).network(),
            Some(net)
        );
    }

    #[test]
    fn test_callback_handles_are_unique() {
        assert_ne!(CallbackHandle::new(), CallbackHandle::new());
    }

    #[test]
    fn test_association_state_serialization() {
        let json = serde_json::to_string(&AssociationState::Requested).unwrap();
        assert_eq!(json, r#""requested""#);
    }
}
