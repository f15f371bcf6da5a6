//! Notification message types (server-to-client events)

use serde::{Deserialize, Serialize};

use crate::core::{
    callback::AssociationEvent,
    types::{CallbackHandle, NetworkCapabilities, NetworkEvent, NetworkRef},
};

/// Server-to-client notifications
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "method", content = "params")]
#[serde(rename_all = "snake_case")]
pub enum Notification {
    /// A connectivity event was dispatched for the current request
    NetworkEvent(NetworkEventParams),
}

/// Kind of connectivity event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkEventKind {
    Available,
    Unavailable,
    Lost,
    CapabilitiesChanged,
    BlockedStatusChanged,
}

/// Network event notification parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkEventParams {
    pub event: NetworkEventKind,
    pub handle: CallbackHandle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<NetworkCapabilities>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,
}

impl From<&AssociationEvent> for Notification {
    fn from(event: &AssociationEvent) -> Self {
        let (kind, capabilities, blocked) = match &event.event {
            NetworkEvent::Available(_) => (NetworkEventKind::Available, None, None),
            NetworkEvent::Unavailable => (NetworkEventKind::Unavailable, None, None),
            NetworkEvent::Lost(_) => (NetworkEventKind::Lost, None, None),
            NetworkEvent::CapabilitiesChanged(_, capabilities) => (
                NetworkEventKind::CapabilitiesChanged,
                Some(capabilities.clone()),
                None,
            ),
            NetworkEvent::BlockedStatusChanged(_, blocked) => {
                (NetworkEventKind::BlockedStatusChanged, None, Some(*blocked))
            }
        };

        Notification::NetworkEvent(NetworkEventParams {
            event: kind,
            handle: event.handle,
            network: event.event.network(),
            capabilities,
            blocked,
        })
    }
}
