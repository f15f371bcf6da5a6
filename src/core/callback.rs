//! Network callback dispatch for a single registration

use std::sync::Arc;
use tokio::sync::{Mutex, broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::{
    core::types::{AssociationState, CallbackHandle, NetworkEvent, NetworkRef},
    platform::ConnectivityPlatform,
};

/// The manager's single request slot
///
/// Shared between the initiator side and the dispatch task of the current
/// registration. Every write goes through the surrounding mutex.
#[derive(Debug)]
pub(crate) struct RequestSlot {
    pub(crate) state: AssociationState,
    pub(crate) ssid: Option<String>,
    pub(crate) handle: Option<CallbackHandle>,
    pub(crate) dispatcher: Option<JoinHandle<()>>,
    pub(crate) bound_network: Option<NetworkRef>,
}

impl RequestSlot {
    pub(crate) fn new() -> Self {
        Self {
            state: AssociationState::Idle,
            ssid: None,
            handle: None,
            dispatcher: None,
            bound_network: None,
        }
    }
}

/// A network event tagged with the registration it was delivered for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationEvent {
    pub handle: CallbackHandle,
    pub event: NetworkEvent,
}

/// Dispatches platform events for one registration
pub(crate) struct NetworkCallback<P: ConnectivityPlatform> {
    handle: CallbackHandle,
    platform: Arc<P>,
    slot: Arc<Mutex<RequestSlot>>,
    events_tx: broadcast::Sender<AssociationEvent>,
}

impl<P: ConnectivityPlatform> NetworkCallback<P> {
    pub(crate) fn new(
        handle: CallbackHandle,
        platform: Arc<P>,
        slot: Arc<Mutex<RequestSlot>>,
        events_tx: broadcast::Sender<AssociationEvent>,
    ) -> Self {
        Self {
            handle,
            platform,
            slot,
            events_tx,
        }
    }

    /// Spawn the dispatch loop for this registration's event channel
    pub(crate) fn spawn(self, events: mpsc::Receiver<NetworkEvent>) -> JoinHandle<()> {
        tokio::spawn(self.run(events))
    }

    async fn run(self, mut events: mpsc::Receiver<NetworkEvent>) {
        while let Some(event) = events.recv().await {
            self.on_event(event).await;
        }

        debug!("Event channel closed for callback {}", self.handle);
    }

    /// Apply one event to the slot and the process-wide binding
    ///
    /// `Lost` unbinds whatever is bound, independent of the reported network.
    pub(crate) async fn on_event(&self, event: NetworkEvent) {
        let mut slot = self.slot.lock().await;

        match &event {
            NetworkEvent::Available(network) => {
                info!("Network available: {}", network);
                self.platform.bind_default_network(Some(*network)).await;
                slot.bound_network = Some(*network);
                slot.state = AssociationState::Available;
                debug!("Process bound to network {}", network);
            }
            NetworkEvent::Unavailable => {
                info!("Network request unavailable");
                slot.state = AssociationState::Unavailable;
            }
            NetworkEvent::Lost(network) => {
                info!("Network lost: {}", network);
                self.platform.bind_default_network(None).await;
                slot.bound_network = None;
                slot.state = AssociationState::Lost;
                debug!("Process unbound from network");
            }
            NetworkEvent::CapabilitiesChanged(network, capabilities) => {
                debug!(?capabilities, "Network {} capabilities changed", network);
            }
            NetworkEvent::BlockedStatusChanged(network, blocked) => {
                debug!("Network {} blocked status changed: {}", network, blocked);
            }
        }

        // No subscribers is not an error
        let _ = self.events_tx.send(AssociationEvent {
            handle: self.handle,
            event,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{MockPlatform, PlatformCall};
    use pretty_assertions::assert_eq;

    fn callback(
        platform: &MockPlatform,
    ) -> (
        NetworkCallback<MockPlatform>,
        Arc<Mutex<RequestSlot>>,
        broadcast::Receiver<AssociationEvent>,
    ) {
        let slot = Arc::new(Mutex::new(RequestSlot::new()));
        let (tx, rx) = broadcast::channel(16);
        let callback = NetworkCallback::new(
            CallbackHandle::new(),
            Arc::new(platform.clone()),
            slot.clone(),
            tx,
        );
        (callback, slot, rx)
    }

    #[tokio::test]
    async fn test_available_then_lost() {
        let platform = MockPlatform::new();
        let (callback, slot, _rx) = callback(&platform);
        let net = NetworkRef::new(1);

        callback.on_event(NetworkEvent::Available(net)).await;
        assert_eq!(platform.bound_network(), Some(net));
        assert_eq!(slot.lock().await.state, AssociationState::Available);

        callback.on_event(NetworkEvent::Lost(net)).await;
        assert_eq!(platform.bound_network(), None);
        assert_eq!(slot.lock().await.state, AssociationState::Lost);
        assert_eq!(slot.lock().await.bound_network, None);
    }

    #[tokio::test]
    async fn test_lost_of_other_network_still_unbinds() {
        let platform = MockPlatform::new();
        let (callback, _slot, _rx) = callback(&platform);

        callback
            .on_event(NetworkEvent::Available(NetworkRef::new(1)))
            .await;
        callback.on_event(NetworkEvent::Lost(NetworkRef::new(2))).await;

        assert_eq!(platform.bound_network(), None);
    }

    #[tokio::test]
    async fn test_observational_events_do_not_bind() {
        let platform = MockPlatform::new();
        let (callback, slot, _rx) = callback(&platform);
        let net = NetworkRef::new(3);

        callback.on_event(NetworkEvent::Unavailable).await;
        callback
            .on_event(NetworkEvent::CapabilitiesChanged(net, Default::default()))
            .await;
        callback
            .on_event(NetworkEvent::BlockedStatusChanged(net, true))
            .await;

        assert!(platform.calls().await.is_empty());
        assert_eq!(slot.lock().await.state, AssociationState::Unavailable);
    }

    #[tokio::test]
    async fn test_events_are_broadcast() {
        let platform = MockPlatform::new();
        let (callback, _slot, mut rx) = callback(&platform);
        let net = NetworkRef::new(5);

        callback.on_event(NetworkEvent::Available(net)).await;

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event, NetworkEvent::Available(net));
        assert_eq!(
            platform.calls().await,
            vec![PlatformCall::Bind(Some(net))]
        );
    }
}
