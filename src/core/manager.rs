//! Network association manager with single-slot callback ownership

use std::sync::Arc;
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, error, info, warn};

use crate::{
    core::{
        callback::{AssociationEvent, NetworkCallback, RequestSlot},
        error::{AssociationError, AssociationResult},
        types::{
            Accepted, AssociationRequest, AssociationState, AssociationStatus, CallbackHandle,
            Credential,
        },
    },
    platform::ConnectivityPlatform,
};

const EVENT_BROADCAST_CAPACITY: usize = 64;

/// Owns at most one outstanding association request and its callback
///
/// `request`, `teardown` and event dispatch all serialize on one slot lock,
/// so releasing the previous handle and registering the next one can never
/// interleave with a callback.
pub struct NetworkAssociationManager<P: ConnectivityPlatform> {
    platform: Arc<P>,
    slot: Arc<Mutex<RequestSlot>>,
    events_tx: broadcast::Sender<AssociationEvent>,
}

impl<P: ConnectivityPlatform> NetworkAssociationManager<P> {
    /// Create a new manager on top of a connectivity platform
    pub fn new(platform: Arc<P>) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_BROADCAST_CAPACITY);

        Self {
            platform,
            slot: Arc::new(Mutex::new(RequestSlot::new())),
            events_tx,
        }
    }

    /// Request association with `ssid` using `credential`
    ///
    /// Returns once the request is submitted, not once the network is
    /// associated. Results are delivered later through [`Self::subscribe`]
    /// and the process default-network binding.
    pub async fn request(
        &self,
        ssid: &str,
        credential: Credential,
    ) -> AssociationResult<Accepted> {
        debug!(
            "Received association request - SSID: {}, Password: {}",
            ssid, credential
        );

        if !self.platform.supports_association_request() {
            error!("Platform does not support association requests");
            return Err(AssociationError::UnsupportedPlatform);
        }

        let request = AssociationRequest::new(ssid, credential).inspect_err(|e| {
            error!("Rejecting association request: {}", e);
        })?;

        let mut slot = self.slot.lock().await;

        if let Some(previous) = slot.handle.take() {
            Self::release_locked(&self.platform, &mut slot, previous).await;
        }

        let registration = self
            .platform
            .submit_association_request(&request)
            .await
            .inspect_err(|e| {
                error!("Failed to submit association request: {}", e);
            })?;

        let handle = registration.handle;
        let callback = NetworkCallback::new(
            handle,
            self.platform.clone(),
            self.slot.clone(),
            self.events_tx.clone(),
        );

        slot.dispatcher = Some(callback.spawn(registration.events));
        slot.handle = Some(handle);
        slot.ssid = Some(request.ssid().to_string());
        slot.state = AssociationState::Requested;

        info!(
            "Association request for {} submitted with callback {}",
            request.ssid(),
            handle
        );

        Ok(Accepted {
            handle,
            state: slot.state,
        })
    }

    /// Release the live callback handle, if any
    pub async fn teardown(&self) {
        let mut slot = self.slot.lock().await;

        match slot.handle.take() {
            Some(handle) => Self::release_locked(&self.platform, &mut slot, handle).await,
            None => debug!("No callback registered, nothing to tear down"),
        }
    }

    /// Snapshot of the current request slot
    pub async fn status(&self) -> AssociationStatus {
        let slot = self.slot.lock().await;

        AssociationStatus {
            state: slot.state,
            ssid: slot.ssid.clone(),
            handle: slot.handle,
            bound_network: slot.bound_network,
        }
    }

    /// Current lifecycle state of the request slot
    pub async fn state(&self) -> AssociationState {
        self.slot.lock().await.state
    }

    /// Subscribe to every event dispatched from now on
    pub fn subscribe(&self) -> broadcast::Receiver<AssociationEvent> {
        self.events_tx.subscribe()
    }

    /// Stop dispatching for `handle` and unregister it, best-effort
    async fn release_locked(platform: &Arc<P>, slot: &mut RequestSlot, handle: CallbackHandle) {
        if let Some(dispatcher) = slot.dispatcher.take() {
            dispatcher.abort();
        }

        match platform.release_callback_handle(handle).await {
            Ok(()) => debug!("Released callback {}", handle),
            Err(e) => warn!("Error releasing callback {}: {}", handle, e),
        }

        slot.state = AssociationState::Released;
    }
}
