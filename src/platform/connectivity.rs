//! Connectivity platform trait definition

use tokio::sync::mpsc;
use trait_variant::make;

use crate::core::error::PlatformResult;
use crate::core::types::{AssociationRequest, CallbackHandle, NetworkEvent, NetworkRef};

/// A live callback registration handed out by the platform
///
/// `events` yields every connectivity event the platform delivers for
/// `handle` until the handle is released.
#[derive(Debug)]
pub struct Registration {
    pub handle: CallbackHandle,
    pub events: mpsc::Receiver<NetworkEvent>,
}

/// Abstraction over the host's network association facility
///
/// This trait enables testing by allowing mock implementations
/// while providing a standard interface for association requests.
#[make(Send)]
pub trait ConnectivityPlatform: Send + Sync + 'static {
    /// Whether the running host can fulfil association requests at all
    fn supports_association_request(&self) -> bool;

    /// Submit an association request and register a fresh callback for it
    ///
    /// Returns as soon as the request is handed over; association results
    /// arrive later on the registration's event channel.
    async fn submit_association_request(
        &self,
        request: &AssociationRequest,
    ) -> PlatformResult<Registration>;

    /// Unregister a previously returned callback handle
    async fn release_callback_handle(&self, handle: CallbackHandle) -> PlatformResult<()>;

    /// Bind process-wide default traffic to `network`, or unbind with `None`
    async fn bind_default_network(&self, network: Option<NetworkRef>);
}
