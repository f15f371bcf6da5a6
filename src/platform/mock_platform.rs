//! Mock connectivity platform for testing

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, mpsc};

use crate::core::error::{PlatformError, PlatformResult};
use crate::core::types::{AssociationRequest, CallbackHandle, NetworkEvent, NetworkRef};
use crate::platform::{ConnectivityPlatform, DefaultNetworkBinding, Registration};

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Calls made against the mock, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    Submit { ssid: String },
    Release(CallbackHandle),
    Bind(Option<NetworkRef>),
}

/// Internal state for the mock platform
#[derive(Debug, Default)]
struct MockState {
    should_fail_submit: bool,
    should_fail_release: bool,
    calls: Vec<PlatformCall>,
    queued_on_submit: Vec<NetworkEvent>,
    registrations: HashMap<CallbackHandle, mpsc::Sender<NetworkEvent>>,
}

/// Mock connectivity platform for testing
///
/// Records every call and lets tests emit events for any registered handle.
#[derive(Debug, Clone)]
pub struct MockPlatform {
    supported: Arc<AtomicBool>,
    binding: DefaultNetworkBinding,
    inner: Arc<Mutex<MockState>>,
}

impl MockPlatform {
    /// Create a new mock platform that supports association requests
    pub fn new() -> Self {
        Self {
            supported: Arc::new(AtomicBool::new(true)),
            binding: DefaultNetworkBinding::new(),
            inner: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Configure whether the host supports association requests
    pub fn set_supported(&self, supported: bool) {
        self.supported.store(supported, Ordering::SeqCst);
    }

    /// Configure mock to refuse submissions
    pub async fn set_submit_failure(&self, should_fail: bool) {
        self.inner.lock().await.should_fail_submit = should_fail;
    }

    /// Configure mock to fail releasing handles
    pub async fn set_release_failure(&self, should_fail: bool) {
        self.inner.lock().await.should_fail_release = should_fail;
    }

    /// Queue `event` on the next registration before submit returns
    pub async fn queue_on_submit(&self, event: NetworkEvent) {
        self.inner.lock().await.queued_on_submit.push(event);
    }

    /// All calls recorded so far
    pub async fn calls(&self) -> Vec<PlatformCall> {
        self.inner.lock().await.calls.clone()
    }

    /// Handles the mock still considers registered
    pub async fn live_handles(&self) -> Vec<CallbackHandle> {
        self.inner.lock().await.registrations.keys().copied().collect()
    }

    /// Current process-wide default network
    pub fn bound_network(&self) -> Option<NetworkRef> {
        self.binding.current()
    }

    /// Deliver an event to the callback registered under `handle`
    ///
    /// Returns false if the handle is unknown or its receiver is gone.
    pub async fn emit(&self, handle: CallbackHandle, event: NetworkEvent) -> bool {
        let sender = self.inner.lock().await.registrations.get(&handle).cloned();
        match sender {
            Some(sender) => sender.send(event).await.is_ok(),
            None => false,
        }
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectivityPlatform for MockPlatform {
    fn supports_association_request(&self) -> bool {
        self.supported.load(Ordering::SeqCst)
    }

    async fn submit_association_request(
        &self,
        request: &AssociationRequest,
    ) -> PlatformResult<Registration> {
        let mut state = self.inner.lock().await;
        state.calls.push(PlatformCall::Submit {
            ssid: request.ssid().to_string(),
        });

        if state.should_fail_submit {
            return Err(PlatformError::RegistrationFailed(
                "Mock submit failure".into(),
            ));
        }

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let handle = CallbackHandle::new();
        for event in std::mem::take(&mut state.queued_on_submit) {
            let _ = tx.try_send(event);
        }
        state.registrations.insert(handle, tx);

        Ok(Registration { handle, events: rx })
    }

    async fn release_callback_handle(&self, handle: CallbackHandle) -> PlatformResult<()> {
        let mut state = self.inner.lock().await;
        state.calls.push(PlatformCall::Release(handle));

        if state.should_fail_release {
            return Err(PlatformError::HandleReleaseFailure {
                handle,
                reason: "Mock release failure".into(),
            });
        }

        state
            .registrations
            .remove(&handle)
            .map(|_| ())
            .ok_or(PlatformError::UnknownHandle(handle))
    }

    async fn bind_default_network(&self, network: Option<NetworkRef>) {
        self.inner.lock().await.calls.push(PlatformCall::Bind(network));
        self.binding.set(network);
    }
}
