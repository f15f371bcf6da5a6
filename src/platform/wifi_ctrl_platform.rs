//! wifi-ctrl (wpa_supplicant) connectivity platform

use std::collections::HashMap;
use std::path::Path;
use tokio::process::Command;
use tokio::sync::{Mutex, broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use wifi_ctrl::sta::{Broadcast, BroadcastReceiver, RequestClient, WifiSetup};

use crate::{
    core::{
        error::{PlatformError, PlatformResult},
        types::{
            AssociationRequest, CallbackHandle, NetworkCapabilities, NetworkEvent, NetworkRef,
        },
    },
    platform::{ConnectivityPlatform, DefaultNetworkBinding, Registration},
};

const EVENT_CHANNEL_CAPACITY: usize = 16;
const IP_POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(200);
const IP_POLL_RETRIES: usize = 30; // 30 * 200ms = 6 seconds

/// Bookkeeping for one registered network request
#[derive(Debug)]
struct ActiveRegistration {
    network_id: usize,
    translator: JoinHandle<()>,
}

/// Connectivity platform backed by wpa_supplicant through wifi-ctrl
pub struct WifiCtrlPlatform {
    interface: String,
    ctrl_socket: String,
    client: RequestClient,
    broadcast_receiver: BroadcastReceiver,
    binding: DefaultNetworkBinding,
    registrations: Mutex<HashMap<CallbackHandle, ActiveRegistration>>,
}

impl WifiCtrlPlatform {
    /// Create a platform for `interface` and start the wifi-ctrl station
    pub async fn new(interface: String, binding: DefaultNetworkBinding) -> PlatformResult<Self> {
        let ctrl_socket = format!("/var/run/wpa_supplicant/{}", interface);
        let mut setup =
            WifiSetup::new().map_err(|e| PlatformError::WpaSupplicant(e.to_string()))?;
        setup.set_socket_path(ctrl_socket.clone());

        let client = setup.get_request_client();
        let broadcast_receiver = setup.get_broadcast_receiver();
        let station = setup.complete();

        tokio::spawn(async move {
            if let Err(e) = station.run().await {
                error!("WifiStation runtime error: {}", e);
            }
        });

        Ok(Self {
            interface,
            ctrl_socket,
            client,
            broadcast_receiver,
            binding,
            registrations: Mutex::new(HashMap::new()),
        })
    }

    async fn configure_network(
        &self,
        network_id: usize,
        request: &AssociationRequest,
    ) -> PlatformResult<()> {
        // wifi-ctrl quotes and escapes both values
        self.client
            .set_network_ssid(network_id, request.ssid().to_string())
            .await
            .map_err(|e| PlatformError::WpaSupplicant(format!("Failed to set SSID: {}", e)))?;

        self.client
            .set_network_psk(network_id, request.credential().expose().to_string())
            .await
            .map_err(|e| PlatformError::WpaSupplicant(format!("Failed to set PSK: {}", e)))?;

        self.client.select_network(network_id).await.map_err(|e| {
            PlatformError::WpaSupplicant(format!("Failed to select network: {}", e))
        })?;

        Ok(())
    }

    async fn remove_network(&self, network_id: usize) -> Result<(), String> {
        self.client
            .send_custom(format!("REMOVE_NETWORK {}", network_id))
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

impl ConnectivityPlatform for WifiCtrlPlatform {
    fn supports_association_request(&self) -> bool {
        let available = Path::new(&self.ctrl_socket).exists();
        if !available {
            warn!(
                "wpa_supplicant control socket not found: {}",
                self.ctrl_socket
            );
        }
        available
    }

    async fn submit_association_request(
        &self,
        request: &AssociationRequest,
    ) -> PlatformResult<Registration> {
        debug!("Submitting association request for {}", request.ssid());

        // Subscribe before selecting the network so no event is missed
        let receiver = self.broadcast_receiver.resubscribe();

        let network_id = self.client.add_network().await.map_err(|e| {
            PlatformError::RegistrationFailed(format!("Failed to add network: {}", e))
        })?;

        if let Err(e) = self.configure_network(network_id, request).await {
            if let Err(cleanup) = self.remove_network(network_id).await {
                warn!("Failed to remove network {}: {}", network_id, cleanup);
            }
            return Err(PlatformError::RegistrationFailed(e.to_string()));
        }

        let network = NetworkRef::new(network_id as u64);
        let handle = CallbackHandle::new();
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let translator = EventTranslator::new(self.interface.clone(), network, IP_POLL_RETRIES);
        let translator = tokio::spawn(translator.run(receiver, tx));

        self.registrations.lock().await.insert(
            handle,
            ActiveRegistration {
                network_id,
                translator,
            },
        );

        debug!(
            "Network {} selected for callback {}",
            network_id, handle
        );

        Ok(Registration { handle, events: rx })
    }

    async fn release_callback_handle(&self, handle: CallbackHandle) -> PlatformResult<()> {
        let registration = self
            .registrations
            .lock()
            .await
            .remove(&handle)
            .ok_or(PlatformError::UnknownHandle(handle))?;

        registration.translator.abort();

        self.remove_network(registration.network_id)
            .await
            .map_err(|reason| PlatformError::HandleReleaseFailure { handle, reason })?;

        debug!(
            "Removed network {} for callback {}",
            registration.network_id, handle
        );
        Ok(())
    }

    async fn bind_default_network(&self, network: Option<NetworkRef>) {
        match network {
            Some(network) => info!(
                "Binding process default network to {} on {}",
                network, self.interface
            ),
            None => info!("Clearing process default network on {}", self.interface),
        }

        self.binding.set(network);
    }
}

/// Translates wpa_supplicant broadcasts into events for one network
struct EventTranslator {
    interface: String,
    network: NetworkRef,
    ip_poll_retries: usize,
}

impl EventTranslator {
    fn new(interface: String, network: NetworkRef, ip_poll_retries: usize) -> Self {
        Self {
            interface,
            network,
            ip_poll_retries,
        }
    }

    async fn run(
        self,
        mut receiver: broadcast::Receiver<Broadcast>,
        events: mpsc::Sender<NetworkEvent>,
    ) {
        let mut associated = false;

        loop {
            let broadcast = match receiver.recv().await {
                Ok(broadcast) => broadcast,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Broadcast receiver lagged by {} events", skipped);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    warn!("Broadcast channel closed");
                    break;
                }
            };

            debug!("Received broadcast event: {:?}", broadcast);

            let mut translated = Vec::new();
            let mut finished = false;

            match broadcast {
                Broadcast::Connected if !associated => {
                    associated = true;
                    translated.push(NetworkEvent::Available(self.network));

                    let ip_address = self.poll_ip_address().await;
                    translated.push(NetworkEvent::CapabilitiesChanged(
                        self.network,
                        NetworkCapabilities {
                            validated: ip_address.is_some(),
                            ip_address,
                        },
                    ));
                }
                Broadcast::Disconnected if associated => {
                    associated = false;
                    translated.push(NetworkEvent::Lost(self.network));
                }
                Broadcast::WrongPsk | Broadcast::NetworkNotFound if !associated => {
                    translated.push(NetworkEvent::Unavailable);
                    finished = true;
                }
                _ => {}
            }

            for event in translated {
                if events.send(event).await.is_err() {
                    debug!("Callback for network {} dropped", self.network);
                    return;
                }
            }

            if finished {
                break;
            }
        }
    }

    async fn poll_ip_address(&self) -> Option<String> {
        for _ in 0..self.ip_poll_retries {
            if let Some(ip) = get_ip_address(&self.interface).await {
                return Some(ip);
            }
            tokio::time::sleep(IP_POLL_INTERVAL).await;
        }

        None
    }
}

/// Get IPv4 address of `interface` using ip command
async fn get_ip_address(interface: &str) -> Option<String> {
    let output = Command::new("ip")
        .args(["-4", "addr", "show", interface])
        .output()
        .await
        .ok()?;

    parse_ipv4_address(&String::from_utf8_lossy(&output.stdout))
}

fn parse_ipv4_address(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("inet "))
        .find_map(|line| line.split_whitespace().nth(1))
        .and_then(|cidr| cidr.split('/').next())
        .map(str::to_string)
}
