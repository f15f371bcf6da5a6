//! WiFi Association Service
//!
//! Submits WiFi association requests to the host connectivity platform and
//! reports the asynchronous network events back to the caller:
//! - Single-slot callback ownership (`core::manager`)
//! - wpa_supplicant platform (`platform::wifi_ctrl_platform`)
//! - Unix Domain Sockets (JSON-RPC 2.0)

pub mod config;
pub mod core;
pub mod platform;
pub mod protocol;
pub mod transport;

pub use core::{
    callback::AssociationEvent,
    error::{AssociationError, PlatformError, TransportError},
    manager::NetworkAssociationManager,
    types::{
        Accepted, AssociationState, AssociationStatus, CallbackHandle, Credential,
        NetworkCapabilities, NetworkEvent, NetworkRef,
    },
};
