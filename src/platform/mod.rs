//! Connectivity platform abstraction layer

pub mod binding;
pub mod connectivity;
pub mod mock_platform;
pub mod wifi_ctrl_platform;

pub use binding::DefaultNetworkBinding;
pub use connectivity::{ConnectivityPlatform, Registration};
pub use wifi_ctrl_platform::WifiCtrlPlatform;

#[cfg(test)]
pub use mock_platform::{MockPlatform, PlatformCall};
