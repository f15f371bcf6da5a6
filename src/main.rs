//! WiFi Association Service - Main Entry Point

use std::sync::Arc;

use clap::Parser;
use tokio::signal::unix::{SignalKind, signal};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wifi_association_service::{
    NetworkAssociationManager,
    config::{CliArgs, Settings},
    platform::{ConnectivityPlatform, DefaultNetworkBinding, WifiCtrlPlatform},
    transport::unix_socket::UnixSocketServer,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,wifi_association_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from(CliArgs::parse());
    info!(?settings, "Starting WiFi association service");

    let binding = DefaultNetworkBinding::new();
    let platform =
        Arc::new(WifiCtrlPlatform::new(settings.interface.clone(), binding.clone()).await?);
    info!("Connectivity platform initialized for interface: {}", settings.interface);

    if !platform.supports_association_request() {
        warn!("Association requests will be rejected until wpa_supplicant is available");
    }

    let manager = Arc::new(NetworkAssociationManager::new(platform));

    let mut bound = binding.subscribe();
    tokio::spawn(async move {
        while bound.changed().await.is_ok() {
            let network = *bound.borrow_and_update();
            match network {
                Some(network) => info!("Default network is now {}", network),
                None => info!("Default network cleared"),
            }
        }
    });

    let server = UnixSocketServer::new(
        settings.socket_path.clone(),
        settings.socket_mode,
        manager.clone(),
    );
    let listener = server.bind().await?;

    let mut server_task = tokio::spawn(async move {
        if let Err(e) = server.serve(listener).await {
            error!("Unix socket server error: {}", e);
        }
    });

    notify_ready();
    info!("Service started successfully");

    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received SIGINT (Ctrl+C), shutting down gracefully");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully");
        }
        _ = &mut server_task => {
            error!("Unix socket server stopped");
        }
    }

    info!("Shutting down...");
    server_task.abort();
    manager.teardown().await;

    Ok(())
}

#[cfg(feature = "systemd")]
fn notify_ready() {
    if let Err(e) = sd_notify::notify(false, &[sd_notify::NotifyState::Ready]) {
        warn!("Failed to notify systemd: {}", e);
    }
}

#[cfg(not(feature = "systemd"))]
fn notify_ready() {}
