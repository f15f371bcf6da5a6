//! Unix socket server implementation

use listenfd::ListenFd;
use std::{fs::Permissions, os::unix::fs::PermissionsExt, path::Path, sync::Arc};
use tokio::{
    fs,
    net::{UnixListener, UnixStream},
    sync::broadcast,
};
use tracing::{debug, error, info, warn};

use crate::{
    core::{
        callback::AssociationEvent,
        error::{TransportError, TransportResult},
        manager::NetworkAssociationManager,
    },
    platform::ConnectivityPlatform,
    protocol::{JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, Notification},
    transport::unix_socket::{
        handler::RequestHandler,
        session::{SessionReader, UnixSocketSession},
    },
};

/// Unix socket server
pub struct UnixSocketServer<P: ConnectivityPlatform> {
    socket_path: String,
    socket_mode: u32,
    manager: Arc<NetworkAssociationManager<P>>,
    handler: Arc<RequestHandler<P>>,
}

impl<P: ConnectivityPlatform> UnixSocketServer<P> {
    /// Create a new Unix socket server
    pub fn new(
        socket_path: String,
        socket_mode: u32,
        manager: Arc<NetworkAssociationManager<P>>,
    ) -> Self {
        let handler = Arc::new(RequestHandler::new(manager.clone()));

        Self {
            socket_path,
            socket_mode,
            manager,
            handler,
        }
    }

    /// Bind the server socket
    ///
    /// Uses a socket passed in by the service manager when there is one,
    /// otherwise binds `socket_path` and applies `socket_mode`.
    pub async fn bind(&self) -> TransportResult<UnixListener> {
        if let Some(listener) = ListenFd::from_env().take_unix_listener(0)? {
            listener.set_nonblocking(true)?;
            info!("Using inherited Unix socket");
            return Ok(UnixListener::from_std(listener)?);
        }

        // Remove existing socket file if it exists
        if Path::new(&self.socket_path).exists() {
            fs::remove_file(&self.socket_path).await?;
        }

        let listener = UnixListener::bind(&self.socket_path)?;
        fs::set_permissions(&self.socket_path, Permissions::from_mode(self.socket_mode)).await?;
        info!(
            "Unix socket server listening on {} (mode {:o})",
            self.socket_path, self.socket_mode
        );

        Ok(listener)
    }

    /// Accept clients on an already bound listener
    pub async fn serve(&self, listener: UnixListener) -> TransportResult<()> {
        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let handler = self.handler.clone();
                    let events = self.manager.subscribe();
                    tokio::spawn(async move {
                        if let Err(e) = Self::handle_client(stream, handler, events).await {
                            error!("Error handling client: {}", e);
                        }
                    });
                }
                Err(e) => {
                    warn!("Error accepting connection: {}", e);
                }
            }
        }
    }

    async fn handle_client(
        stream: UnixStream,
        handler: Arc<RequestHandler<P>>,
        events: broadcast::Receiver<AssociationEvent>,
    ) -> TransportResult<()> {
        let (read_half, write_half) = stream.into_split();
        let session = UnixSocketSession::new(write_half);
        let mut reader = SessionReader::new(read_half);

        info!("New client connected: {}", session.id());

        let forwarder = tokio::spawn(forward_events(session.clone(), events));

        let result = async {
            while let Some(line) = reader.read_line().await? {
                if line.is_empty() {
                    continue;
                }

                let response = match JsonRpcRequest::parse(&line) {
                    Ok(request) => handler.handle_request(request).await,
                    Err(e) => {
                        warn!("Invalid JSON-RPC request: {}", e);
                        JsonRpcResponse::rejecting(&line)
                    }
                };

                session.send_response(&response).await?;
            }

            info!("Client disconnected: {}", session.id());
            Ok::<(), TransportError>(())
        }
        .await;

        forwarder.abort();
        result
    }
}

/// Push every dispatched network event to one client
async fn forward_events(
    session: UnixSocketSession,
    mut events: broadcast::Receiver<AssociationEvent>,
) {
    loop {
        match events.recv().await {
            Ok(event) => {
                let notification = JsonRpcNotification::new(Notification::from(&event));
                if let Err(e) = session.send_notification(&notification).await {
                    debug!("Stopping notifications for {}: {}", session.id(), e);
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(
                    "Client {} missed {} network events",
                    session.id(),
                    skipped
                );
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
