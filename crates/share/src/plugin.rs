//! Share plugin: dispatch and transfer workflows.
//!
//! Incoming packets are classified into file, text, and link requests;
//! outgoing shares are turned into transfer jobs or link packets. Every
//! workflow is one independent async call: failures never escape to the
//! dispatcher or to other in-flight transfers, and nothing here is
//! fatal to the process.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use linkdrop_protocol::{Packet, ProtocolError, SHARE_PACKET_TYPE, ShareBody};
use linkdrop_transfer::{TransferError, TransferRegistry};

use crate::dest;
use crate::device::{DeviceHandle, SystemLauncher, TransferFactory, UriLauncher};
use crate::notify::Notification;

/// Errors contained within one share workflow.
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("malformed share request: {0}")]
    Request(&'static str),
}

/// Share orchestrator for one paired device.
#[derive(Clone)]
pub struct SharePlugin {
    device: Arc<dyn DeviceHandle>,
    factory: Arc<dyn TransferFactory>,
    transfers: Arc<TransferRegistry>,
    launcher: Arc<dyn UriLauncher>,
    download_dir: PathBuf,
}

impl SharePlugin {
    /// Creates a plugin for `device`, receiving into the platform
    /// downloads directory and launching URIs with the system handler.
    pub fn new(device: Arc<dyn DeviceHandle>, factory: Arc<dyn TransferFactory>) -> Self {
        Self {
            device,
            factory,
            transfers: Arc::new(TransferRegistry::new()),
            launcher: Arc::new(SystemLauncher),
            download_dir: dest::download_dir(),
        }
    }

    /// Overrides the destination directory for received files.
    pub fn with_download_dir(mut self, dir: PathBuf) -> Self {
        self.download_dir = dir;
        self
    }

    /// Overrides the URI launcher.
    pub fn with_launcher(mut self, launcher: Arc<dyn UriLauncher>) -> Self {
        self.launcher = launcher;
        self
    }

    /// Entry point for inbound share packets.
    ///
    /// Classification precedence is `filename` > `text` > `url`; a body
    /// matching none of the three is dropped silently.
    pub async fn handle_packet(&self, packet: Packet) {
        match ShareBody::from_packet(&packet) {
            Ok(ShareBody::File { filename }) => {
                if let Err(e) = self.handle_file(&packet, &filename).await {
                    error!(
                        device = %self.device.name(),
                        filename = %filename,
                        error = %e,
                        "file receive failed"
                    );
                }
            }
            Ok(ShareBody::Text { text }) => self.handle_text(&text),
            Ok(ShareBody::Link { url }) => self.handle_uri(&url),
            Err(e) => {
                debug!(device = %self.device.name(), error = %e, "dropping share request");
            }
        }
    }

    /// Receive workflow: resolve destination, open it, pull the payload,
    /// settle with a terminal notification.
    async fn handle_file(&self, packet: &Packet, filename: &str) -> Result<(), ShareError> {
        let size = packet
            .payload_size
            .ok_or(ShareError::Request("missing payloadSize"))?;
        let size =
            u64::try_from(size).map_err(|_| ShareError::Request("negative payloadSize"))?;
        let port = packet
            .payload_transfer_info
            .ok_or(ShareError::Request("missing payloadTransferInfo"))?
            .port;

        // Resolving + Opening: create_new per candidate, so a racing
        // receive of the same name lands on the next suffix.
        let (file, path) = dest::create_unique(&self.download_dir, filename).await?;

        let id = Uuid::new_v4();
        let cancel = self.transfers.begin(id);
        let Some(transfer) = self.factory.inbound(file, size, id, cancel) else {
            self.transfers.finish(id);
            let _ = tokio::fs::remove_file(&path).await;
            return Err(ShareError::Request("no inbound transport"));
        };

        info!(
            device = %self.device.name(),
            filename,
            size,
            transfer = %id,
            "receiving file"
        );
        self.device
            .show_notification(Notification::receiving_started(
                id,
                filename,
                self.device.name(),
            ));

        let outcome = transfer.download(port).await;
        self.transfers.finish(id);
        // An Err here is unexpected local I/O: the in-progress
        // notification stays up and the partial file is kept.
        let success = outcome?;

        self.device.hide_notification(id);
        if success {
            self.device.show_notification(Notification::received(
                id,
                filename,
                self.device.name(),
                &path,
            ));
        } else {
            if let Err(e) = tokio::fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %e, "failed to remove partial file");
            }
            self.device.show_notification(Notification::receive_failed(
                id,
                filename,
                self.device.name(),
            ));
        }
        Ok(())
    }

    // Receiving text is not implemented; the variant is handled
    // explicitly so dispatch stays total.
    // TODO: surface received text with a copy-to-clipboard window.
    fn handle_text(&self, text: &str) {
        debug!(
            device = %self.device.name(),
            len = text.len(),
            "incoming text share ignored"
        );
    }

    /// Opens an incoming link with the platform default handler.
    fn handle_uri(&self, url: &str) {
        if let Err(e) = self.launcher.launch(url) {
            error!(device = %self.device.name(), url, error = %e, "failed to open link");
        }
    }

    /// Shares a local file, given as a path or a `file://` URI.
    ///
    /// Fire-and-forget: every outcome is reported via notification, and
    /// failures before the transfer starts are only logged.
    pub async fn share_file(&self, path_or_uri: &str) {
        if let Err(e) = self.send_file(path_or_uri).await {
            warn!(
                device = %self.device.name(),
                path = path_or_uri,
                error = %e,
                "file send failed"
            );
        }
    }

    async fn send_file(&self, path_or_uri: &str) -> Result<(), ShareError> {
        let path = match path_or_uri.strip_prefix("file://") {
            Some(stripped) => PathBuf::from(stripped),
            None => PathBuf::from(path_or_uri),
        };

        let file = tokio::fs::File::open(&path).await?;
        let size = file.metadata().await?.len();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or(ShareError::Request("path has no file name"))?;

        let id = Uuid::new_v4();
        let cancel = self.transfers.begin(id);
        let kind = self.device.connection_type();
        let Some(transfer) = self.factory.outbound(kind, file, size, id, cancel) else {
            self.transfers.finish(id);
            debug!(
                device = %self.device.name(),
                ?kind,
                "no outbound transport, share not attempted"
            );
            return Ok(());
        };

        info!(
            device = %self.device.name(),
            filename = %filename,
            size,
            transfer = %id,
            "sending file"
        );
        self.device.show_notification(Notification::sending_started(
            id,
            &filename,
            self.device.name(),
        ));

        let announce = Packet::new(
            SHARE_PACKET_TYPE,
            &ShareBody::File {
                filename: filename.clone(),
            },
        )?;
        let outcome = transfer.upload(announce).await;
        self.transfers.finish(id);
        let success = outcome?;

        self.device.hide_notification(id);
        if success {
            self.device
                .show_notification(Notification::sent(id, &filename, self.device.name()));
        } else {
            // The local source is untouched; nothing to clean up.
            self.device.show_notification(Notification::send_failed(
                id,
                &filename,
                self.device.name(),
            ));
        }
        Ok(())
    }

    /// Shares a string of text. Remote behavior is up to the peer.
    pub fn share_text(&self, text: &str) {
        match Packet::new(SHARE_PACKET_TYPE, &ShareBody::Text { text: text.into() }) {
            Ok(packet) => self.device.send_packet(packet),
            Err(e) => warn!(device = %self.device.name(), error = %e, "text share failed"),
        }
    }

    /// Shares a URI. `http(s)` and `tel:` pass through, local `file://`
    /// URIs are shared as files, anything else is assumed HTTPS.
    pub async fn share_uri(&self, uri: &str) {
        if uri.starts_with("file://") {
            return self.share_file(uri).await;
        }

        let url = if uri.starts_with("http://")
            || uri.starts_with("https://")
            || uri.starts_with("tel:")
        {
            uri.to_string()
        } else {
            format!("https://{uri}")
        };

        match Packet::new(SHARE_PACKET_TYPE, &ShareBody::Link { url }) {
            Ok(packet) => self.device.send_packet(packet),
            Err(e) => warn!(device = %self.device.name(), error = %e, "link share failed"),
        }
    }

    /// Cancels an in-flight transfer; routed back from the notification
    /// Cancel action with the transfer id as correlation key.
    pub fn cancel_transfer(&self, id: Uuid) -> bool {
        self.transfers.cancel(id)
    }

    /// Number of transfers currently in flight.
    pub fn active_transfers(&self) -> usize {
        self.transfers.active()
    }
}
