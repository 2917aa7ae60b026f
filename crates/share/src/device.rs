//! Collaborator seams for the share orchestrator.
//!
//! The paired device, the transfer backends, and the URI launcher are
//! all injected capabilities. The embedding application implements
//! [`DeviceHandle`] on top of its connection layer; tests use mocks.

use std::io;
use std::net::IpAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use linkdrop_protocol::ConnectionType;
use linkdrop_transfer::{LanTransfer, PacketSink, Transfer};

use crate::notify::Notification;

/// Capabilities of the paired remote device.
pub trait DeviceHandle: PacketSink {
    /// Display name, used only for human-readable notification text.
    fn name(&self) -> &str;

    /// Current transport class, read at send time.
    fn connection_type(&self) -> ConnectionType;

    /// Shows a notification; an existing one with the same id is replaced.
    fn show_notification(&self, notification: Notification);

    /// Withdraws the notification with the given id, if present.
    fn hide_notification(&self, id: Uuid);
}

/// Creates transfer handles for the workflows.
///
/// Returning `None` from [`outbound`](TransferFactory::outbound) means
/// the device's current connection kind has no sending backend; the
/// share is simply not attempted.
pub trait TransferFactory: Send + Sync {
    fn inbound(
        &self,
        file: tokio::fs::File,
        size: u64,
        id: Uuid,
        cancel: CancellationToken,
    ) -> Option<Box<dyn Transfer>>;

    fn outbound(
        &self,
        kind: ConnectionType,
        file: tokio::fs::File,
        size: u64,
        id: Uuid,
        cancel: CancellationToken,
    ) -> Option<Box<dyn Transfer>>;
}

/// Factory for devices reachable over the LAN channel.
///
/// Inbound payloads are pulled from `peer`; outbound payloads are
/// served from an ephemeral listener announced through `sink`. A
/// Bluetooth-connected device needs a factory wired to the RFCOMM
/// layer's payload channel (see [`linkdrop_transfer::BluetoothTransfer`]).
pub struct LanTransferFactory {
    peer: IpAddr,
    sink: Arc<dyn PacketSink>,
}

impl LanTransferFactory {
    pub fn new(peer: IpAddr, sink: Arc<dyn PacketSink>) -> Self {
        Self { peer, sink }
    }
}

impl TransferFactory for LanTransferFactory {
    fn inbound(
        &self,
        file: tokio::fs::File,
        size: u64,
        id: Uuid,
        cancel: CancellationToken,
    ) -> Option<Box<dyn Transfer>> {
        Some(Box::new(LanTransfer::inbound(
            self.peer, file, size, id, cancel,
        )))
    }

    fn outbound(
        &self,
        kind: ConnectionType,
        file: tokio::fs::File,
        size: u64,
        id: Uuid,
        cancel: CancellationToken,
    ) -> Option<Box<dyn Transfer>> {
        match kind {
            ConnectionType::Lan => Some(Box::new(LanTransfer::outbound(
                self.sink.clone(),
                file,
                size,
                id,
                cancel,
            ))),
            ConnectionType::Bluetooth => None,
        }
    }
}

/// Opens URIs with a platform handler.
pub trait UriLauncher: Send + Sync {
    fn launch(&self, uri: &str) -> io::Result<()>;
}

/// Launcher backed by the platform default handler.
pub struct SystemLauncher;

impl UriLauncher for SystemLauncher {
    fn launch(&self, uri: &str) -> io::Result<()> {
        open::that_detached(uri)
    }
}
