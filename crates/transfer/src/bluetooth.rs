//! Bluetooth transfer handle.
//!
//! Unlike the LAN backend there is no separate payload socket: the
//! embedding application hands over an already-established duplex
//! payload channel (its RFCOMM layer), and the handle streams the
//! announced bytes straight into it. Inbound payloads always arrive
//! over the LAN channel, so `download` is unsupported here.

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use linkdrop_protocol::Packet;

use crate::{BoxFuture, PacketSink, TRANSFER_BUFFER_SIZE, Transfer, TransferError};

/// Transfer handle over an established Bluetooth payload channel.
pub struct BluetoothTransfer {
    id: Uuid,
    size: u64,
    cancel: CancellationToken,
    sink: Arc<dyn PacketSink>,
    file: tokio::fs::File,
    channel: Box<dyn AsyncWrite + Send + Unpin>,
}

impl BluetoothTransfer {
    /// Creates an outbound handle streaming `file` into `channel`.
    pub fn outbound(
        sink: Arc<dyn PacketSink>,
        file: tokio::fs::File,
        channel: Box<dyn AsyncWrite + Send + Unpin>,
        size: u64,
        id: Uuid,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id,
            size,
            cancel,
            sink,
            file,
            channel,
        }
    }

    async fn run_upload(mut self, mut announce: Packet) -> Result<bool, TransferError> {
        announce.payload_size = Some(self.size as i64);
        self.sink.send_packet(announce);

        let mut buf = vec![0u8; TRANSFER_BUFFER_SIZE];
        let mut remaining = self.size;

        while remaining > 0 {
            if self.cancel.is_cancelled() {
                debug!(transfer = %self.id, "upload cancelled mid-stream");
                return Ok(false);
            }

            let to_read = crate::chunk_len(remaining, buf.len());
            // Source read failures are local I/O and propagate.
            let n = self.file.read(&mut buf[..to_read]).await?;
            if n == 0 {
                warn!(transfer = %self.id, remaining, "source file shorter than declared size");
                return Ok(false);
            }

            if let Err(e) = self.channel.write_all(&buf[..n]).await {
                warn!(transfer = %self.id, error = %e, "payload channel write failed");
                return Ok(false);
            }
            remaining -= n as u64;
        }

        if let Err(e) = self.channel.flush().await {
            warn!(transfer = %self.id, error = %e, "payload channel flush failed");
            return Ok(false);
        }

        info!(transfer = %self.id, size = self.size, "payload sent");
        Ok(true)
    }
}

impl Transfer for BluetoothTransfer {
    fn id(&self) -> Uuid {
        self.id
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn download(self: Box<Self>, _port: u16) -> BoxFuture<Result<bool, TransferError>> {
        warn!(transfer = %self.id, "inbound payloads are not carried over Bluetooth");
        Box::pin(async { Ok(false) })
    }

    fn upload(self: Box<Self>, announce: Packet) -> BoxFuture<Result<bool, TransferError>> {
        Box::pin(self.run_upload(announce))
    }
}
