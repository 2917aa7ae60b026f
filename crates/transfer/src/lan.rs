//! LAN transfer handle.
//!
//! The sending side binds an ephemeral TCP listener, announces the port
//! in the share packet, and streams the file to whichever peer connects.
//! The receiving side connects to the announced port on the remote
//! device and pulls exactly the declared number of bytes.

use std::net::IpAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use linkdrop_protocol::{Packet, PayloadTransferInfo};

use crate::{
    ACCEPT_TIMEOUT, BoxFuture, CONNECT_TIMEOUT, PacketSink, TRANSFER_BUFFER_SIZE, Transfer,
    TransferError,
};

enum Role {
    Inbound {
        peer: IpAddr,
        file: tokio::fs::File,
    },
    Outbound {
        sink: Arc<dyn PacketSink>,
        file: tokio::fs::File,
    },
}

/// Transfer handle over the LAN payload channel.
pub struct LanTransfer {
    id: Uuid,
    size: u64,
    cancel: CancellationToken,
    role: Role,
}

impl LanTransfer {
    /// Creates an inbound handle that writes the payload into `file`.
    ///
    /// `peer` is the address of the remote device's channel endpoint;
    /// the payload port arrives with the announcing packet.
    pub fn inbound(
        peer: IpAddr,
        file: tokio::fs::File,
        size: u64,
        id: Uuid,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id,
            size,
            cancel,
            role: Role::Inbound { peer, file },
        }
    }

    /// Creates an outbound handle that streams `file` to the peer.
    pub fn outbound(
        sink: Arc<dyn PacketSink>,
        file: tokio::fs::File,
        size: u64,
        id: Uuid,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id,
            size,
            cancel,
            role: Role::Outbound { sink, file },
        }
    }

    async fn run_download(self, port: u16) -> Result<bool, TransferError> {
        let Role::Inbound { peer, mut file } = self.role else {
            return Err(TransferError::Misuse("download on an outbound transfer"));
        };

        // Connect to the sender's payload port with timeout + cancellation.
        let stream = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!(transfer = %self.id, "download cancelled before connect");
                return Ok(false);
            }
            result = tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect((peer, port))) => {
                match result {
                    Ok(Ok(s)) => s,
                    Ok(Err(e)) => {
                        warn!(transfer = %self.id, %peer, port, error = %e, "payload connect failed");
                        return Ok(false);
                    }
                    Err(_) => {
                        warn!(transfer = %self.id, %peer, port, "payload connect timed out");
                        return Ok(false);
                    }
                }
            }
        };

        let mut reader = stream;
        let mut buf = vec![0u8; TRANSFER_BUFFER_SIZE];
        let mut remaining = self.size;

        while remaining > 0 {
            if self.cancel.is_cancelled() {
                debug!(transfer = %self.id, "download cancelled mid-stream");
                return Ok(false);
            }

            let to_read = crate::chunk_len(remaining, buf.len());
            let n = match reader.read(&mut buf[..to_read]).await {
                Ok(0) => {
                    warn!(transfer = %self.id, remaining, "peer closed before payload complete");
                    return Ok(false);
                }
                Ok(n) => n,
                Err(e) => {
                    warn!(transfer = %self.id, error = %e, "payload read failed");
                    return Ok(false);
                }
            };

            // Destination write failures are local I/O and propagate.
            file.write_all(&buf[..n]).await?;
            remaining -= n as u64;
        }

        file.flush().await?;
        info!(transfer = %self.id, size = self.size, "payload received");
        Ok(true)
    }

    async fn run_upload(self, announce: Packet) -> Result<bool, TransferError> {
        let Role::Outbound { sink, mut file } = self.role else {
            return Err(TransferError::Misuse("upload on an inbound transfer"));
        };

        let listener = match TcpListener::bind("0.0.0.0:0").await {
            Ok(l) => l,
            Err(e) => {
                warn!(transfer = %self.id, error = %e, "payload listener bind failed");
                return Ok(false);
            }
        };
        let port = match listener.local_addr() {
            Ok(addr) => addr.port(),
            Err(e) => {
                warn!(transfer = %self.id, error = %e, "payload listener address unavailable");
                return Ok(false);
            }
        };

        debug!(transfer = %self.id, port, "payload listener bound");
        sink.send_packet(announce.with_payload(self.size as i64, PayloadTransferInfo { port }));

        // Wait for the peer to connect, then drop the listener: one
        // connection per transfer.
        let stream = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!(transfer = %self.id, "upload cancelled before accept");
                return Ok(false);
            }
            result = tokio::time::timeout(ACCEPT_TIMEOUT, listener.accept()) => {
                match result {
                    Ok(Ok((stream, addr))) => {
                        debug!(transfer = %self.id, %addr, "payload connection accepted");
                        stream
                    }
                    Ok(Err(e)) => {
                        warn!(transfer = %self.id, error = %e, "payload accept failed");
                        return Ok(false);
                    }
                    Err(_) => {
                        warn!(transfer = %self.id, "peer never connected for payload");
                        return Ok(false);
                    }
                }
            }
        };
        drop(listener);

        let mut writer = BufWriter::with_capacity(TRANSFER_BUFFER_SIZE, stream);
        let mut buf = vec![0u8; TRANSFER_BUFFER_SIZE];
        let mut remaining = self.size;

        while remaining > 0 {
            if self.cancel.is_cancelled() {
                debug!(transfer = %self.id, "upload cancelled mid-stream");
                return Ok(false);
            }

            let to_read = crate::chunk_len(remaining, buf.len());
            // Source read failures are local I/O and propagate.
            let n = file.read(&mut buf[..to_read]).await?;
            if n == 0 {
                warn!(transfer = %self.id, remaining, "source file shorter than declared size");
                return Ok(false);
            }

            if let Err(e) = writer.write_all(&buf[..n]).await {
                warn!(transfer = %self.id, error = %e, "payload write failed");
                return Ok(false);
            }
            remaining -= n as u64;
        }

        if let Err(e) = writer.flush().await {
            warn!(transfer = %self.id, error = %e, "payload flush failed");
            return Ok(false);
        }

        info!(transfer = %self.id, size = self.size, "payload sent");
        Ok(true)
    }
}

impl Transfer for LanTransfer {
    fn id(&self) -> Uuid {
        self.id
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn download(self: Box<Self>, port: u16) -> BoxFuture<Result<bool, TransferError>> {
        Box::pin(self.run_download(port))
    }

    fn upload(self: Box<Self>, announce: Packet) -> BoxFuture<Result<bool, TransferError>> {
        Box::pin(self.run_upload(announce))
    }
}
