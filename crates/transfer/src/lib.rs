//! Transfer handles for out-of-band share payloads.
//!
//! A [`Transfer`] represents one in-flight byte stream between paired
//! devices, independent of the underlying transport. Packets announce a
//! payload (`payloadSize` + transport parameters); the bytes themselves
//! travel over a dedicated channel owned by the transfer handle.
//!
//! Outcome contract: `Ok(true)` on success, `Ok(false)` on any normal
//! failure (network error, timeout, remote close, cancellation), `Err`
//! only for unexpected local file I/O. Cancellation is observably
//! identical to failure.

pub mod bluetooth;
pub mod lan;
pub mod registry;

pub use bluetooth::BluetoothTransfer;
pub use lan::LanTransfer;
pub use registry::TransferRegistry;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use linkdrop_protocol::Packet;
use uuid::Uuid;

/// Read/write buffer size for payload streaming (64 KB).
pub const TRANSFER_BUFFER_SIZE: usize = 64 * 1024;

/// Timeout for the receiving side's TCP connection attempt.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the sending side waiting for the peer to connect.
pub const ACCEPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Boxed future, used to keep [`Transfer`] object-safe.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Length of the next read: the 64-bit remainder bounded by the buffer.
/// The comparison happens in u64 so a payload above `u32::MAX` is not
/// truncated on 32-bit targets.
pub(crate) fn chunk_len(remaining: u64, buf_len: usize) -> usize {
    remaining.min(buf_len as u64) as usize
}

/// Errors produced by transfer handles.
///
/// Network-side failures do not surface here; they resolve the transfer
/// to `Ok(false)` instead.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transfer misuse: {0}")]
    Misuse(&'static str),
}

/// Fire-and-forget packet enqueue onto the device message channel.
///
/// Implemented by the embedding application on top of its connection
/// layer; no delivery confirmation at this level.
pub trait PacketSink: Send + Sync {
    fn send_packet(&self, packet: Packet);
}

/// One in-flight byte stream between paired devices.
pub trait Transfer: Send {
    /// Unique identifier, used as the notification and cancellation key.
    fn id(&self) -> Uuid;

    /// Declared payload size in bytes.
    fn size(&self) -> u64;

    /// Receives the payload announced with the given transport port.
    ///
    /// Suspends until the byte stream completes, fails, or is cancelled.
    fn download(self: Box<Self>, port: u16) -> BoxFuture<Result<bool, TransferError>>;

    /// Sends `announce` (completed with payload parameters) through the
    /// device channel, then streams the payload bytes.
    fn upload(self: Box<Self>, announce: Packet) -> BoxFuture<Result<bool, TransferError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_len_bounds_huge_remainders_by_buffer() {
        assert_eq!(chunk_len(0, TRANSFER_BUFFER_SIZE), 0);
        assert_eq!(chunk_len(5, TRANSFER_BUFFER_SIZE), 5);
        assert_eq!(
            chunk_len(u64::MAX, TRANSFER_BUFFER_SIZE),
            TRANSFER_BUFFER_SIZE
        );
        // A remainder just past u32::MAX must not wrap to a zero-length
        // read on targets where usize is 32 bits.
        assert_eq!(
            chunk_len(u64::from(u32::MAX) + 1, TRANSFER_BUFFER_SIZE),
            TRANSFER_BUFFER_SIZE
        );
    }
}
