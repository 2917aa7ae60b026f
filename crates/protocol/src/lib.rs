//! Wire protocol types for LinkDrop device-to-device sharing.
//!
//! Defines the JSON packet envelope exchanged over an established,
//! already-authenticated device channel, and the typed share body
//! carried by `linkdrop.share.request` packets.

pub mod packet;
pub mod share;

pub use packet::{Packet, PayloadTransferInfo};
pub use share::ShareBody;

use serde::{Deserialize, Serialize};

/// Packet type for share requests (files, text, links).
pub const SHARE_PACKET_TYPE: &str = "linkdrop.share.request";

/// Errors produced by the protocol crate.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("share body carries no recognized field")]
    EmptyShareBody,
}

/// Active transport class of a paired device.
///
/// Determines which transfer backend applies when sending a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionType {
    /// IP-based streaming transport (wire name kept for compatibility).
    #[serde(rename = "tcp")]
    Lan,
    /// Short-range radio transport.
    #[serde(rename = "bluetooth")]
    Bluetooth,
}
