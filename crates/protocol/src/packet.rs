//! JSON packet envelope.
//!
//! Every message on the device channel is a `Packet`. Bodies are typed
//! per packet type; bulk byte payloads travel out of band, described by
//! `payloadSize` and `payloadTransferInfo` on the announcing packet.

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Transport parameters for an out-of-band byte payload.
///
/// For the LAN transport this is the TCP port the sending side listens
/// on; the receiving side connects to it to pull the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadTransferInfo {
    pub port: u16,
}

/// Envelope for all device channel communication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Packet {
    pub id: i64,
    #[serde(rename = "type")]
    pub ptype: String,
    pub body: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_transfer_info: Option<PayloadTransferInfo>,
}

impl Packet {
    /// Creates a packet with the given type and serializable body.
    pub fn new<T: Serialize>(ptype: impl Into<String>, body: &T) -> Result<Self, ProtocolError> {
        Ok(Self {
            id: 0,
            ptype: ptype.into(),
            body: serde_json::to_value(body)?,
            payload_size: None,
            payload_transfer_info: None,
        })
    }

    /// Deserializes the body into the given type.
    pub fn parse_body<T: for<'de> Deserialize<'de>>(&self) -> Result<T, ProtocolError> {
        Ok(serde_json::from_value(self.body.clone())?)
    }

    /// Attaches out-of-band payload parameters to this packet.
    pub fn with_payload(mut self, size: i64, info: PayloadTransferInfo) -> Self {
        self.payload_size = Some(size);
        self.payload_transfer_info = Some(info);
        self
    }
}
