//! Typed share request body.
//!
//! Remote peers classify share bodies structurally (by which field is
//! present) rather than with an explicit tag. Decoding restores that
//! behavior as an explicit priority: `filename` wins over `text`, which
//! wins over `url`, so a body carrying several fields routes exactly
//! like it always has.

use serde::{Deserialize, Serialize};

use crate::{Packet, ProtocolError};

/// One share request: a file announcement, a text snippet, or a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ShareBody {
    /// A file is being offered; bytes follow out of band.
    File { filename: String },
    /// A snippet of unicode text.
    Text { text: String },
    /// A URI, opened with the platform default handler on receipt.
    Link { url: String },
}

/// Raw structural view of a share body, before precedence is applied.
#[derive(Deserialize)]
struct RawShareBody {
    filename: Option<String>,
    text: Option<String>,
    url: Option<String>,
}

impl ShareBody {
    /// Decodes a share body from a packet, applying field precedence.
    pub fn from_packet(packet: &Packet) -> Result<Self, ProtocolError> {
        Self::from_value(&packet.body)
    }

    /// Decodes a share body from a JSON value, applying field precedence.
    pub fn from_value(body: &serde_json::Value) -> Result<Self, ProtocolError> {
        let raw: RawShareBody = serde_json::from_value(body.clone())?;
        if let Some(filename) = raw.filename {
            Ok(ShareBody::File { filename })
        } else if let Some(text) = raw.text {
            Ok(ShareBody::Text { text })
        } else if let Some(url) = raw.url {
            Ok(ShareBody::Link { url })
        } else {
            Err(ProtocolError::EmptyShareBody)
        }
    }
}
