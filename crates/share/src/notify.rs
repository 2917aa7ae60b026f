//! Notification model for transfer progress and outcome.
//!
//! Notifications are keyed by transfer id. A transfer shows at most one
//! in-progress notification; settling withdraws it and shows exactly
//! one terminal notification under the same id.

use std::path::Path;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use uuid::Uuid;

/// Action name a Cancel button routes back with, parameterized by the
/// transfer id.
pub const ACTION_CANCEL_TRANSFER: &str = "cancelTransfer";

/// Action name an open button routes back with, parameterized by a
/// `file://` URI.
pub const ACTION_OPEN_PATH: &str = "openPath";

/// Icon category for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Save,
    Send,
    Warning,
}

impl Icon {
    /// Themed icon name for the presentation surface.
    pub fn name(&self) -> &'static str {
        match self {
            Icon::Save => "document-save-symbolic",
            Icon::Send => "document-send-symbolic",
            Icon::Warning => "dialog-warning-symbolic",
        }
    }
}

/// One actionable notification button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationButton {
    pub label: String,
    pub action: String,
    pub parameter: String,
}

/// A titled message keyed by transfer id, with optional actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub buttons: Vec<NotificationButton>,
    pub icon: Icon,
}

fn cancel_button(id: Uuid) -> NotificationButton {
    NotificationButton {
        label: "Cancel".into(),
        action: ACTION_CANCEL_TRANSFER.into(),
        parameter: id.to_string(),
    }
}

/// Bytes escaped in the path component of a `file://` URI. `/` and the
/// RFC 3986 sub-delims stay literal.
const URI_PATH_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-encoded `file://` URI for a local path.
pub fn file_uri(path: &Path) -> String {
    let raw = path.display().to_string();
    format!("file://{}", utf8_percent_encode(&raw, URI_PATH_ESCAPE))
}

impl Notification {
    /// In-progress notification for an incoming file.
    pub fn receiving_started(id: Uuid, filename: &str, device: &str) -> Self {
        Self {
            id,
            title: "Starting Transfer".into(),
            body: format!("Receiving \"{filename}\" from {device}"),
            buttons: vec![cancel_button(id)],
            icon: Icon::Save,
        }
    }

    /// In-progress notification for an outgoing file.
    pub fn sending_started(id: Uuid, filename: &str, device: &str) -> Self {
        Self {
            id,
            title: "Starting Transfer".into(),
            body: format!("Sending \"{filename}\" to {device}"),
            buttons: vec![cancel_button(id)],
            icon: Icon::Send,
        }
    }

    /// Terminal notification for a completed receive, with actions to
    /// open the file or its containing folder.
    pub fn received(id: Uuid, filename: &str, device: &str, path: &Path) -> Self {
        let folder = path
            .parent()
            .map(file_uri)
            .unwrap_or_else(|| file_uri(path));
        Self {
            id,
            title: "Transfer Successful".into(),
            body: format!("Received \"{filename}\" from {device}"),
            buttons: vec![
                NotificationButton {
                    label: "Open Folder".into(),
                    action: ACTION_OPEN_PATH.into(),
                    parameter: folder,
                },
                NotificationButton {
                    label: "Open File".into(),
                    action: ACTION_OPEN_PATH.into(),
                    parameter: file_uri(path),
                },
            ],
            icon: Icon::Save,
        }
    }

    /// Terminal notification for a failed receive.
    pub fn receive_failed(id: Uuid, filename: &str, device: &str) -> Self {
        Self {
            id,
            title: "Transfer Failed".into(),
            body: format!("Failed to receive \"{filename}\" from {device}"),
            buttons: Vec::new(),
            icon: Icon::Warning,
        }
    }

    /// Terminal notification for a completed send.
    pub fn sent(id: Uuid, filename: &str, device: &str) -> Self {
        Self {
            id,
            title: "Transfer Successful".into(),
            body: format!("Sent \"{filename}\" to {device}"),
            buttons: Vec::new(),
            icon: Icon::Send,
        }
    }

    /// Terminal notification for a failed send.
    pub fn send_failed(id: Uuid, filename: &str, device: &str) -> Self {
        Self {
            id,
            title: "Transfer Failed".into(),
            body: format!("Failed to send \"{filename}\" to {device}"),
            buttons: Vec::new(),
            icon: Icon::Warning,
        }
    }
}
