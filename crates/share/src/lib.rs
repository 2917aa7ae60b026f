//! Share transfer orchestrator.
//!
//! Turns share requests exchanged with a paired device into concrete
//! transfer jobs: incoming files land in the downloads directory under
//! a collision-free name, outgoing files stream over the device's
//! current transport, and links/text ride the message channel directly.
//! Progress and outcome surface through notifications keyed by transfer
//! id, with cancel and open-result actions routed back by that id.

pub mod dest;
pub mod device;
pub mod notify;
pub mod plugin;

pub use device::{DeviceHandle, LanTransferFactory, SystemLauncher, TransferFactory, UriLauncher};
pub use notify::{Icon, Notification, NotificationButton};
pub use plugin::{ShareError, SharePlugin};
