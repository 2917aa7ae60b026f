//! Cancellation registry for in-flight transfers.
//!
//! The transfer id is the sole correlation key between the notification
//! surface and the byte stream: the Cancel action carries the id, and
//! cancelling fires the token the transfer loop is watching.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

/// Maps in-flight transfer ids to their cancellation tokens.
#[derive(Default)]
pub struct TransferRegistry {
    inner: Mutex<HashMap<Uuid, CancellationToken>>,
}

impl TransferRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new transfer and returns its cancellation token.
    pub fn begin(&self, id: Uuid) -> CancellationToken {
        let token = CancellationToken::new();
        self.inner
            .lock()
            .expect("transfer registry poisoned")
            .insert(id, token.clone());
        token
    }

    /// Cancels the transfer with the given id.
    ///
    /// Returns `false` when the id is unknown or already settled; the
    /// cancel action racing a completed transfer is a no-op.
    pub fn cancel(&self, id: Uuid) -> bool {
        let guard = self.inner.lock().expect("transfer registry poisoned");
        match guard.get(&id) {
            Some(token) => {
                debug!(transfer = %id, "transfer cancelled");
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Removes a settled transfer from the registry.
    pub fn finish(&self, id: Uuid) {
        self.inner
            .lock()
            .expect("transfer registry poisoned")
            .remove(&id);
    }

    /// Number of transfers currently in flight.
    pub fn active(&self) -> usize {
        self.inner.lock().expect("transfer registry poisoned").len()
    }
}
