//! Registry of form submissions with an auth call outstanding.
//!
//! Each rendered form carries a random id. A POST claims the id for the
//! duration of its backend call; a second POST of the same form while the
//! first is outstanding is turned away instead of issuing another call.
//! The claim is released when the returned [`Ticket`] drops.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use uuid::Uuid;

#[derive(Clone, Default)]
pub struct InFlight {
    inner: Arc<Mutex<HashSet<Uuid>>>,
}

/// Proof of a claimed form id. Releases the claim on drop.
pub struct Ticket {
    id: Uuid,
    inner: Arc<Mutex<HashSet<Uuid>>>,
}

impl InFlight {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `id`, or `None` if a submission for it is already outstanding.
    #[must_use]
    pub fn claim(&self, id: Uuid) -> Option<Ticket> {
        let mut set = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if !set.insert(id) {
            return None;
        }
        Some(Ticket { id, inner: Arc::clone(&self.inner) })
    }

    #[must_use]
    pub fn is_claimed(&self, id: Uuid) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id)
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}
