//! Single-flight access-token renewal.
//!
//! DESIGN
//! ======
//! One slot holds the renewal currently in flight as a shared future. The
//! first request to fail authorization fills the slot; requests failing
//! while it runs clone the same future and get the same outcome. Whoever
//! observes completion first empties the slot.
//!
//! TRADE-OFFS
//! ==========
//! The slot holds only a weak handle. When every waiter is dropped the
//! renewal future is dropped with them, cancelling the refresh call, and the
//! next 401 starts a fresh renewal. A slot whose future already completed
//! but was never emptied is treated as stale and replaced.

use std::sync::Mutex;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared, WeakShared};

use super::error::RenewalError;

/// Outcome of a renewal: the new access token.
pub type RenewalResult = Result<String, RenewalError>;

type RenewalTask = BoxFuture<'static, RenewalResult>;
type RenewalFuture = Shared<RenewalTask>;

#[derive(Default)]
pub struct RenewalGate {
    slot: Mutex<Option<WeakShared<RenewalTask>>>,
}

impl RenewalGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the in-flight renewal, or start one with `start` if none is running.
    pub async fn renew<F>(&self, start: F) -> RenewalResult
    where
        F: FnOnce() -> RenewalTask,
    {
        let renewal = {
            let mut slot = self.lock();
            match Self::live(slot.as_ref()) {
                Some(existing) => {
                    tracing::debug!("joining in-flight token renewal");
                    existing
                }
                None => {
                    tracing::debug!("starting token renewal");
                    let fresh = start().shared();
                    *slot = fresh.downgrade();
                    fresh
                }
            }
        };

        let outcome = renewal.clone().await;

        let mut slot = self.lock();
        if Self::live(slot.as_ref()).is_none_or(|current| current.ptr_eq(&renewal)) {
            *slot = None;
        }
        outcome
    }

    /// Whether a renewal is currently running.
    #[must_use]
    pub fn in_flight(&self) -> bool {
        Self::live(self.lock().as_ref()).is_some()
    }

    /// The slot's renewal if some waiter still holds it and it has not completed.
    fn live(slot: Option<&WeakShared<RenewalTask>>) -> Option<RenewalFuture> {
        slot.and_then(WeakShared::upgrade)
            .filter(|f| f.peek().is_none())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<WeakShared<RenewalTask>>> {
        self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "renewal_test.rs"]
mod tests;
