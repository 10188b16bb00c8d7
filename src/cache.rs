//! Time-bound memoization for the exchange listing

use std::time::{Duration, Instant};

use parking_lot::RwLock;

/// Read-through cache holding one value for a bounded lifetime.
///
/// Readers inside the validity window share the cached value without
/// re-fetching. Once the window lapses the next caller refreshes; two
/// callers racing exactly at expiry may both fetch once, which is harmless
/// for idempotent data.
pub(crate) struct TtlCache<T> {
    ttl: Duration,
    slot: RwLock<Option<(Instant, T)>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Return the cached value while fresh, otherwise run `refresh` and
    /// store its result. The refresh itself runs outside the lock.
    pub fn get_or_refresh<E>(&self, refresh: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        if let Some((stored_at, value)) = &*self.slot.read() {
            if stored_at.elapsed() < self.ttl {
                return Ok(value.clone());
            }
        }

        let value = refresh()?;
        *self.slot.write() = Some((Instant::now(), value.clone()));
        Ok(value)
    }
}
