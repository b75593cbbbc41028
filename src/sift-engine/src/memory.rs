//! Memory accounting for buffers allocated by the engine.
//!
//! Selection vectors reserve their full capacity up front through a
//! [`MemoryManager`] and hand it back when dropped. Accounting only: nothing
//! spills, and a refused reservation is an error for the caller.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::trace;

use common_config::MemoryConfig;
use common_error::{SiftError, SiftResult};

/// Tracks, and optionally limits, bytes held by engine buffers.
pub trait MemoryManager: Send + Sync + std::fmt::Debug {
    /// Reserve memory. Fails with `ResourceExhausted` if the limit is exceeded.
    fn reserve(&self, bytes: usize) -> SiftResult<()>;

    /// Release previously reserved memory.
    fn release(&self, bytes: usize);

    /// Bytes currently reserved.
    fn used(&self) -> usize;

    /// Limit in bytes (0 = unlimited).
    fn limit(&self) -> usize;

    /// Bytes still available (`usize::MAX` if unlimited).
    fn available(&self) -> usize {
        match self.limit() {
            0 => usize::MAX,
            limit => limit.saturating_sub(self.used()),
        }
    }
}

/// Manager that accepts every reservation and records nothing.
#[derive(Debug, Default)]
pub struct NoopMemoryManager;

impl NoopMemoryManager {
    /// Create a new no-op memory manager.
    pub fn new() -> Self {
        Self
    }
}

impl MemoryManager for NoopMemoryManager {
    fn reserve(&self, _bytes: usize) -> SiftResult<()> {
        Ok(())
    }

    fn release(&self, _bytes: usize) {}

    fn used(&self) -> usize {
        0
    }

    fn limit(&self) -> usize {
        0
    }
}

/// Atomic byte counter with an optional limit. Safe to share across threads
/// evaluating independent batches.
#[derive(Debug)]
pub struct TrackingMemoryManager {
    used: AtomicUsize,
    limit: usize,
}

impl TrackingMemoryManager {
    /// Create a manager limited to `limit` bytes. 0 means unlimited.
    pub fn new(limit: usize) -> Self {
        Self {
            used: AtomicUsize::new(0),
            limit,
        }
    }

    /// Create an unlimited manager (accounting only).
    pub fn unlimited() -> Self {
        Self::new(0)
    }
}

impl Default for TrackingMemoryManager {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl MemoryManager for TrackingMemoryManager {
    fn reserve(&self, bytes: usize) -> SiftResult<()> {
        if bytes == 0 {
            return Ok(());
        }

        let mut current = self.used.load(Ordering::Relaxed);
        loop {
            let new = current.saturating_add(bytes);
            if self.limit > 0 && new > self.limit {
                return Err(SiftError::resource_exhausted(format!(
                    "memory limit exceeded: {} + {} > {} bytes",
                    current, bytes, self.limit
                )));
            }

            match self
                .used
                .compare_exchange_weak(current, new, Ordering::SeqCst, Ordering::Relaxed)
            {
                Ok(_) => {
                    trace!("reserved {bytes} bytes, {new} in use");
                    return Ok(());
                }
                Err(actual) => current = actual,
            }
        }
    }

    fn release(&self, bytes: usize) {
        if bytes == 0 {
            return;
        }

        // Over-release clamps at zero rather than wrapping.
        let previous = self
            .used
            .fetch_update(Ordering::SeqCst, Ordering::Relaxed, |current| {
                Some(current.saturating_sub(bytes))
            })
            .unwrap_or_else(|current| current);
        trace!(
            "released {bytes} bytes, {} in use",
            previous.saturating_sub(bytes)
        );
    }

    fn used(&self) -> usize {
        self.used.load(Ordering::SeqCst)
    }

    fn limit(&self) -> usize {
        self.limit
    }
}

/// Build the manager described by `config`: tracking with the configured
/// limit, or tracking without a limit when none is set.
pub fn memory_manager_from_config(config: &MemoryConfig) -> Arc<dyn MemoryManager> {
    Arc::new(TrackingMemoryManager::new(config.limit.unwrap_or(0)))
}

/// RAII guard for a reservation. Releases on drop.
#[derive(Debug)]
pub struct MemoryReservation {
    manager: Arc<dyn MemoryManager>,
    bytes: usize,
}

impl MemoryReservation {
    /// Reserve `bytes` from `manager`.
    pub fn try_new(manager: Arc<dyn MemoryManager>, bytes: usize) -> SiftResult<Self> {
        manager.reserve(bytes)?;
        Ok(Self { manager, bytes })
    }

    /// Reserved size in bytes.
    pub fn size(&self) -> usize {
        self.bytes
    }

    /// Manager this reservation draws from.
    pub fn manager(&self) -> &Arc<dyn MemoryManager> {
        &self.manager
    }
}

impl Drop for MemoryReservation {
    fn drop(&mut self) {
        if self.bytes > 0 {
            self.manager.release(self.bytes);
        }
    }
}
