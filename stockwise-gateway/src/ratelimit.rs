//! Fixed-window rate limiting for the license validation surface.
//!
//! One counter per client address. A fixed window is intentionally simple:
//! inexactness at window boundaries is traded for constant-time
//! bookkeeping at the very low call volume this endpoint sees. State is
//! process-local; under horizontal scaling each instance enforces the
//! limit independently.
//!
//! The narrow `try_acquire` surface is deliberate so a shared external
//! counter could replace this without changing call sites.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default requests allowed per window.
pub const DEFAULT_LIMIT: u32 = 10;

/// Default window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

struct Window {
    count: u32,
    reset_at: Instant,
}

/// Per-address fixed-window request counter.
pub struct FixedWindowLimiter {
    limit: u32,
    window: Duration,
    entries: Mutex<HashMap<IpAddr, Window>>,
}

impl FixedWindowLimiter {
    #[must_use]
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Records a request from `addr` at the current time. Returns false
    /// once the address has exhausted its window.
    pub fn try_acquire(&self, addr: IpAddr) -> bool {
        self.try_acquire_at(addr, Instant::now())
    }

    /// Like [`try_acquire`](Self::try_acquire) with an explicit clock.
    pub fn try_acquire_at(&self, addr: IpAddr, now: Instant) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let entry = entries.entry(addr).or_insert(Window {
            count: 0,
            reset_at: now + self.window,
        });
        if now >= entry.reset_at {
            *entry = Window {
                count: 0,
                reset_at: now + self.window,
            };
        }
        if entry.count >= self.limit {
            return false;
        }
        entry.count += 1;
        true
    }
}

impl Default for FixedWindowLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, DEFAULT_WINDOW)
    }
}
