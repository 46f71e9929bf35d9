use crate::{CUSTOM_EPOCH, TimeSource};
use core::time::Duration;
use std::{
    sync::{
        Arc, OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    thread::{self, JoinHandle},
    time::{Instant, SystemTime, UNIX_EPOCH},
};

/// Shared ticker thread that updates every second.
#[derive(Debug)]
struct SharedTickerInner {
    current: AtomicU64,
    _handle: OnceLock<JoinHandle<()>>,
}

/// A monotonic time source that returns elapsed time since process start,
/// offset from a user-defined epoch.
///
/// This avoids wall-clock adjustments (e.g., NTP or daylight savings changes)
/// while still aligning timestamps to a fixed origin.
///
/// Internally, the clock measures time by capturing `Instant::now()` at
/// construction and adding to it the duration elapsed since a given epoch
/// (computed from `SystemTime::now()` at startup).
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    inner: Arc<SharedTickerInner>,
    epoch_offset: u64, // in seconds
}

impl Default for MonotonicClock {
    /// Constructs a monotonic clock aligned to the default [`CUSTOM_EPOCH`].
    ///
    /// Panics if system time is earlier than the custom epoch.
    fn default() -> Self {
        Self::with_epoch(CUSTOM_EPOCH)
    }
}

impl MonotonicClock {
    /// Constructs a monotonic clock using a custom epoch as the origin (t = 0),
    /// specified as a [`Duration`] since the Unix epoch.
    ///
    /// The provided epoch defines the zero-point for all future timestamps
    /// returned by this clock. Internally, the clock spawns a background thread
    /// that updates a shared atomic counter once per second, using a monotonic
    /// timer (`Instant`) to measure elapsed time since startup.
    ///
    /// On each call to [`current_seconds`], the clock returns the current tick
    /// value plus a fixed offset - the precomputed difference between the
    /// current wall-clock time (`SystemTime::now()`) and the given epoch.
    ///
    /// This design avoids syscalls on the hot path and ensures that time never
    /// goes backward, even if the system clock is adjusted externally.
    ///
    /// The ticker thread holds only a weak handle to the shared counter, so it
    /// terminates once the last clone of the clock is dropped.
    ///
    /// # Panics
    ///
    /// Panics if:
    ///
    /// - The current system time is earlier than the given epoch
    /// - The internal ticker thread has already been initialized
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::{SystemTime, UNIX_EPOCH};
    /// use chronoid::{MonotonicClock, TimeSource};
    ///
    /// let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();
    /// let clock = MonotonicClock::with_epoch(now);
    ///
    /// // Anchored to "now", so the first readings sit at (or near) zero and
    /// // only ever count up.
    /// let ts: u64 = clock.current_seconds();
    /// assert!(ts < 60);
    /// ```
    ///
    /// [`current_seconds`]: TimeSource::current_seconds
    pub fn with_epoch(epoch: Duration) -> Self {
        let start = Instant::now();
        let system_now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("System clock before UNIX_EPOCH");
        let offset = system_now
            .checked_sub(epoch)
            .expect("System clock before custom epoch")
            .as_secs();

        let inner = Arc::new(SharedTickerInner {
            current: AtomicU64::new(0),
            _handle: OnceLock::new(),
        });

        let weak_inner = Arc::downgrade(&inner);
        let handle = thread::spawn(move || {
            let mut tick = 0;

            loop {
                let Some(inner_ref) = weak_inner.upgrade() else {
                    break;
                };

                // Compute the absolute target time of the next tick
                let target = start + Duration::from_secs(tick);

                // Sleep if we are early
                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                // After waking, recompute how far we actually are from the
                // start
                let now_secs = start.elapsed().as_secs();

                // Monotonic store, aligned to elapsed seconds since start
                inner_ref.current.store(now_secs, Ordering::Relaxed);

                // Align to next tick after the current actual time
                tick = now_secs + 1;
            }
        });

        inner
            ._handle
            .set(handle)
            .expect("failed to set thread handle");

        Self {
            inner,
            epoch_offset: offset,
        }
    }
}

impl TimeSource<u64> for MonotonicClock {
    /// Returns the number of seconds since the configured epoch, based on the
    /// elapsed monotonic time since construction.
    fn current_seconds(&self) -> u64 {
        self.epoch_offset + self.inner.current.load(Ordering::Relaxed)
    }
}

impl TimeSource<u32> for MonotonicClock {
    /// Returns the number of seconds since the configured epoch, truncated to
    /// the identifier's 32-bit timestamp field.
    fn current_seconds(&self) -> u32 {
        <Self as TimeSource<u64>>::current_seconds(self) as u32
    }
}
