use core::cmp::Ordering;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, IdGenStatus, Mutex, RandSource, Result, TimeId, TimeIdGenerator, TimeSource};

/// A lock-based *monotonic* identifier generator suitable for multi-threaded
/// environments.
///
/// This generator wraps its state in an [`Arc<Mutex<_>>`], allowing safe
/// shared use across threads.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Probabilistically unique (no coordination required)
/// - ✅ Time-ordered (monotonically increasing within a tick)
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - You need monotonically increasing IDs (IDs generated within the same
///   second increment the payload)
///
/// ## See Also
/// - [`BasicTimeIdGenerator`]
/// - [`BasicMonoTimeIdGenerator`]
///
/// [`BasicTimeIdGenerator`]: crate::BasicTimeIdGenerator
/// [`BasicMonoTimeIdGenerator`]: crate::BasicMonoTimeIdGenerator
pub struct LockMonoTimeIdGenerator<T, R>
where
    T: TimeSource<u32>,
    R: RandSource<u128>,
{
    state: Arc<Mutex<TimeId>>,
    time: T,
    rng: R,
}

impl<T, R> LockMonoTimeIdGenerator<T, R>
where
    T: TimeSource<u32>,
    R: RandSource<u128>,
{
    /// Creates a new [`LockMonoTimeIdGenerator`] with the provided time
    /// source and RNG.
    ///
    /// # Example
    /// ```
    /// use chronoid::{IdGenStatus, LockMonoTimeIdGenerator, MonotonicClock, ThreadRandom};
    ///
    /// let generator = LockMonoTimeIdGenerator::new(MonotonicClock::default(), ThreadRandom);
    ///
    /// let id = loop {
    ///     match generator.next_id() {
    ///         IdGenStatus::Ready { id } => break id,
    ///         IdGenStatus::Pending { .. } => std::thread::yield_now(),
    ///     }
    /// };
    /// ```
    pub fn new(time: T, rng: R) -> Self {
        Self::from_components(0, 0, time, rng)
    }

    /// Creates a new ID generator from explicit component values.
    ///
    /// This constructor is primarily useful for advanced use cases such as
    /// restoring state from persistent storage or controlling the starting
    /// point of the generator manually. In typical use, prefer [`Self::new`]
    /// and let the generator initialize itself from the current time.
    pub fn from_components(seconds: u32, payload: u128, time: T, rng: R) -> Self {
        let id = TimeId::from_parts(seconds, payload);
        Self {
            state: Arc::new(Mutex::new(id)),
            time,
            rng,
        }
    }

    /// Generates a new identifier.
    ///
    /// Returns [`IdGenStatus::Pending`] when the payload is exhausted for the
    /// current tick or the clock reads behind the generator state.
    ///
    /// # Panics
    /// Panics if the underlying lock was poisoned (std mutex builds only).
    /// Use [`Self::try_next_id`] for explicit control over that case.
    pub fn next_id(&self) -> IdGenStatus {
        match self.try_next_id() {
            Ok(status) => status,
            Err(e) => panic!("id generation failed: {e}"),
        }
    }

    /// Attempts to generate a new identifier with fallible error handling.
    ///
    /// # Returns
    /// - `Ok(IdGenStatus::Ready { id })`: A new ID is available
    /// - `Ok(IdGenStatus::Pending { yield_for })`: The time to wait (in
    ///   seconds) before trying again
    /// - `Err(e)`: the lock was poisoned
    ///
    /// # Errors
    /// - Returns an error if the underlying lock has been poisoned. With the
    ///   `parking-lot` feature the lock cannot poison and this method never
    ///   fails.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_id(&self) -> Result<IdGenStatus, Error> {
        let now = self.time.current_seconds();

        #[cfg(feature = "parking-lot")]
        let mut id = self.state.lock();
        #[cfg(not(feature = "parking-lot"))]
        let mut id = self.state.lock()?;

        let current_ts = id.seconds();

        match now.cmp(&current_ts) {
            Ordering::Equal => {
                if id.has_payload_room() {
                    *id = id.increment_payload();
                    Ok(IdGenStatus::Ready { id: *id })
                } else {
                    Ok(IdGenStatus::Pending { yield_for: 1 })
                }
            }
            Ordering::Greater => {
                let payload = self.rng.rand();
                *id = id.rollover_to(now, payload);
                Ok(IdGenStatus::Ready { id: *id })
            }
            Ordering::Less => Ok(Self::cold_clock_behind(now, current_ts)),
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u32, current_ts: u32) -> IdGenStatus {
        IdGenStatus::Pending {
            yield_for: current_ts - now,
        }
    }
}

impl<T, R> TimeIdGenerator<T, R> for LockMonoTimeIdGenerator<T, R>
where
    T: TimeSource<u32>,
    R: RandSource<u128>,
{
    type Err = Error;

    fn new(time: T, rng: R) -> Self {
        Self::new(time, rng)
    }

    fn try_next_id(&self) -> Result<IdGenStatus, Self::Err> {
        self.try_next_id()
    }

    fn next_id(&self) -> IdGenStatus {
        self.next_id()
    }
}
