use core::{cell::Cell, cmp::Ordering};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{IdGenStatus, RandSource, Result, TimeId, TimeIdGenerator, TimeSource};

/// A *monotonic* identifier generator suitable for single-threaded
/// environments.
///
/// This generator is lightweight and fast, but is not thread-safe.
///
/// ## Features
/// - ❌ Not thread-safe
/// - ✅ Probabilistically unique (no coordination required)
/// - ✅ Time-ordered (monotonically increasing within a tick)
///
/// ## Recommended When
/// - You're in a single-threaded environment (no shared access)
/// - You need monotonically increasing IDs (IDs generated within the same
///   second increment the payload)
///
/// ## See Also
/// - [`BasicTimeIdGenerator`]
/// - [`LockMonoTimeIdGenerator`]
///
/// [`BasicTimeIdGenerator`]: crate::BasicTimeIdGenerator
/// [`LockMonoTimeIdGenerator`]: crate::LockMonoTimeIdGenerator
pub struct BasicMonoTimeIdGenerator<T, R>
where
    T: TimeSource<u32>,
    R: RandSource<u128>,
{
    state: Cell<TimeId>,
    time: T,
    rng: R,
}

impl<T, R> BasicMonoTimeIdGenerator<T, R>
where
    T: TimeSource<u32>,
    R: RandSource<u128>,
{
    /// Creates a new [`BasicMonoTimeIdGenerator`] with the provided time
    /// source and RNG.
    ///
    /// # Example
    /// ```
    /// use chronoid::{BasicMonoTimeIdGenerator, IdGenStatus, MonotonicClock, ThreadRandom};
    ///
    /// let generator = BasicMonoTimeIdGenerator::new(MonotonicClock::default(), ThreadRandom);
    ///
    /// let id = loop {
    ///     match generator.next_id() {
    ///         IdGenStatus::Ready { id } => break id,
    ///         IdGenStatus::Pending { .. } => core::hint::spin_loop(),
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
            state: Cell::new(id),
            time,
            rng,
        }
    }

    /// Generates a new identifier.
    ///
    /// Returns [`IdGenStatus::Pending`] when the payload is exhausted for the
    /// current tick or the clock reads behind the generator state; callers
    /// should back off for the indicated number of seconds and retry.
    pub fn next_id(&self) -> IdGenStatus {
        match self.try_next_id() {
            Ok(status) => status,
            Err(e) =>
            {
                #[allow(unreachable_code)]
                match e {}
            }
        }
    }

    /// Attempts to generate a new identifier with fallible error handling.
    ///
    /// # Returns
    /// - `Ok(IdGenStatus::Ready { id })`: A new ID is available
    /// - `Ok(IdGenStatus::Pending { yield_for })`: The time to wait (in
    ///   seconds) before trying again
    /// - `Err(_)`: infallible for this generator
    ///
    /// # Errors
    /// - This method currently does not return any errors and always returns
    ///   `Ok`. It is marked as fallible to allow for future extensibility.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_id(&self) -> Result<IdGenStatus> {
        let now = self.time.current_seconds();
        let state = self.state.get();
        let current_ts = state.seconds();

        match now.cmp(&current_ts) {
            Ordering::Equal => {
                if state.has_payload_room() {
                    let updated = state.increment_payload();
                    self.state.set(updated);
                    Ok(IdGenStatus::Ready { id: updated })
                } else {
                    Ok(IdGenStatus::Pending { yield_for: 1 })
                }
            }
            Ordering::Greater => {
                // Set the new timestamp and payload.
                let payload = self.rng.rand();
                let updated = state.rollover_to(now, payload);
                self.state.set(updated);
                Ok(IdGenStatus::Ready { id: updated })
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

impl<T, R> TimeIdGenerator<T, R> for BasicMonoTimeIdGenerator<T, R>
where
    T: TimeSource<u32>,
    R: RandSource<u128>,
{
    type Err = core::convert::Infallible;

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
