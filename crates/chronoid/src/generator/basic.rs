#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{IdGenStatus, RandSource, Result, TimeId, TimeIdGenerator, TimeSource};

/// A *non-monotonic* identifier generator suitable for single or
/// multi-threaded environments.
///
/// Every call packs the current tick with a fresh 128-bit random payload.
/// IDs generated within the same second are unique but land in random order
/// relative to each other.
///
/// ## Features
/// - ✅ Thread-safe (holds no mutable state)
/// - ✅ Probabilistically unique (no coordination required)
/// - ✅ Time-ordered across ticks (random within a tick)
///
/// ## Recommended When
/// - You want the cheapest possible generation path
/// - Sub-second ordering of IDs does not matter
///
/// ## See Also
/// - [`BasicMonoTimeIdGenerator`]
/// - [`LockMonoTimeIdGenerator`]
///
/// [`BasicMonoTimeIdGenerator`]: crate::BasicMonoTimeIdGenerator
/// [`LockMonoTimeIdGenerator`]: crate::LockMonoTimeIdGenerator
pub struct BasicTimeIdGenerator<T, R>
where
    T: TimeSource<u32>,
    R: RandSource<u128>,
{
    time: T,
    rng: R,
}

impl<T, R> BasicTimeIdGenerator<T, R>
where
    T: TimeSource<u32>,
    R: RandSource<u128>,
{
    /// Creates a new [`BasicTimeIdGenerator`] with the provided time source
    /// and RNG.
    ///
    /// # Example
    /// ```
    /// use chronoid::{BasicTimeIdGenerator, IdGenStatus, MonotonicClock, ThreadRandom};
    ///
    /// let generator = BasicTimeIdGenerator::new(MonotonicClock::default(), ThreadRandom);
    ///
    /// let id = match generator.next_id() {
    ///     IdGenStatus::Ready { id } => id,
    ///     IdGenStatus::Pending { .. } => unreachable!(),
    /// };
    /// ```
    pub const fn new(time: T, rng: R) -> Self {
        Self { time, rng }
    }

    /// Generates a new identifier.
    ///
    /// Always returns [`IdGenStatus::Ready`]: with no internal state there is
    /// nothing to exhaust and nothing for the clock to fall behind.
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
    /// # Errors
    /// - This method currently does not return any errors and always returns
    ///   `Ok`. It is marked as fallible to allow for future extensibility.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_id(&self) -> Result<IdGenStatus> {
        Ok(IdGenStatus::Ready {
            id: TimeId::from_parts(self.time.current_seconds(), self.rng.rand()),
        })
    }
}

impl<T, R> TimeIdGenerator<T, R> for BasicTimeIdGenerator<T, R>
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
