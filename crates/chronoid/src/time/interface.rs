use core::time::Duration;

/// Identifier epoch: Tuesday, May 13, 2014 16:53:20 UTC.
///
/// Identifier timestamps count whole seconds from this origin, which keeps
/// the 32-bit seconds field useful well into the 22nd century.
pub const CUSTOM_EPOCH: Duration = Duration::from_secs(1_400_000_000);

/// A trait for time sources that return a monotonic or wall-clock timestamp.
///
/// This abstraction allows you to plug in a real system clock, a monotonic
/// timer, or a mocked time source in tests.
///
/// The timestamp type `T` is generic (typically `u32` or `u64`), and the unit
/// is expected to be **whole seconds** relative to a configurable origin.
///
/// # Example
///
/// ```
/// use chronoid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource<u32> for FixedTime {
///     fn current_seconds(&self) -> u32 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_seconds(), 1234);
/// ```
pub trait TimeSource<T> {
    /// Returns the current time in seconds since the configured epoch.
    fn current_seconds(&self) -> T;
}
