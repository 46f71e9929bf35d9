//! Thread-local identifier generation utilities.
//!
//! Provides monotonic identifier generation using thread-local generators
//! that share a single process-wide monotonic clock.
//!
//! In rare cases where a generator saturates within the same second
//! (payload overflow) or observes the clock behind its state, generation
//! yields using the configured backoff strategy (e.g., spin, yield, sleep).
//!
//! # Example
//! ```rust
//! use chronoid::{Backoff, time_id};
//!
//! let id = time_id(Backoff::Yield);
//! println!("ID: {id}");
//! ```

use crate::{BasicMonoTimeIdGenerator, IdGenStatus, MonotonicClock, ThreadRandom};
use std::sync::LazyLock;

/// A process-wide clock anchored to the identifier epoch, guaranteed never
/// to run backwards.
static GLOBAL_MONOTONIC_CLOCK: LazyLock<MonotonicClock> = LazyLock::new(MonotonicClock::default);

thread_local! {
    /// A thread-local monotonic generator that reads from the global clock.
    static MONO_TIME_ID: BasicMonoTimeIdGenerator<MonotonicClock, ThreadRandom> =
        BasicMonoTimeIdGenerator::new(
            GLOBAL_MONOTONIC_CLOCK.clone(),
            ThreadRandom,
        );
}

/// Backoff strategies for handling generator throttling.
///
/// If the payload is exhausted within a single second (after 2^128
/// increments) or the clock reads behind the generator state, the generator
/// invokes one of these strategies to wait before retrying.
#[derive(Debug, Clone, Copy)]
pub enum Backoff {
    /// Busy-waits in a tight loop.
    ///
    /// Offers maximum throughput at the cost of high CPU usage.
    Spin,

    /// Yields to the OS scheduler to allow other threads to run.
    ///
    /// More CPU-friendly than spinning, but may still busy-wait if no other
    /// threads are ready.
    Yield,

    /// Sleeps for the requested retry delay in seconds.
    ///
    /// Lowest CPU usage, but may oversleep depending on platform-specific
    /// scheduler resolution.
    Sleep,
}

/// Generates an identifier using the specified [`Backoff`] strategy.
///
/// This is a convenient wrapper around [`time_id_with_backoff`] with
/// built-in strategies.
///
/// # Example
/// ```rust
/// use chronoid::{Backoff, time_id};
///
/// let id = time_id(Backoff::Yield);
/// assert!(!id.encode().is_empty());
/// ```
pub fn time_id(strategy: Backoff) -> crate::TimeId {
    time_id_with_backoff(|yield_for| match strategy {
        Backoff::Spin => core::hint::spin_loop(),
        Backoff::Yield => std::thread::yield_now(),
        Backoff::Sleep => {
            std::thread::sleep(core::time::Duration::from_secs(u64::from(yield_for)));
        }
    })
}

/// Generates an identifier using a custom backoff strategy.
///
/// The provided function is called when the generator must wait before
/// retrying. The `yield_for` argument indicates the recommended wait time in
/// seconds.
///
/// # Example
/// ```rust
/// use chronoid::time_id_with_backoff;
///
/// let id = time_id_with_backoff(|yield_for| {
///     std::thread::sleep(std::time::Duration::from_secs(u64::from(yield_for)));
/// });
/// ```
pub fn time_id_with_backoff(f: impl Fn(u32)) -> crate::TimeId {
    MONO_TIME_ID.with(|g| {
        loop {
            match g.next_id() {
                IdGenStatus::Ready { id } => break id,
                IdGenStatus::Pending { yield_for } => f(yield_for),
            }
        }
    })
}
