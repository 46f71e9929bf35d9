use crate::{IdGenStatus, RandSource, Result, TimeSource};
use core::fmt;

/// A minimal interface for generating time-ordered identifiers.
pub trait TimeIdGenerator<T, R>
where
    T: TimeSource<u32>,
    R: RandSource<u128>,
{
    type Err: fmt::Debug;

    /// Creates a new generator from a time source and an RNG.
    fn new(time: T, rng: R) -> Self
    where
        Self: Sized;

    /// A fallible version of [`Self::next_id`] that returns a [`Result`].
    ///
    /// # Errors
    /// - May return an error if the underlying generator uses a lock and it
    ///   is poisoned.
    fn try_next_id(&self) -> Result<IdGenStatus, Self::Err>;

    /// Returns the next available ID.
    ///
    /// # Panics
    /// Panics if [`Self::try_next_id`] fails. Generation only fails for
    /// lock-based generators built on the std mutex, and only if another
    /// thread panicked while holding the lock.
    fn next_id(&self) -> IdGenStatus {
        match self.try_next_id() {
            Ok(status) => status,
            Err(e) => panic!("id generation failed: {e:?}"),
        }
    }
}
