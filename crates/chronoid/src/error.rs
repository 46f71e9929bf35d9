use crate::Base62Error;
use core::fmt;

/// A result type that is infallible by default.
///
/// Most `chronoid` APIs are infallible. The fallible ones are radix-62
/// decoding and, when built with the std mutex, lock acquisition.
pub type Result<T, E = core::convert::Infallible> = core::result::Result<T, E>;

/// All error variants that `chronoid` can emit.
///
/// When the `parking-lot` feature is enabled, mutexes do not poison and the
/// only remaining failure mode is radix-62 decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The operation failed because the generator lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. Not available
    /// with the `parking-lot` feature, whose mutexes do not poison.
    #[cfg(not(feature = "parking-lot"))]
    LockPoisoned,

    /// An error occurred while decoding a radix-62 identifier string.
    Base62(Base62Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            #[cfg(not(feature = "parking-lot"))]
            Self::LockPoisoned => write!(f, "generator lock poisoned"),
            Self::Base62(e) => write!(f, "{e}"),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            #[cfg(not(feature = "parking-lot"))]
            Self::LockPoisoned => None,
            Self::Base62(e) => Some(e),
        }
    }
}

impl From<Base62Error> for Error {
    fn from(err: Base62Error) -> Self {
        Self::Base62(err)
    }
}

#[cfg(not(feature = "parking-lot"))]
use std::sync::{MutexGuard, PoisonError};

// Collapse all poisoned lock errors into the simplified `LockPoisoned`.
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
