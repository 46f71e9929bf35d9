mod error;
mod radix;

pub use error::*;
pub(crate) use radix::*;
