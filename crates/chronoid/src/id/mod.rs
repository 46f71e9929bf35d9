mod time_id;

pub use time_id::*;
