pub mod range;
pub mod reading;

pub use range::Range;
pub use reading::{round_tenth, Reading, TIMESTAMP_FORMAT};
