//! Domain value objects.

mod date_range;
mod sort_key;

pub use date_range::*;
pub use sort_key::*;
