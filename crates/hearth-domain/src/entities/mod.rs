//! Domain entities.

mod area;
mod booking;
mod unit;

pub use area::*;
pub use booking::*;
pub use unit::*;
