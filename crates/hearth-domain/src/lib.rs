//! # Hearth Domain
//!
//! Rentable units, their bookings and areas, plus the value objects that
//! describe a listing search.

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
