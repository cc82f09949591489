//! MySQL implementations of the repository traits.

mod area_repository;
mod booking_repository;
mod unit_repository;

pub use area_repository::MySqlAreaRepository;
pub use booking_repository::MySqlBookingRepository;
pub use unit_repository::MySqlUnitRepository;
