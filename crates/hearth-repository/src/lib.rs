//! # Hearth Repository
//!
//! Read access to units, bookings and areas.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn UnitRepository> / Arc<dyn BookingRepository> / Arc<dyn AreaRepository>
//! MySqlUnitRepository, MySqlBookingRepository, MySqlAreaRepository
//!   ↓  Arc<DatabasePool>
//! MySQL
//! ```
//!
//! The `memory` feature adds in-process implementations with call
//! counters, used by the service tests and local development.

#[cfg(feature = "memory")]
pub mod memory;
pub mod mysql;
pub mod pool;
pub mod traits;

pub use mysql::*;
pub use pool::*;
pub use traits::*;
