//! Service implementations.
//!
//! Trait definitions live in the parent module (e.g. `unit_service.rs`).

mod area_service_impl;
mod unit_service_impl;

pub use area_service_impl::AreaServiceImpl;
pub use unit_service_impl::UnitServiceImpl;
