//! Data Transfer Objects (DTOs).

mod area_dto;
mod search_dto;
mod unit_dto;

pub use area_dto::*;
pub use search_dto::*;
pub use unit_dto::*;
