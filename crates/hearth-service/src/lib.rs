//! # Hearth Service
//!
//! The availability-aware listing search and the smaller read-through caches
//! around it (areas, unit detail, home page).
//!
//! ```text
//! caller ─► ListingCache::search
//!             ├─ hit  ─► cached SearchResult
//!             └─ miss ─► ConflictResolver ─► QueryPlanner ─► UnitRepository
//!                          ─► ResultAssembler ─► cache store ─► SearchResult
//! ```
//!
//! Every handle (repositories, cache, timeouts) is passed in through
//! constructors; nothing here reaches for process-wide state.

pub mod area_service;
pub mod cache;
pub mod dto;
pub mod listing;
pub mod listing_service;
pub mod metrics;
pub mod service_impl;
pub mod unit_service;

pub use area_service::*;
pub use cache::*;
pub use dto::*;
pub use listing::ListingCache;
pub use listing_service::*;
pub use service_impl::*;
pub use unit_service::*;
