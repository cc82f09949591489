//! The availability-aware listing search.
//!
//! Leaf-first: [`ConflictResolver`] finds units booked during the requested
//! stay, [`QueryPlanner`] turns the request into a repository query,
//! [`ResultAssembler`] shapes units for callers, and [`ListingCache`] ties
//! them together behind a read-through cache.

mod assembler;
mod coalescer;
mod conflict_resolver;
mod listing_cache;
mod query_planner;

pub use assembler::ResultAssembler;
pub use coalescer::{CoalesceGuard, MissCoalescer};
pub use conflict_resolver::{ConflictResolver, ConflictSet};
pub use listing_cache::ListingCache;
pub use query_planner::QueryPlanner;
