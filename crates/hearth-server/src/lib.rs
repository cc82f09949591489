//! # Hearth Server
//!
//! Composition root for the listing service. [`AppBuilder`] turns an
//! [`hearth_config::AppConfig`] into [`Services`]; the `hearth-warmup`
//! binary uses it to check the backing stores and pre-fill the hot caches.

pub mod app;
pub mod startup;

pub use app::*;
