//! # Domain Models
//!
//! Pure types shared by every `PharmEco` slice: configuration, process-wide UI state and
//! the feature-slice registry. Keep it lean: `serde` only, no I/O.

pub mod config;
pub mod registry;
pub mod state;
