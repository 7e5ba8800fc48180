//! Vendor Fetch Library
//!
//! Downloads pinned third-party sources into a local vendor directory,
//! one file at a time, removing any partially written file on failure.

pub mod commands;
pub mod core;
pub mod error;
pub mod utils;
