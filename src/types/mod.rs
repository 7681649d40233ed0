//! Shared types for popcache.

pub mod config;
pub mod errors;
