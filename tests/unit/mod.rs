//! Unit tests module
//!
//! Contains unit tests for individual components, through the public API.

#[cfg(feature = "cache")]
mod cache; // route resolution cache
mod callbacks; // hook chains and action dispatch
mod memo; // bucketed memoization
mod params; // hash-bang parameter parsing
mod route; // route table resolution
