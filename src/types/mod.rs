//! Shared types.

pub mod config;
pub mod errors;
pub mod nutrients;
pub mod requests;
pub mod responses;
