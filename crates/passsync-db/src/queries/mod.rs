//! Database query operations.

pub mod passes;
