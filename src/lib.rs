//! Passsync - ground-station pass synchronization daemon
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod remote;
pub mod scheduler;
pub mod sync;
