//! Passsync-Common: shared error types and small utilities.
//!
//! This crate provides the pieces used across passsync:
//!
//! - **Error Handling**: the common [`Error`] type and [`Result`] alias
//! - **Formatting**: [`format::format_duration`] for compact elapsed-time
//!   strings in log output
//!
//! # Examples
//!
//! ```
//! use passsync_common::{Error, Result};
//! use passsync_common::format::format_duration;
//!
//! fn example() -> Result<()> {
//!     Err(Error::remote("backend unreachable"))
//! }
//!
//! assert_eq!(format_duration(90_061_001), "1d, 1h, 1m, 1s, 1ms");
//! ```

pub mod error;
pub mod format;

pub use error::{Error, Result};
