//! Passsync-DB: read-only SQLite access to the decoded-pass database.
//!
//! The ground station's capture pipeline writes one row per decoded
//! satellite pass into `panel.db`; this crate reads those rows and never
//! writes. It uses rusqlite with r2d2 connection pooling.
//!
//! # Modules
//!
//! - `pool` - Connection pool management
//! - `models` - Rust models matching the external schema
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```no_run
//! use passsync_db::pool::{init_pool, get_conn};
//! use passsync_db::queries::passes;
//!
//! let pool = init_pool("/home/pi/raspberry-noaa-v2/db/panel.db").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! for pass in passes::list_passes(&conn).unwrap() {
//!     println!("pass {} ({})", pass.id, pass.file_path);
//! }
//! ```

pub mod models;
pub mod pool;
pub mod queries;
