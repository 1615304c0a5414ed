//! Database connection pool management.
//!
//! This module provides connection pooling for the external decoded-pass
//! SQLite database using r2d2. The database is produced and owned by the
//! capture pipeline; passsync only ever reads from it, so file-backed pools
//! are opened read-only.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;

use passsync_common::{Error, Result};

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Initialize a read-only pool over the decoded-pass database.
///
/// The database file must already exist; this function never creates it.
/// Pool size is small (2 connections) since the daemon reads the table once
/// per cycle.
///
/// # Arguments
///
/// * `db_path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(DbPool)` - Initialized connection pool
/// * `Err(Error)` - If the file cannot be opened or the pool fails to build
pub fn init_pool(db_path: &str) -> Result<DbPool> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
        | OpenFlags::SQLITE_OPEN_NO_MUTEX
        | OpenFlags::SQLITE_OPEN_URI;
    let manager = SqliteConnectionManager::file(db_path).with_flags(flags);

    let pool = Pool::builder()
        .max_size(2)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create connection pool: {}", e)))?;

    // Fail at startup rather than on the first cycle if the file is missing
    // or unreadable.
    pool.get()
        .map_err(|e| Error::database(format!("Failed to open database {}: {}", db_path, e)))?;

    Ok(pool)
}

/// Initialize an in-memory database pool for testing.
///
/// Read-write, since tests need to seed rows. The database is lost when the
/// pool is dropped.
pub fn init_memory_pool() -> Result<DbPool> {
    let manager = SqliteConnectionManager::memory();

    let pool = Pool::builder()
        .max_size(1)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create in-memory pool: {}", e)))?;

    Ok(pool)
}

/// Get a connection from the pool.
///
/// Convenience wrapper around `pool.get()` that converts the r2d2 error
/// into our common Error type.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("Failed to get connection from pool: {}", e)))
}
