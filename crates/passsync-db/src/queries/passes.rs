//! Queries over the `decoded_passes` table.

use rusqlite::Connection;

use passsync_common::{Error, Result};

use crate::models::DecodedPass;

/// Read every decoded pass, in the table's natural order.
///
/// No ordering is imposed; the sync engine processes rows in whatever order
/// SQLite yields them.
///
/// # Arguments
///
/// * `conn` - Database connection
///
/// # Returns
///
/// * `Ok(Vec<DecodedPass>)` - All recorded passes
/// * `Err(Error)` - If a database error occurs
pub fn list_passes(conn: &Connection) -> Result<Vec<DecodedPass>> {
    let mut stmt = conn
        .prepare("SELECT * FROM decoded_passes")
        .map_err(|e| Error::database(e.to_string()))?;

    let passes = stmt
        .query_map([], DecodedPass::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(passes)
}
