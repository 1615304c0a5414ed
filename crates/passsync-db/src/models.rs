//! Rust models matching the external `decoded_passes` schema.

use rusqlite::Row;

/// One decoded satellite pass, as recorded by the capture pipeline.
///
/// The capability flags are stored as 0/1 integers in SQLite and surfaced
/// here as booleans. `file_path` is the filename prefix shared by every
/// image rendered from this pass; it also encodes the satellite family
/// (`NOAA` / `METEOR`) in its text.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPass {
    pub id: i64,
    pub gain: f64,
    /// Pass start as epoch seconds.
    pub pass_start: i64,
    pub daylight_pass: bool,
    pub has_histogram: bool,
    pub has_polar_az_el: bool,
    pub has_polar_direction: bool,
    pub has_pristine: bool,
    pub has_spectrogram: bool,
    pub file_path: String,
}

impl DecodedPass {
    /// Map a `decoded_passes` row by column name.
    ///
    /// Column-name access keeps the mapping stable against extra columns the
    /// capture pipeline may add, which matters because we read with
    /// `SELECT *`.
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            gain: row.get("gain")?,
            pass_start: row.get("pass_start")?,
            daylight_pass: row.get::<_, i64>("daylight_pass")? != 0,
            has_histogram: row.get::<_, i64>("has_histogram")? != 0,
            has_polar_az_el: row.get::<_, i64>("has_polar_az_el")? != 0,
            has_polar_direction: row.get::<_, i64>("has_polar_direction")? != 0,
            has_pristine: row.get::<_, i64>("has_pristine")? != 0,
            has_spectrogram: row.get::<_, i64>("has_spectrogram")? != 0,
            file_path: row.get("file_path")?,
        })
    }
}
