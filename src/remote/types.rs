use chrono::{DateTime, Utc};
use passsync_db::models::DecodedPass;
use serde::Serialize;

/// Insert payload for the remote `passes` collection.
///
/// A copy of [`DecodedPass`] with the epoch-seconds start time converted to
/// a timestamp, flags as booleans, and the satellite family derived from the
/// filename prefix.
#[derive(Debug, Clone, Serialize)]
pub struct RemotePass {
    pub id: i64,
    pub gain: f64,
    pub pass_start: DateTime<Utc>,
    pub daylight_pass: bool,
    pub has_histogram: bool,
    pub has_polar_az_el: bool,
    pub has_polar_direction: bool,
    pub has_pristine: bool,
    pub has_spectrogram: bool,
    pub is_noaa: bool,
    pub is_meteor: bool,
}

impl From<&DecodedPass> for RemotePass {
    fn from(pass: &DecodedPass) -> Self {
        Self {
            id: pass.id,
            gain: pass.gain,
            // Epoch values come from the capture pipeline and are always in
            // range; fall back to the epoch itself rather than failing.
            pass_start: DateTime::from_timestamp(pass.pass_start, 0)
                .unwrap_or(DateTime::UNIX_EPOCH),
            daylight_pass: pass.daylight_pass,
            has_histogram: pass.has_histogram,
            has_polar_az_el: pass.has_polar_az_el,
            has_polar_direction: pass.has_polar_direction,
            has_pristine: pass.has_pristine,
            has_spectrogram: pass.has_spectrogram,
            is_noaa: pass.file_path.contains("NOAA"),
            is_meteor: pass.file_path.contains("METEOR"),
        }
    }
}

/// Insert payload for the remote `passes_images` linking collection.
#[derive(Debug, Clone, Serialize)]
pub struct PassImageLink {
    /// Image filename as stored in the local images directory.
    pub path: String,
    /// Owning pass id.
    pub fk_passes_id: i64,
}
