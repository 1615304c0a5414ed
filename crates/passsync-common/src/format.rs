//! Compact duration formatting for log output.

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Render a millisecond duration as a compact human-readable string.
///
/// The sign is ignored. The duration is decomposed into days, hours,
/// minutes, seconds, and milliseconds, and the non-zero components are
/// joined in descending unit order as `<value><unit>` pairs:
///
/// ```
/// use passsync_common::format::format_duration;
///
/// assert_eq!(format_duration(90_061_001), "1d, 1h, 1m, 1s, 1ms");
/// assert_eq!(format_duration(-5_000), "5s");
/// assert_eq!(format_duration(0), "");
/// ```
pub fn format_duration(ms: i64) -> String {
    let ms = ms.abs();

    let components = [
        (ms / MS_PER_DAY, "d"),
        (ms / MS_PER_HOUR % 24, "h"),
        (ms / MS_PER_MINUTE % 60, "m"),
        (ms / MS_PER_SECOND % 60, "s"),
        (ms % 1_000, "ms"),
    ];

    components
        .iter()
        .filter(|(value, _)| *value != 0)
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect::<Vec<_>>()
        .join(", ")
}
