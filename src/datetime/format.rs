//! Date/time formatting
//!
//! Every call captures the current instant once; all representations and
//! the reported timestamp are derived from that single snapshot.

use chrono::{DateTime, Local, Offset, SecondsFormat, Utc};
use chrono_tz::Tz;

use crate::datetime::types::{DateTimeArgs, DateTimeReport, OutputFormat};
use crate::error::DateTimeError;

/// en-US "full" date style with "long" time style, zone label appended separately
const LOCALE_ZONED_FORMAT: &str = "%A, %B %-d, %Y at %-I:%M:%S %p";

/// Zones en-US labels as "UTC" rather than by offset
const UTC_ZONES: [&str; 8] = [
    "UTC",
    "UCT",
    "Universal",
    "Zulu",
    "Etc/UTC",
    "Etc/UCT",
    "Etc/Universal",
    "Etc/Zulu",
];

/// North American metazone abbreviations en-US spells out
const US_ABBREVIATIONS: [&str; 12] = [
    "EST", "EDT", "CST", "CDT", "MST", "MDT", "PST", "PDT", "AKST", "AKDT", "HST", "HDT",
];

/// Legacy zone names that map onto the North American metazones
const US_LEGACY_ZONES: [&str; 7] = ["EST5EDT", "CST6CDT", "MST7MDT", "PST8PDT", "EST", "MST", "HST"];

/// en-US default short date/time representation
const LOCALE_DEFAULT_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Build the report for the current instant
pub fn current_datetime(args: &DateTimeArgs) -> Result<DateTimeReport, DateTimeError> {
    report_at(Utc::now(), args)
}

/// Build the report for a given instant
pub fn report_at(instant: DateTime<Utc>, args: &DateTimeArgs) -> Result<DateTimeReport, DateTimeError> {
    Ok(DateTimeReport {
        datetime: format_instant(instant, args)?,
        format: args.format_label().to_string(),
        timezone: args.timezone_label().to_string(),
        timestamp: instant.timestamp_millis(),
    })
}

/// Render an instant according to the requested format
pub fn format_instant(instant: DateTime<Utc>, args: &DateTimeArgs) -> Result<String, DateTimeError> {
    match args.format {
        OutputFormat::Iso => Ok(format_iso(instant)),
        OutputFormat::Locale => match args.timezone.as_deref() {
            Some(name) => format_locale_in(instant, name),
            None => Ok(format_locale_default(instant)),
        },
        OutputFormat::Unix => Ok(format_unix(instant)),
    }
}

/// `YYYY-MM-DDTHH:mm:ss.sssZ`
fn format_iso(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn format_locale_in(instant: DateTime<Utc>, name: &str) -> Result<String, DateTimeError> {
    let tz = Tz::from_str_insensitive(name).map_err(|_| DateTimeError::InvalidTimezone {
        name: name.to_string(),
    })?;

    let local = instant.with_timezone(&tz);
    Ok(format!("{} {}", local.format(LOCALE_ZONED_FORMAT), zone_label(&local)))
}

/// en-US long time zone label: a US abbreviation, "UTC", or `GMT±H[:MM]`
fn zone_label(local: &DateTime<Tz>) -> String {
    let name = local.timezone().name();
    if UTC_ZONES.contains(&name) {
        return "UTC".to_string();
    }

    let abbreviation = local.format("%Z").to_string();
    if is_north_american(name) && US_ABBREVIATIONS.contains(&abbreviation.as_str()) {
        return abbreviation;
    }

    gmt_offset(local.offset().fix().local_minus_utc())
}

fn is_north_american(name: &str) -> bool {
    // Cuba shares the CST/CDT abbreviations but not the metazone
    (name.starts_with("America/") && name != "America/Havana")
        || name.starts_with("US/")
        || name == "Pacific/Honolulu"
        || US_LEGACY_ZONES.contains(&name)
}

fn gmt_offset(seconds: i32) -> String {
    if seconds == 0 {
        return "GMT".to_string();
    }

    let sign = if seconds < 0 { '-' } else { '+' };
    let seconds = seconds.abs();
    let (hours, minutes) = (seconds / 3600, seconds % 3600 / 60);

    if minutes == 0 {
        format!("GMT{}{}", sign, hours)
    } else {
        format!("GMT{}{}:{:02}", sign, hours, minutes)
    }
}

fn format_locale_default(instant: DateTime<Utc>) -> String {
    instant.with_timezone(&Local).format(LOCALE_DEFAULT_FORMAT).to_string()
}

fn format_unix(instant: DateTime<Utc>) -> String {
    // floor, not truncation, for instants before the epoch
    instant.timestamp_millis().div_euclid(1000).to_string()
}
