use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const OFFSET_FORMATS: &[&str] = &[
	"%Y-%m-%dT%H:%M:%S%.f%:z",
	"%Y-%m-%d %H:%M:%S%.f%:z",
	"%Y-%m-%dT%H:%M%:z",
	"%Y-%m-%d %H:%M%:z",
];

const NAIVE_FORMATS: &[&str] = &[
	"%Y-%m-%dT%H:%M:%S%.f",
	"%Y-%m-%d %H:%M:%S%.f",
	"%Y-%m-%dT%H:%M",
	"%Y-%m-%d %H:%M",
];

/// Parses a timestamp bound into Unix epoch seconds.
///
/// Accepts a decimal integer (`"1680307200"`) or an ISO-8601 string. A trailing `Z`
/// is read as `+00:00`. Datetimes without offset, and bare dates (midnight), are UTC.
pub fn parse_timestamp(input: &str) -> Result<i64> {
	let trimmed = input.trim();

	if let Ok(ts) = trimmed.parse::<i64>() {
		return Ok(ts);
	}

	let normalized = match trimmed.strip_suffix('Z') {
		Some(head) => format!("{head}+00:00"),
		None => trimmed.to_string(),
	};

	if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
		return Ok(dt.timestamp());
	}
	for fmt in OFFSET_FORMATS {
		if let Ok(dt) = DateTime::parse_from_str(&normalized, fmt) {
			return Ok(dt.timestamp());
		}
	}
	for fmt in NAIVE_FORMATS {
		if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, fmt) {
			return Ok(dt.and_utc().timestamp());
		}
	}

	match NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
		Ok(date) => Ok(date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp()).unwrap_or_default()),
		Err(err) => Err(Error::TimestampParse {
			input: input.to_string(),
			cause: err.to_string(),
		}),
	}
}

// region:    --- Tests


// endregion: --- Tests
