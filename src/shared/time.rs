//! Timestamp handling at the system boundary
//!
//! Admin input arrives as `datetime-local` strings without a zone. They are
//! read in one fixed, configured offset and converted to UTC; everything
//! stored and compared afterwards is UTC.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, SecondsFormat, TimeZone, Utc};

use crate::domain::{DomainError, DomainResult};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

fn parse_naive(input: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
}

/// The fixed local zone used to interpret zone-less input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalZone {
    offset: FixedOffset,
}

impl LocalZone {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Parse an offset such as `+05:30`, `-0800`, `Z` or `UTC`.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
            return Ok(Self::utc());
        }

        let invalid = || DomainError::Validation(format!("Invalid UTC offset '{}'", raw));

        let (sign, rest) = match raw.as_bytes().first() {
            Some(b'+') => (1, &raw[1..]),
            Some(b'-') => (-1, &raw[1..]),
            _ => return Err(invalid()),
        };
        let digits: String = rest.chars().filter(|c| *c != ':').collect();
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
        let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
        if minutes >= 60 {
            return Err(invalid());
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(Self::new)
            .ok_or_else(invalid)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Convert admin input to UTC.
    ///
    /// Input with an explicit offset (`...Z`, `...+02:00`) is honoured as
    /// given; zone-less input is read in this zone.
    pub fn to_utc(&self, input: &str) -> DomainResult<DateTime<Utc>> {
        let input = input.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Ok(dt.with_timezone(&Utc));
        }

        let naive = parse_naive(input).ok_or_else(|| {
            DomainError::Validation(format!(
                "Invalid date/time '{}': expected YYYY-MM-DDTHH:MM",
                input
            ))
        })?;

        self.offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| DomainError::Validation(format!("Ambiguous local time '{}'", input)))
    }

    /// Render a UTC instant in this zone.
    pub fn to_local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset)
    }
}

impl Default for LocalZone {
    fn default() -> Self {
        Self::utc()
    }
}

/// Parse a timestamp read back from storage.
///
/// Accepts RFC 3339, or a naive ISO string which is taken as UTC.
pub fn parse_stored_utc(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    parse_naive(raw).map(|naive| Utc.from_utc_datetime(&naive))
}

/// Canonical storage form: RFC 3339, UTC, `Z` suffix.
pub fn format_utc(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}
