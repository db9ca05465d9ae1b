//! Election domain entity

use chrono::{DateTime, Utc};

use crate::domain::category::Category;
use crate::domain::{DomainError, DomainResult};
use crate::shared::time::parse_stored_utc;

/// Inclusive time interval `[starts_at, ends_at]`, always with `ends_at > starts_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElectionWindow {
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
}

impl ElectionWindow {
    pub fn new(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> DomainResult<Self> {
        if ends_at <= starts_at {
            return Err(DomainError::Validation(
                "End time must be after start time".into(),
            ));
        }
        Ok(Self { starts_at, ends_at })
    }

    pub fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    /// Both ends inclusive
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.starts_at <= instant && instant <= self.ends_at
    }

    /// Whether the two inclusive intervals share at least one instant
    pub fn overlaps(&self, other: &ElectionWindow) -> bool {
        self.starts_at <= other.ends_at && other.starts_at <= self.ends_at
    }
}

#[derive(Debug, Clone)]
pub struct Election {
    pub id: i32,
    pub category: Category,
    pub window: ElectionWindow,
    pub created_at: DateTime<Utc>,
}

impl Election {
    /// Rebuild an election from its stored form (RFC 3339 strings).
    ///
    /// Unparsable or inverted bounds are an internal-consistency violation
    /// and surface as `DomainError::Storage`.
    pub fn from_stored(
        id: i32,
        category: Category,
        start_time: &str,
        end_time: &str,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let parse = |field: &str, raw: &str| {
            parse_stored_utc(raw).ok_or_else(|| {
                DomainError::Storage(format!(
                    "election {} has unparsable {} '{}'",
                    id, field, raw
                ))
            })
        };
        let starts_at = parse("start_time", start_time)?;
        let ends_at = parse("end_time", end_time)?;
        let window = ElectionWindow::new(starts_at, ends_at).map_err(|_| {
            DomainError::Storage(format!("election {} has end_time <= start_time", id))
        })?;

        Ok(Self {
            id,
            category,
            window,
            created_at,
        })
    }

    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.window.contains(now)
    }
}

#[derive(Debug, Clone)]
pub struct NewElection {
    pub category_id: i32,
    pub window: ElectionWindow,
}
