//! Attendance ledger model and derived tallies.
//!
//! # Responsibility
//! - Define the two-value attendance status and its storage spelling.
//! - Define read models for per-person and per-date ledger views.
//! - Own the zero-safe percentage rule shared by every report.
//!
//! # Invariants
//! - Status is exactly `PRESENT` or `ABSENT`; nothing else is ever stored.
//! - A tally with zero records has percentage `0.0`, not an error.
//! - `present <= total` for every tally built from storage.

use crate::model::person::PersonId;
use crate::model::{require_text, ValidationError};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Sentinel shown for registered people without a record on a date.
pub const NOT_MARKED: &str = "NOT_MARKED";

/// Default cut-off used by low-attendance alerts.
pub const DEFAULT_LOW_ATTENDANCE_THRESHOLD: f64 = 75.0;

/// Attendance status stored per (person, date).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    /// Stable storage/wire spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "PRESENT",
            Self::Absent => "ABSENT",
        }
    }
}

impl Display for AttendanceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = InvalidStatusError;

    /// Parses the exact storage spelling. Case variants are rejected.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PRESENT" => Ok(Self::Present),
            "ABSENT" => Ok(Self::Absent),
            other => Err(InvalidStatusError(other.to_string())),
        }
    }
}

/// Status value outside the `PRESENT`/`ABSENT` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStatusError(pub String);

impl Display for InvalidStatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid attendance status `{}`; expected PRESENT|ABSENT",
            self.0
        )
    }
}

impl Error for InvalidStatusError {}

/// Status of one registered person on one date, including the unmarked case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DailyStatus {
    Marked(AttendanceStatus),
    NotMarked,
}

impl DailyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Marked(status) => status.as_str(),
            Self::NotMarked => NOT_MARKED,
        }
    }
}

/// One ledger row seen from a person's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub date: String,
    pub status: AttendanceStatus,
}

/// One registry row joined against the ledger for a single date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAttendanceRow {
    pub person_id: PersonId,
    pub name: String,
    pub status: DailyStatus,
}

/// Record counts for one person.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceTally {
    pub total: u32,
    pub present: u32,
}

impl AttendanceTally {
    pub fn absent(self) -> u32 {
        self.total.saturating_sub(self.present)
    }

    /// Percentage of present records; `0.0` when nothing is on file.
    pub fn percentage(self) -> f64 {
        percentage_of(self.present, self.total)
    }
}

/// `100 * part / whole`, defined as `0.0` for an empty whole.
pub fn percentage_of(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    f64::from(part) * 100.0 / f64::from(whole)
}

/// Renders a percentage the way report screens display it, e.g. `87.50%`.
pub fn format_percentage(value: f64) -> String {
    format!("{value:.2}%")
}

/// Date tokens are opaque; the only requirement is that they are not blank.
pub fn validate_date_token(date: &str) -> Result<(), ValidationError> {
    require_text("date", date)
}

#[cfg(test)]
mod tests {
    use super::{
        format_percentage, percentage_of, AttendanceStatus, AttendanceTally, DailyStatus,
        InvalidStatusError, NOT_MARKED,
    };

    #[test]
    fn status_parses_exact_storage_spelling_only() {
        assert_eq!("PRESENT".parse(), Ok(AttendanceStatus::Present));
        assert_eq!("ABSENT".parse(), Ok(AttendanceStatus::Absent));
        assert_eq!(
            "present".parse::<AttendanceStatus>(),
            Err(InvalidStatusError("present".to_string()))
        );
        assert!("LATE".parse::<AttendanceStatus>().is_err());
    }

    #[test]
    fn empty_tally_is_zero_percent() {
        let tally = AttendanceTally::default();
        assert_eq!(tally.percentage(), 0.0);
        assert_eq!(tally.absent(), 0);
    }

    #[test]
    fn tally_percentage_and_absent_count() {
        let tally = AttendanceTally {
            total: 8,
            present: 6,
        };
        assert_eq!(tally.percentage(), 75.0);
        assert_eq!(tally.absent(), 2);
        assert_eq!(percentage_of(1, 3), 100.0 / 3.0);
    }

    #[test]
    fn daily_status_uses_sentinel_for_unmarked() {
        assert_eq!(DailyStatus::NotMarked.as_str(), NOT_MARKED);
        assert_eq!(
            DailyStatus::Marked(AttendanceStatus::Absent).as_str(),
            "ABSENT"
        );
    }

    #[test]
    fn status_serializes_in_storage_spelling() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Present).unwrap(),
            "\"PRESENT\""
        );
        let parsed: AttendanceStatus = serde_json::from_str("\"ABSENT\"").unwrap();
        assert_eq!(parsed, AttendanceStatus::Absent);
    }

    #[test]
    fn percentage_formats_with_two_decimals() {
        assert_eq!(format_percentage(100.0), "100.00%");
        assert_eq!(format_percentage(200.0 / 3.0), "66.67%");
    }
}
