//! Section and report types derived from the WebSoc text results.

use std::fmt;

/// Section type column (`LEC`, `DIS`, `LAB`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    Lec,
    Dis,
    Lab,
    Other(String),
}

impl SectionKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Lec => "LEC",
            Self::Dis => "DIS",
            Self::Lab => "LAB",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for SectionKind {
    /// Exact, case-sensitive match: `Lec` is not a lecture.
    fn from(s: &str) -> Self {
        match s {
            "LEC" => Self::Lec,
            "DIS" => Self::Dis,
            "LAB" => Self::Lab,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Enrollment status column (last token of a section row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionStatus {
    Open,
    Full,
    Waitl,
    NewOnly,
    Other(String),
}

impl SectionStatus {
    /// Only `FULL` sections are excluded from the seat total; every other
    /// status (including waitlisted) contributes.
    pub fn counts_toward_total(&self) -> bool {
        !matches!(self, Self::Full)
    }
}

impl From<&str> for SectionStatus {
    fn from(s: &str) -> Self {
        match s {
            "OPEN" => Self::Open,
            "FULL" => Self::Full,
            "Waitl" | "WAITL" => Self::Waitl,
            "NewOnly" | "NEWONLY" => Self::NewOnly,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// A single parsed section row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRow {
    /// The five-digit course code (first column).
    pub code: String,
    pub kind: SectionKind,
    pub capacity: i64,
    pub enrolled: i64,
    pub status: SectionStatus,
}

impl SectionRow {
    /// Remaining seats this row adds to the total. Not clamped: an
    /// over-enrolled section yields a negative contribution.
    pub fn contribution(&self) -> i64 {
        if self.status.counts_toward_total() {
            self.capacity - self.enrolled
        } else {
            0
        }
    }
}

/// Final computed availability for one course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatReport {
    /// Department display name as printed in the catalog (e.g. `CompSci`).
    pub department: String,
    pub course_number: String,
    pub seats_available: i64,
}

impl fmt::Display for SeatReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Number of seats available in {} {}: {}",
            self.department, self.course_number, self.seats_available
        )
    }
}
