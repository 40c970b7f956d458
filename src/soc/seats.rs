//! Seat counting over the section rows of a course block.
//!
//! Columns are addressed from the end of the row: capacity is the 7th token
//! from the last, enrolled the 6th, status the last. The columns in between
//! (instructor, time, place, final) vary in width and token count, so only the
//! tail of the row has a stable shape. A row too short for these offsets is an
//! error and aborts the whole count.

use crate::soc::types::{SeatReport, SectionKind, SectionRow, SectionStatus};

const CAPACITY_FROM_END: usize = 7;
const ENROLLED_FROM_END: usize = 6;

/// Enrolled values longer than this are staggered-enrollment fractions
/// (`"45/180"`).
const STAGGERED_MIN_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error("section row has too few columns: {line:?}")]
    MissingColumns { line: String },
    #[error("invalid {field} value {value:?} in section row: {line:?}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        line: String,
    },
}

/// Parse every lecture row of a block, in order.
///
/// Lines that are blank, whose first token is not purely numeric (headers,
/// footnotes, comments), or whose second token is not exactly `LEC` are
/// skipped.
pub fn lecture_rows<S: AsRef<str>>(lines: &[S]) -> Result<Vec<SectionRow>, RowError> {
    let mut rows = Vec::new();
    for line in lines {
        if let Some(row) = parse_lecture_row(line.as_ref())? {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Total remaining lecture seats across the block.
pub fn count_seats<S: AsRef<str>>(lines: &[S]) -> Result<i64, RowError> {
    Ok(lecture_rows(lines)?
        .iter()
        .map(SectionRow::contribution)
        .sum())
}

impl SeatReport {
    /// Count the seats in `lines` and package them for the reply.
    pub fn from_lines<S: AsRef<str>>(
        department: &str,
        course_number: &str,
        lines: &[S],
    ) -> Result<Self, RowError> {
        Ok(Self {
            department: department.to_owned(),
            course_number: course_number.to_owned(),
            seats_available: count_seats(lines)?,
        })
    }
}

fn parse_lecture_row(line: &str) -> Result<Option<SectionRow>, RowError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    let Some(first) = tokens.first() else {
        return Ok(None);
    };
    if !is_numeric(first) {
        return Ok(None);
    }

    let kind = match tokens.get(1) {
        Some(kind) => SectionKind::from(*kind),
        None => return Err(missing_columns(line)),
    };
    if kind != SectionKind::Lec {
        return Ok(None);
    }

    if tokens.len() < CAPACITY_FROM_END {
        return Err(missing_columns(line));
    }
    let capacity = tokens[tokens.len() - CAPACITY_FROM_END];
    let enrolled = normalize_enrolled(tokens[tokens.len() - ENROLLED_FROM_END]);
    let status = SectionStatus::from(tokens[tokens.len() - 1]);

    Ok(Some(SectionRow {
        code: (*first).to_owned(),
        kind,
        capacity: parse_count("capacity", capacity, line)?,
        enrolled: parse_count("enrolled", enrolled, line)?,
        status,
    }))
}

/// Staggered enrollment prints `current/total`; only `current` is enrolled.
fn normalize_enrolled(token: &str) -> &str {
    if token.chars().count() >= STAGGERED_MIN_LEN {
        token.split_once('/').map_or(token, |(current, _)| current)
    } else {
        token
    }
}

fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_numeric)
}

fn parse_count(field: &'static str, value: &str, line: &str) -> Result<i64, RowError> {
    value.parse().map_err(|_| RowError::InvalidNumber {
        field,
        value: value.to_owned(),
        line: line.to_owned(),
    })
}

fn missing_columns(line: &str) -> RowError {
    RowError::MissingColumns {
        line: line.to_owned(),
    }
}
