//! Parsing of WebSoc ("Schedule of Classes") text results.

pub mod block;
pub mod seats;
pub mod types;

pub use block::extract_block;
pub use seats::{RowError, count_seats, lecture_rows};
pub use types::{SeatReport, SectionKind, SectionRow, SectionStatus};
