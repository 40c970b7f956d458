//! Isolates one course's section table inside the WebSoc `<pre>` text.
//!
//! The text results list every course of a department one after another:
//!
//! ```text
//!   CompSci  122A  ALGORITHMS IN BIOINFO
//!  CCode Typ Sec Unt Instructor      Time ...  Max Enr WL Req Nor Rstr Status
//!  34250 LEC A   4   SMITH, J.       TuTh ...   30  25  0  40   0  A&N  OPEN
//!
//!   CompSci  122B  ...
//! ```
//!
//! A course block starts at `"{dept}  {number}"` (two spaces), its table starts
//! at the next `CCode` header, and it ends where the department name appears
//! again.

const TABLE_HEADER: &str = "CCode";

/// Return the lines of the section table for `course_number`, or `None` when
/// the course (or its table header) does not appear in `page`.
///
/// The first returned line is the `CCode` header. `", "` is rewritten to `"-"`
/// before splitting so that instructor lists like `SMITH, J.` stay a single
/// token.
pub fn extract_block(page: &str, display_name: &str, course_number: &str) -> Option<Vec<String>> {
    if display_name.is_empty() {
        return None;
    }

    let marker = format!("{display_name}  {course_number}");
    let begin = page.find(&marker)?;
    let course = &page[begin..];

    let header = course.find(TABLE_HEADER)?;
    let table = &course[header..];

    // The department name is searched for starting `len(dept)` bytes into the
    // table so the boundary search never matches at the header itself.
    let skip = ceil_char_boundary(table, display_name.len());
    let end = table[skip..]
        .find(display_name)
        .map(|pos| skip + pos)
        .unwrap_or(table.len());

    let block = table[..end].replace(", ", "-");
    Some(
        block
            .split('\n')
            .map(|line| line.trim_end_matches('\r').to_owned())
            .collect(),
    )
}

fn ceil_char_boundary(s: &str, mut index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "\
  CompSci  122A  ALGORITHMS IN BIOINFO
 CCode Typ Sec Unt Instructor  Time             Place  Final  Max Enr WL Req Nor Rstr Status
 34250 LEC A   4   SMITH, J.   TuTh 11:00-12:20 SSL 270 TBA   30  25  0  40   0  A&N  OPEN
 34251 DIS 1   0   STAFF       M   1:00- 1:50   ICS 180       30  25  0  40   0  A&N  OPEN

  CompSci  122B  DEEP LEARNING
 CCode Typ Sec Unt Instructor  Time             Place  Final  Max Enr WL Req Nor Rstr Status
 34260 LEC A   4   DOE, A.     MWF 9:00- 9:50   DBH 1100 TBA  100 100  5 120   0  A    FULL
";

    #[test]
    fn test_block_starts_at_header() {
        let lines = extract_block(PAGE, "CompSci", "122A").unwrap();
        assert!(lines[0].starts_with("CCode Typ"));
        assert!(lines[1].trim_start().starts_with("34250 LEC"));
    }

    #[test]
    fn test_block_stops_before_next_course() {
        let lines = extract_block(PAGE, "CompSci", "122A").unwrap();
        assert!(lines.iter().all(|l| !l.contains("34260")));
        assert!(lines.iter().any(|l| l.contains("34251")));
    }

    #[test]
    fn test_comma_space_is_collapsed() {
        let lines = extract_block(PAGE, "CompSci", "122A").unwrap();
        assert!(lines[1].contains("SMITH-J."));
    }

    #[test]
    fn test_last_course_runs_to_end_of_page() {
        let lines = extract_block(PAGE, "CompSci", "122B").unwrap();
        assert!(lines.iter().any(|l| l.contains("34260")));
        assert!(lines[0].starts_with("CCode"));
    }

    #[test]
    fn test_missing_course_is_none() {
        assert!(extract_block(PAGE, "CompSci", "999").is_none());
        assert!(extract_block(PAGE, "Math", "2A").is_none());
    }

    #[test]
    fn test_single_space_does_not_match() {
        let page = "CompSci 122A\nCCode\n";
        assert!(extract_block(page, "CompSci", "122A").is_none());
    }

    #[test]
    fn test_missing_header_is_none() {
        let page = "  CompSci  122A  ALGORITHMS\n  (no sections offered)\n";
        assert!(extract_block(page, "CompSci", "122A").is_none());
    }

    #[test]
    fn test_number_prefix_matches_first_occurrence() {
        // "122" is a prefix of "122A"; the first occurrence wins, matching the
        // literal substring search the catalog text relies on.
        let lines = extract_block(PAGE, "CompSci", "122").unwrap();
        assert!(lines.iter().any(|l| l.contains("34250")));
    }
}
