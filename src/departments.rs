//! Static department directory.
//!
//! Maps what a student types (`CS`, `compsci`, `I&C SCI`) to the name WebSoc
//! prints in its text results and the visible text of the matching option in
//! the search form's `Dept` dropdown.

use std::collections::HashMap;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepartmentEntry {
    /// Name as printed at the start of each course in the text results.
    pub display_name: &'static str,
    /// Visible text of the `Dept` dropdown option.
    pub ui_selector: &'static str,
}

const fn dept(display_name: &'static str, ui_selector: &'static str) -> DepartmentEntry {
    DepartmentEntry {
        display_name,
        ui_selector,
    }
}

const COMPSCI: DepartmentEntry = dept("CompSci", "COMPSCI . . . . Computer Science");
const ICS: DepartmentEntry = dept("I&C Sci", "I&C SCI . . . . Information and Computer Science");
const IN4MATX: DepartmentEntry = dept("In4matx", "IN4MATX . . . . Informatics");
const STATS: DepartmentEntry = dept("Stats", "STATS . . . . . Statistics");
const MATH: DepartmentEntry = dept("Math", "MATH . . . . . Mathematics");
const PHYSICS: DepartmentEntry = dept("Physics", "PHYSICS . . . . Physics");
const CHEM: DepartmentEntry = dept("Chem", "CHEM . . . . . Chemistry");
const BIO_SCI: DepartmentEntry = dept("Bio Sci", "BIO SCI . . . . Biological Sciences");
const EECS: DepartmentEntry = dept("EECS", "EECS . . . . . Electrical Engineering & Computer Science");
const ENGR: DepartmentEntry = dept("Engr", "ENGR . . . . . Engineering");
const ENGRMAE: DepartmentEntry = dept("EngrMAE", "ENGRMAE . . . . Engineering, Mechanical and Aerospace");
const ENGRCEE: DepartmentEntry = dept("EngrCEE", "ENGRCEE . . . . Engineering, Civil and Environmental");
const CSE: DepartmentEntry = dept("CSE", "CSE . . . . . . Computer Science and Engineering");
const ECON: DepartmentEntry = dept("Econ", "ECON . . . . . Economics");
const PSYCH: DepartmentEntry = dept("Psych", "PSYCH . . . . . Psychology");
const POL_SCI: DepartmentEntry = dept("Pol Sci", "POL SCI . . . . Political Science");
const SOCIOL: DepartmentEntry = dept("Sociol", "SOCIOL . . . . Sociology");
const WRITING: DepartmentEntry = dept("Writing", "WRITING . . . . Writing");
const HISTORY: DepartmentEntry = dept("History", "HISTORY . . . . History");
const PHILOS: DepartmentEntry = dept("Philos", "PHILOS . . . . Philosophy");
const MGMT: DepartmentEntry = dept("Mgmt", "MGMT . . . . . Management");
const ART_HIS: DepartmentEntry = dept("Art His", "ART HIS . . . . Art History");

/// Uppercased code -> entry. Several codes alias the same department.
static DIRECTORY: LazyLock<HashMap<&'static str, DepartmentEntry>> = LazyLock::new(|| {
    HashMap::from([
        ("COMPSCI", COMPSCI),
        ("CS", COMPSCI),
        ("COMP SCI", COMPSCI),
        ("I&C SCI", ICS),
        ("ICS", ICS),
        ("IN4MATX", IN4MATX),
        ("INF", IN4MATX),
        ("STATS", STATS),
        ("STAT", STATS),
        ("MATH", MATH),
        ("PHYSICS", PHYSICS),
        ("PHYS", PHYSICS),
        ("CHEM", CHEM),
        ("BIO SCI", BIO_SCI),
        ("BIOSCI", BIO_SCI),
        ("BIO", BIO_SCI),
        ("EECS", EECS),
        ("ENGR", ENGR),
        ("ENGRMAE", ENGRMAE),
        ("MAE", ENGRMAE),
        ("ENGRCEE", ENGRCEE),
        ("CEE", ENGRCEE),
        ("CSE", CSE),
        ("ECON", ECON),
        ("PSYCH", PSYCH),
        ("POL SCI", POL_SCI),
        ("POLSCI", POL_SCI),
        ("SOCIOL", SOCIOL),
        ("WRITING", WRITING),
        ("HISTORY", HISTORY),
        ("PHILOS", PHILOS),
        ("MGMT", MGMT),
        ("ART HIS", ART_HIS),
    ])
});

/// Look up a department by the code a user typed. Case-insensitive; inner
/// whitespace runs are collapsed to a single space.
pub fn lookup(code: &str) -> Option<&'static DepartmentEntry> {
    let key = normalize_code(code);
    DIRECTORY.get(key.as_str())
}

/// Uppercase and collapse whitespace: `"  i&c   sci "` -> `"I&C SCI"`.
pub fn normalize_code(code: &str) -> String {
    code.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}
