//! Parsing of the inbound message body into a course query.

use crate::departments::{self, DepartmentEntry};

/// A department and course number as typed by the student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseQuery {
    /// Uppercased, whitespace-collapsed department code (`I&C SCI`).
    pub department_code: String,
    /// Uppercased course number (`122A`).
    pub course_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("message body is empty")]
    Empty,
    #[error("message has no course number")]
    MissingCourseNumber,
    #[error("unknown department {0:?}")]
    UnknownDepartment(String),
}

impl QueryError {
    /// Text sent back to the student.
    pub fn reply(&self) -> String {
        match self {
            Self::Empty | Self::MissingCourseNumber => {
                "Text a department and course number, like \"COMPSCI 122A\".".to_owned()
            }
            Self::UnknownDepartment(code) => format!(
                "Sorry, I don't recognize the department \"{code}\". Try something like \"COMPSCI 122A\"."
            ),
        }
    }
}

impl CourseQuery {
    /// The last whitespace-delimited token is the course number; everything
    /// before it is the department.
    pub fn parse(body: &str) -> Result<Self, QueryError> {
        let tokens: Vec<&str> = body.split_whitespace().collect();
        let Some((course_number, department)) = tokens.split_last() else {
            return Err(QueryError::Empty);
        };
        if department.is_empty() {
            return Err(QueryError::MissingCourseNumber);
        }

        Ok(Self {
            department_code: departments::normalize_code(&department.join(" ")),
            course_number: course_number.to_uppercase(),
        })
    }

    pub fn department(&self) -> Result<&'static DepartmentEntry, QueryError> {
        departments::lookup(&self.department_code)
            .ok_or_else(|| QueryError::UnknownDepartment(self.department_code.clone()))
    }
}
