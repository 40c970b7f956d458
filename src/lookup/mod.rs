//! Seat lookups: message body in, reply text out.
//!
//! A lookup walks `query parsed -> page fetched -> block extracted -> seats
//! counted`. Query problems and courses missing from the catalog end in a
//! reply to the student; everything else is a [`LookupError`].

pub mod pool;
pub mod query;

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

use crate::catalog::{CatalogError, CatalogSource};
use crate::departments::DepartmentEntry;
use crate::soc::{self, RowError, SeatReport};
use crate::utils::log_if_slow;

pub use pool::LookupPool;
pub use query::{CourseQuery, QueryError};

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("failed to load catalog page")]
    Catalog(#[from] CatalogError),
    #[error("failed to parse section table")]
    Row(#[from] RowError),
    #[error("lookup timed out after {0:?}")]
    TimedOut(Duration),
    #[error("lookup cancelled")]
    Cancelled,
    #[error("lookup worker failed: {0}")]
    Worker(String),
}

/// Result of a lookup that reached the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Seats(SeatReport),
    /// The course does not appear in this term's listing.
    NotOffered {
        department: String,
        course_number: String,
    },
}

impl LookupOutcome {
    pub fn reply(&self) -> String {
        match self {
            Self::Seats(report) => report.to_string(),
            Self::NotOffered {
                department,
                course_number,
            } => format!(
                "I'm sorry, {department} {course_number} is not available this quarter. Try another course number."
            ),
        }
    }
}

/// Fetch the department listing and count the course's lecture seats.
#[instrument(skip(catalog, department), fields(department = department.display_name))]
pub async fn lookup_seats(
    catalog: &dyn CatalogSource,
    department: &DepartmentEntry,
    course_number: &str,
) -> Result<LookupOutcome, LookupError> {
    let page = catalog.department_text(department.ui_selector).await?;

    let Some(lines) = soc::extract_block(&page, department.display_name, course_number) else {
        info!("Course not found in catalog listing");
        return Ok(LookupOutcome::NotOffered {
            department: department.display_name.to_owned(),
            course_number: course_number.to_owned(),
        });
    };
    debug!(lines = lines.len(), "Extracted course block");

    let report = SeatReport::from_lines(department.display_name, course_number, &lines)?;
    info!(seats = report.seats_available, "Counted seats");
    Ok(LookupOutcome::Seats(report))
}

/// Answers message bodies using a catalog source and a bounded worker pool.
#[derive(Clone)]
pub struct SeatLookup {
    catalog: Arc<dyn CatalogSource>,
    pool: LookupPool,
}

impl SeatLookup {
    pub fn new(catalog: Arc<dyn CatalogSource>, pool: LookupPool) -> Self {
        Self { catalog, pool }
    }

    pub fn pool(&self) -> &LookupPool {
        &self.pool
    }

    /// Produce the reply for an inbound message body.
    pub async fn answer(&self, body: &str) -> Result<String, LookupError> {
        let query = match CourseQuery::parse(body) {
            Ok(query) => query,
            Err(e) => {
                info!(body, error = %e, "Unusable query");
                return Ok(e.reply());
            }
        };
        let department = match query.department() {
            Ok(department) => department,
            Err(e) => {
                info!(code = %query.department_code, "Unknown department");
                return Ok(e.reply());
            }
        };

        let outcome = self.check(department, query.course_number).await?;
        Ok(outcome.reply())
    }

    /// Run [`lookup_seats`] on the pool.
    pub async fn check(
        &self,
        department: &'static DepartmentEntry,
        course_number: String,
    ) -> Result<LookupOutcome, LookupError> {
        let catalog = self.catalog.clone();
        let start = Instant::now();
        let outcome = self
            .pool
            .run(async move { lookup_seats(catalog.as_ref(), department, &course_number).await })
            .await;
        log_if_slow(start, Duration::from_secs(10), "catalog lookup");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedPage(&'static str);

    #[async_trait]
    impl CatalogSource for FixedPage {
        async fn department_text(&self, _ui_selector: &str) -> Result<String, CatalogError> {
            Ok(self.0.to_owned())
        }
    }

    struct BrokenCatalog;

    #[async_trait]
    impl CatalogSource for BrokenCatalog {
        async fn department_text(&self, ui_selector: &str) -> Result<String, CatalogError> {
            Err(CatalogError::UnknownOption(ui_selector.to_owned()))
        }
    }

    const PAGE: &str = "CompSci  122A\nCCode Typ Sec Unt Instr Time Place Max Enr WL Req Nor Rstr Status\n10700 LEC A 4 STAFF TBA TBA 30 25 0 0 0 A OPEN\nCompSci  122B\nCCode\n10800 LEC A 4 STAFF TBA TBA 50 50 0 0 0 A FULL\n";

    fn lookup(catalog: impl CatalogSource + 'static) -> SeatLookup {
        SeatLookup::new(Arc::new(catalog), LookupPool::new(2, Duration::from_secs(5)))
    }

    #[tokio::test]
    async fn test_counts_seats_for_course() {
        let reply = lookup(FixedPage(PAGE)).answer("compsci 122a").await.unwrap();
        assert_eq!(reply, "Number of seats available in CompSci 122A: 5");
    }

    #[tokio::test]
    async fn test_full_course_reports_zero() {
        let reply = lookup(FixedPage(PAGE)).answer("CS 122B").await.unwrap();
        assert_eq!(reply, "Number of seats available in CompSci 122B: 0");
    }

    #[tokio::test]
    async fn test_missing_course_reply() {
        let reply = lookup(FixedPage(PAGE)).answer("COMPSCI 999").await.unwrap();
        assert_eq!(
            reply,
            "I'm sorry, CompSci 999 is not available this quarter. Try another course number."
        );
    }

    #[tokio::test]
    async fn test_unknown_department_never_fetches() {
        let reply = lookup(BrokenCatalog).answer("BASKETRY 1").await.unwrap();
        assert!(reply.starts_with("Sorry, I don't recognize the department"));
    }

    #[tokio::test]
    async fn test_catalog_failure_is_an_error() {
        let result = lookup(BrokenCatalog).answer("MATH 2A").await;
        assert!(matches!(result, Err(LookupError::Catalog(_))));
    }

    #[tokio::test]
    async fn test_malformed_row_aborts() {
        let page = "Math  2A\nCCode\n44000 LEC A 4 30\n";
        let result = lookup(FixedPage(page)).answer("MATH 2A").await;
        assert!(matches!(result, Err(LookupError::Row(_))));
    }
}
