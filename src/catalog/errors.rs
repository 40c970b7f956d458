//! Error types for the catalog page fetcher.

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog request failed")]
    Request(#[from] reqwest::Error),
    #[error("catalog returned HTTP {status} for {url}")]
    Status { status: u16, url: String },
    #[error("search form has no Dept select")]
    MissingDepartmentSelect,
    #[error("no Dept option with visible text {0:?}")]
    UnknownOption(String),
    #[error("search form has no {0:?} submit control")]
    MissingSubmit(&'static str),
    #[error("invalid form action {action:?}")]
    InvalidAction {
        action: String,
        #[source]
        source: url::ParseError,
    },
    #[error("results page has no <pre> block")]
    MissingResults,
    #[error("failed to read saved page")]
    Io(#[from] std::io::Error),
}
