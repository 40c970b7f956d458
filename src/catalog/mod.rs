//! Page fetcher for the WebSoc schedule of classes.
//!
//! Loads the search page, selects a department by its dropdown text, submits
//! "Display Text Results", and returns the `<pre>` block of the response.

pub mod errors;
pub mod form;

use async_trait::async_trait;
use html_scraper::Html;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

use crate::utils::fmt_duration;

pub use errors::CatalogError;
pub use form::SearchForm;

/// Anything that can produce the text results for one department.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Return the `<pre>` text listing every course of the department whose
    /// dropdown option reads `ui_selector`.
    async fn department_text(&self, ui_selector: &str) -> Result<String, CatalogError>;
}

/// Live client for the WebSoc search form.
pub struct WebSocClient {
    http: reqwest::Client,
    search_url: Url,
}

impl WebSocClient {
    pub fn new(search_url: Url, request_timeout: Duration) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(request_timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Self { http, search_url })
    }

    async fn get_text(&self, url: &Url) -> Result<String, CatalogError> {
        let resp = self.http.get(url.clone()).send().await?;
        Self::body_text(resp).await
    }

    async fn body_text(resp: reqwest::Response) -> Result<String, CatalogError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: resp.url().to_string(),
            });
        }
        Ok(resp.text().await?)
    }

    /// Parse the landing page and build the submission for `ui_selector`.
    /// Kept synchronous: `Html` is not `Send` and must not live across an await.
    fn prepare_search(
        &self,
        page: &str,
        ui_selector: &str,
    ) -> Result<(Url, bool, Vec<(String, String)>), CatalogError> {
        let html = Html::parse_document(page);
        let mut form = SearchForm::parse(&html)?;
        debug!(
            options = form.departments().len(),
            "Parsed WebSoc search form"
        );
        form.select_department(ui_selector)?;
        Ok((
            form.action_url(&self.search_url)?,
            form.is_post(),
            form.submission()?,
        ))
    }
}

#[async_trait]
impl CatalogSource for WebSocClient {
    async fn department_text(&self, ui_selector: &str) -> Result<String, CatalogError> {
        let start = Instant::now();

        let landing = self.get_text(&self.search_url).await?;
        let (action, post, params) = self.prepare_search(&landing, ui_selector)?;

        let request = if post {
            self.http.post(action).form(&params)
        } else {
            self.http.get(action).query(&params)
        };
        let results = Self::body_text(request.send().await?).await?;
        let text = form::results_text(&Html::parse_document(&results))?;

        info!(
            department = ui_selector,
            bytes = text.len(),
            duration = fmt_duration(start.elapsed()),
            "Fetched WebSoc text results"
        );
        Ok(text)
    }
}

/// A results page saved to disk, for offline checks.
///
/// The file may be the full HTML response or just the text block; HTML is
/// detected by the presence of a `<pre` tag.
pub struct SavedPage {
    path: PathBuf,
}

impl SavedPage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for SavedPage {
    async fn department_text(&self, _ui_selector: &str) -> Result<String, CatalogError> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        if contents.to_ascii_lowercase().contains("<pre") {
            form::results_text(&Html::parse_document(&contents))
        } else {
            Ok(contents)
        }
    }
}
