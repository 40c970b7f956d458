//! Search form round-tripping for the WebSoc landing page.
//!
//! Picking a department and pressing "Display Text Results" is replayed as a
//! form submission: every field keeps the default the page rendered, `Dept` is
//! set to the option whose visible text matches, and the pressed submit control
//! contributes its own name/value pair.

use html_scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

use crate::catalog::errors::CatalogError;

pub const DEPARTMENT_FIELD: &str = "Dept";
pub const TEXT_RESULTS_SUBMIT: &str = "Display Text Results";

static FORM_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("form").expect("valid selector"));
static DEPT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"select[name="Dept"]"#).expect("valid selector"));
static CONTROL_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("input, select, textarea").expect("valid selector"));
static OPTION_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("option").expect("valid selector"));
static PRE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("pre").expect("valid selector"));

/// One `<option>` of the department dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeptOption {
    pub value: String,
    /// Visible text with whitespace runs collapsed.
    pub text: String,
}

/// The search form as rendered, reduced to what a submission needs.
#[derive(Debug, Clone, Default)]
pub struct SearchForm {
    action: Option<String>,
    post: bool,
    fields: Vec<(String, String)>,
    departments: Vec<DeptOption>,
    submit: Option<(String, String)>,
}

impl SearchForm {
    /// Parse the first form that contains the `Dept` select.
    pub fn parse(html: &Html) -> Result<Self, CatalogError> {
        let form = html
            .select(&FORM_SEL)
            .find(|form| form.select(&DEPT_SEL).next().is_some())
            .ok_or(CatalogError::MissingDepartmentSelect)?;

        let mut parsed = SearchForm {
            action: form.attr("action").map(str::to_owned),
            post: form
                .attr("method")
                .is_some_and(|m| m.eq_ignore_ascii_case("post")),
            ..Default::default()
        };

        for control in form.select(&CONTROL_SEL) {
            let Some(name) = control.attr("name").filter(|n| !n.is_empty()) else {
                continue;
            };
            match control.value().name() {
                "select" => {
                    let options: Vec<DeptOption> =
                        control.select(&OPTION_SEL).map(read_option).collect();
                    let selected = control
                        .select(&OPTION_SEL)
                        .position(|o| o.attr("selected").is_some())
                        .unwrap_or(0);
                    if let Some(option) = options.get(selected) {
                        parsed.fields.push((name.to_owned(), option.value.clone()));
                    }
                    if name == DEPARTMENT_FIELD {
                        parsed.departments = options;
                    }
                }
                "textarea" => {
                    parsed
                        .fields
                        .push((name.to_owned(), control.text().collect::<String>()));
                }
                _ => parsed.push_input(control, name),
            }
        }

        Ok(parsed)
    }

    fn push_input(&mut self, input: ElementRef<'_>, name: &str) {
        let input_type = input.attr("type").unwrap_or("text").to_ascii_lowercase();
        let value = input.attr("value").unwrap_or_default();

        match input_type.as_str() {
            // Only the pressed button is submitted.
            "submit" | "image" | "button" | "reset" => {
                if value == TEXT_RESULTS_SUBMIT {
                    self.submit = Some((name.to_owned(), value.to_owned()));
                }
            }
            "radio" | "checkbox" if input.attr("checked").is_none() => {}
            "checkbox" if input.attr("value").is_none() => {
                self.fields.push((name.to_owned(), "on".to_owned()));
            }
            _ => self.fields.push((name.to_owned(), value.to_owned())),
        }
    }

    pub fn departments(&self) -> &[DeptOption] {
        &self.departments
    }

    /// Point `Dept` at the option whose visible text is `visible_text`.
    pub fn select_department(&mut self, visible_text: &str) -> Result<(), CatalogError> {
        let wanted = collapse_whitespace(visible_text);
        let value = self
            .departments
            .iter()
            .find(|o| o.text == wanted)
            .map(|o| o.value.clone())
            .ok_or_else(|| CatalogError::UnknownOption(visible_text.to_owned()))?;

        match self.fields.iter_mut().find(|(n, _)| n == DEPARTMENT_FIELD) {
            Some(field) => field.1 = value,
            None => self.fields.push((DEPARTMENT_FIELD.to_owned(), value)),
        }
        Ok(())
    }

    /// Current value of a field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_post(&self) -> bool {
        self.post
    }

    /// Resolve the form action against the page it was loaded from.
    pub fn action_url(&self, page_url: &Url) -> Result<Url, CatalogError> {
        match self.action.as_deref().filter(|a| !a.trim().is_empty()) {
            Some(action) => page_url
                .join(action.trim())
                .map_err(|source| CatalogError::InvalidAction {
                    action: action.to_owned(),
                    source,
                }),
            None => Ok(page_url.clone()),
        }
    }

    /// Field pairs for the "Display Text Results" submission.
    pub fn submission(&self) -> Result<Vec<(String, String)>, CatalogError> {
        let submit = self
            .submit
            .clone()
            .ok_or(CatalogError::MissingSubmit(TEXT_RESULTS_SUBMIT))?;
        let mut params = self.fields.clone();
        params.push(submit);
        Ok(params)
    }
}

fn read_option(option: ElementRef<'_>) -> DeptOption {
    let text = collapse_whitespace(&option.text().collect::<String>());
    let value = option
        .attr("value")
        .map(str::to_owned)
        .unwrap_or_else(|| text.clone());
    DeptOption { value, text }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text content of the first `<pre>` block of a results page.
pub fn results_text(html: &Html) -> Result<String, CatalogError> {
    html.select(&PRE_SEL)
        .next()
        .map(|pre| pre.text().collect::<String>())
        .ok_or(CatalogError::MissingResults)
}
