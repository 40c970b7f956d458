//! In-memory stand-ins for the catalog and Twilio.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::Request;
use seatline::catalog::{CatalogError, CatalogSource};
use seatline::lookup::{LookupPool, SeatLookup};
use seatline::sms::signature::compute_signature;
use seatline::sms::{MessageError, MessageSender};
use seatline::state::{AppState, WebhookAuth};
use seatline::web::create_router;
use seatline::web::middleware::rate_limit::SenderLimiter;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

pub const AUTH_TOKEN: &str = "test-auth-token";
pub const PUBLIC_URL: &str = "https://seatline.example";
pub const SENDER: &str = "+15555550100";

/// Two CompSci courses: 122A has 5 open lecture seats, 122B is full.
pub const COMPSCI_PAGE: &str = "\
CompSci  122A   INTRO TO DATA MGMT
 CCode Typ Sec Unt Instructor  Time             Place   Final        Max Enr WL Req Nor Rstr Status
 34100 LEC A   4   LI, C.      TuTh 11:00-12:20 SSL 270 Mon, Jun 9   30  25  0  0   0   A    OPEN
 34101 DIS 1   0   STAFF       M  9:00- 9:50    SH 134               30  25  0  0   0   A    OPEN

CompSci  122B   DATA MANAGEMENT
 CCode Typ Sec Unt Instructor  Time             Place   Final        Max Enr WL Req Nor Rstr Status
 34200 LEC A   4   STAFF       MWF 1:00- 1:50   ICS 174 Fri, Jun 13  60  60  5  0   0   A    FULL
";

/// Serves a fixed results page and counts how often it was asked.
#[derive(Default)]
pub struct FakeCatalog {
    page: &'static str,
    calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn new(page: &'static str) -> Self {
        Self {
            page,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn department_text(&self, _ui_selector: &str) -> Result<String, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.page.to_owned())
    }
}

/// Always fails as if the department dropdown had changed.
pub struct FailingCatalog;

#[async_trait]
impl CatalogSource for FailingCatalog {
    async fn department_text(&self, ui_selector: &str) -> Result<String, CatalogError> {
        Err(CatalogError::UnknownOption(ui_selector.to_owned()))
    }
}

/// Records every outbound message instead of sending it.
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingSender {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send(&self, to: &str, body: &str) -> Result<(), MessageError> {
        self.sent.lock().unwrap().push((to.to_owned(), body.to_owned()));
        if self.fail {
            return Err(MessageError::Rejected {
                status: 400,
                message: "The 'To' number is not a valid phone number.".to_owned(),
            });
        }
        Ok(())
    }
}

pub fn test_router(catalog: Arc<dyn CatalogSource>, sender: Arc<RecordingSender>) -> Router {
    let lookup = SeatLookup::new(catalog, LookupPool::new(2, Duration::from_secs(5)));
    let state = AppState::new(
        lookup,
        sender,
        WebhookAuth {
            auth_token: AUTH_TOKEN.to_owned(),
            public_url: Some(Url::parse(PUBLIC_URL).unwrap()),
        },
        SenderLimiter::default(),
    );
    create_router(state)
}

pub fn webhook_params(from: &str, body: &str) -> Vec<(String, String)> {
    vec![
        ("AccountSid".to_owned(), "AC00000000000000000000000000000000".to_owned()),
        ("Body".to_owned(), body.to_owned()),
        ("From".to_owned(), from.to_owned()),
        ("NumMedia".to_owned(), "0".to_owned()),
        ("To".to_owned(), "+18182908210".to_owned()),
    ]
}

pub fn encode_form(params: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
}

/// A webhook request signed the way Twilio signs it.
pub fn signed_request(params: &[(String, String)]) -> Request<Body> {
    let signature = compute_signature(AUTH_TOKEN, &format!("{PUBLIC_URL}/"), params);
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/x-www-form-urlencoded")
        .header("x-twilio-signature", signature)
        .body(Body::from(encode_form(params)))
        .unwrap()
}
