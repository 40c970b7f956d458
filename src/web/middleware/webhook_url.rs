//! Reconstruction of the URL Twilio called, which is part of what it signs.
//!
//! Priority: configured `PUBLIC_URL` + request path/query -> `X-Forwarded-Proto`
//! and `X-Forwarded-Host` (set by the edge proxy) -> `Host` header and the
//! request URI.

use http::request::Parts;
use url::Url;

/// The externally visible URL of this request, or `None` when no host can be
/// determined.
pub fn signed_url(parts: &Parts, public_url: Option<&Url>) -> Option<String> {
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    if let Some(base) = public_url {
        return Some(format!(
            "{}{path_and_query}",
            base.as_str().trim_end_matches('/')
        ));
    }

    let proto = first_value(&parts.headers, "x-forwarded-proto")
        .or_else(|| parts.uri.scheme_str())
        .unwrap_or("http");
    let host = first_value(&parts.headers, "x-forwarded-host")
        .or_else(|| header_str(&parts.headers, "host"))
        .or_else(|| parts.uri.authority().map(|a| a.as_str()))?;

    Some(format!("{proto}://{host}{path_and_query}"))
}

/// First entry of a possibly comma-separated header, as proxies chain them.
fn first_value<'a>(headers: &'a http::HeaderMap, name: &str) -> Option<&'a str> {
    header_str(headers, name)
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn header_str<'a>(headers: &'a http::HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
