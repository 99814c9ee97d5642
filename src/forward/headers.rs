//! Header surgery for forwarded requests and responses.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers in both directions
//! - Rewrite the outbound Host header to the target authority ("change origin")
//! - Rewrite origin-referencing response headers back through the gateway
//!   ("auto-rewrite"): Location values become `/?url=<target>` and
//!   Set-Cookie loses its Domain attribute
//!
//! # Design Decisions
//! - Rewriting is best-effort; a Location that resolves to nothing usable
//!   is passed through untouched rather than failing the request
//! - Host matching against the hop-by-hop list is by HeaderName, so casing
//!   never matters

use axum::http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH, HOST, LOCATION, SET_COOKIE};
use url::Url;

use crate::routing::TARGET_PARAM;

/// Headers meaningful only for a single transport connection. Never
/// forwarded unchanged in either direction.
static HOP_BY_HOP: [HeaderName; 10] = [
    HOST,
    HeaderName::from_static("connection"),
    HeaderName::from_static("proxy-connection"),
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-authenticate"),
    HeaderName::from_static("proxy-authorization"),
    HeaderName::from_static("te"),
    HeaderName::from_static("trailer"),
    HeaderName::from_static("transfer-encoding"),
    HeaderName::from_static("upgrade"),
];

/// Returns true if the header must not cross the gateway.
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(name)
}

/// Build the outbound header set: inbound headers minus hop-by-hop, with
/// Host rewritten to the target's own authority.
pub fn outbound_headers(inbound: &HeaderMap, target: &Url) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound.iter() {
        // Content-Length is recomputed from the replayed body, which may
        // differ from the inbound one after a redirect method downgrade
        if is_hop_by_hop(name) || name == CONTENT_LENGTH {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    if let Some(host) = host_header_value(target) {
        headers.insert(HOST, host);
    }
    headers
}

/// Host header value for a target URL, including a non-default port.
fn host_header_value(target: &Url) -> Option<HeaderValue> {
    let host = target.host_str()?;
    let value = match target.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    HeaderValue::from_str(&value).ok()
}

/// Rewrite the final upstream response headers in place.
///
/// Strips hop-by-hop headers, points Location values back through the
/// gateway's `?url=` convention and drops cookie Domain attributes so
/// cookies bind to the gateway host instead of the upstream's.
pub fn rewrite_response_headers(headers: &mut HeaderMap, target: &Url) {
    let hop: Vec<HeaderName> = headers
        .keys()
        .filter(|name| is_hop_by_hop(name))
        .cloned()
        .collect();
    for name in hop {
        headers.remove(name);
    }

    if let Some(location) = headers.get(LOCATION).and_then(|v| v.to_str().ok()) {
        if let Some(rewritten) = rewrite_location(location, target) {
            if let Ok(value) = HeaderValue::from_str(&rewritten) {
                headers.insert(LOCATION, value);
            }
        }
    }

    let cookies: Vec<HeaderValue> = headers.get_all(SET_COOKIE).iter().cloned().collect();
    if !cookies.is_empty() {
        headers.remove(SET_COOKIE);
        for cookie in cookies {
            let rewritten = cookie
                .to_str()
                .ok()
                .map(strip_cookie_domain)
                .and_then(|c| HeaderValue::from_str(&c).ok())
                .unwrap_or(cookie);
            headers.append(SET_COOKIE, rewritten);
        }
    }
}

/// Rewrite a Location header value to `/?url=<absolute target>`.
///
/// Relative locations are resolved against the response's own target first,
/// so navigation keeps flowing through the gateway. Returns None when the
/// value cannot be resolved; the caller leaves it untouched.
pub fn rewrite_location(location: &str, target: &Url) -> Option<String> {
    let absolute = match Url::parse(location) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => target.join(location).ok()?,
        Err(_) => return None,
    };
    let encoded: String = url::form_urlencoded::byte_serialize(absolute.as_str().as_bytes()).collect();
    Some(format!("/?{}={}", TARGET_PARAM, encoded))
}

/// Drop any `Domain=` attribute from a Set-Cookie value.
fn strip_cookie_domain(cookie: &str) -> String {
    cookie
        .split(';')
        .map(str::trim)
        .filter(|attr| !attr.to_ascii_lowercase().starts_with("domain="))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> Url {
        Url::parse("https://upstream.example/app/index.html").unwrap()
    }

    #[test]
    fn test_is_hop_by_hop() {
        assert!(is_hop_by_hop(&HOST));
        assert!(is_hop_by_hop(&HeaderName::from_static("transfer-encoding")));
        assert!(!is_hop_by_hop(&HeaderName::from_static("content-type")));
    }

    #[test]
    fn test_outbound_host_rewritten() {
        let mut inbound = HeaderMap::new();
        inbound.insert(HOST, HeaderValue::from_static("localhost:8080"));
        inbound.insert("accept", HeaderValue::from_static("text/html"));
        inbound.insert("connection", HeaderValue::from_static("keep-alive"));
        inbound.insert(CONTENT_LENGTH, HeaderValue::from_static("11"));

        let out = outbound_headers(&inbound, &target());
        assert_eq!(out.get(HOST).unwrap(), "upstream.example");
        assert_eq!(out.get("accept").unwrap(), "text/html");
        assert!(out.get("connection").is_none());
        assert!(out.get(CONTENT_LENGTH).is_none());
    }

    #[test]
    fn test_outbound_host_keeps_port() {
        let target = Url::parse("http://127.0.0.1:3000/").unwrap();
        let out = outbound_headers(&HeaderMap::new(), &target);
        assert_eq!(out.get(HOST).unwrap(), "127.0.0.1:3000");
    }

    #[test]
    fn test_rewrite_absolute_location() {
        let rewritten = rewrite_location("https://other.example/next", &target()).unwrap();
        assert_eq!(rewritten, "/?url=https%3A%2F%2Fother.example%2Fnext");
    }

    #[test]
    fn test_rewrite_relative_location() {
        let rewritten = rewrite_location("/login", &target()).unwrap();
        assert_eq!(rewritten, "/?url=https%3A%2F%2Fupstream.example%2Flogin");
    }

    #[test]
    fn test_strip_cookie_domain() {
        let cookie = "sid=abc123; Path=/; Domain=.upstream.example; HttpOnly";
        assert_eq!(strip_cookie_domain(cookie), "sid=abc123; Path=/; HttpOnly");
    }

    #[test]
    fn test_response_rewrite_strips_hop_by_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("transfer-encoding", HeaderValue::from_static("chunked"));
        headers.insert("content-type", HeaderValue::from_static("text/html"));
        headers.insert(LOCATION, HeaderValue::from_static("https://upstream.example/next"));

        rewrite_response_headers(&mut headers, &target());
        assert!(headers.get("transfer-encoding").is_none());
        assert_eq!(headers.get("content-type").unwrap(), "text/html");
        assert_eq!(
            headers.get(LOCATION).unwrap(),
            "/?url=https%3A%2F%2Fupstream.example%2Fnext"
        );
    }
}
