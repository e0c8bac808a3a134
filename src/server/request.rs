//! Inbound request parsing for the `may_minihttp` service adapter.

use std::collections::HashMap;
use std::io::{self, Read};

use http::Method;
use may_minihttp::Request;
use tracing::debug;

/// Parsed HTTP request data handed to the dispatcher.
#[derive(Debug)]
pub struct ParsedRequest {
    /// HTTP method.
    pub method: Method,
    /// Request path with the query string stripped.
    pub path: String,
    /// HTTP headers, keys lowercased.
    pub headers: HashMap<String, String>,
    /// Parsed query string parameters.
    pub query_params: HashMap<String, String>,
    /// Raw request body, if one was sent.
    pub body: Option<Vec<u8>>,
}

impl ParsedRequest {
    /// Build a bare request from method and path; handy for tests and for
    /// feeding the dispatcher from a non-`may_minihttp` host.
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.split('?').next().unwrap_or("/").to_string(),
            headers: HashMap::new(),
            query_params: parse_query_params(path),
            body: None,
        }
    }
}

/// Parse query string parameters from a URL path.
///
/// Everything after the `?` is split and percent-decoded.
#[must_use]
pub fn parse_query_params(path: &str) -> HashMap<String, String> {
    match path.find('?') {
        Some(pos) => url::form_urlencoded::parse(path[pos + 1..].as_bytes())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        None => HashMap::new(),
    }
}

/// Extract method, path, headers, query parameters, and body from a raw
/// `may_minihttp` request.
///
/// # Errors
///
/// Fails when the method token is invalid or the body cannot be read; the
/// service answers such requests with a 400 without entering the pipeline.
pub fn parse_request(req: Request) -> io::Result<ParsedRequest> {
    let method = Method::from_bytes(req.method().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let raw_path = req.path().to_string();
    let path = raw_path.split('?').next().unwrap_or("/").to_string();

    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let query_params = parse_query_params(&raw_path);

    let mut buf = Vec::new();
    req.body().read_to_end(&mut buf)?;
    let body = if buf.is_empty() { None } else { Some(buf) };

    debug!(
        method = %method,
        path = %path,
        header_count = headers.len(),
        query_count = query_params.len(),
        body_bytes = body.as_ref().map_or(0, Vec::len),
        "request parsed"
    );

    Ok(ParsedRequest {
        method,
        path,
        headers,
        query_params,
        body,
    })
}
