//! Request and response value types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{RequestContext, JSON_UTF_8};
use crate::error::{Result, WdpError};

/// Out-of-band request/response metadata. Never serialized on the wire.
pub type Attributes = BTreeMap<String, Value>;

/// HTTP methods used by the WebDriver dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Read-only command
    Get,
    /// Command with a JSON body
    Post,
    /// Teardown command
    Delete,
}

impl HttpMethod {
    /// Wire name of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = WdpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(WdpError::InvalidArgument(format!("Unsupported HTTP method: {s}"))),
        }
    }
}

impl TryFrom<&http::Method> for HttpMethod {
    type Error = WdpError;

    fn try_from(method: &http::Method) -> Result<Self> {
        method.as_str().parse()
    }
}

impl From<HttpMethod> for http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => http::Method::GET,
            HttpMethod::Post => http::Method::POST,
            HttpMethod::Delete => http::Method::DELETE,
        }
    }
}

/// Ordered header multimap.
///
/// Names keep the case they were added with; lookups ignore case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    /// Create an empty header map
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header, keeping any existing values for the same name
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Replace every value of `name` with a single value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.remove(&name);
        self.0.push((name, value.into()));
    }

    /// First value of `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Every value of `name`, in insertion order
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Drop every value of `name`
    pub fn remove(&mut self, name: &str) {
        self.0.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    }

    /// Whether `name` has at least one value
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All headers in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of header lines
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no header is present
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Headers(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// An HTTP request as seen by the codecs and the router
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Request method
    pub method: HttpMethod,
    /// Path only; no scheme, host or query
    pub uri: String,
    /// Request headers
    pub headers: Headers,
    /// Decoded query parameters, in order
    pub query: Vec<(String, String)>,
    /// Raw body
    pub content: Bytes,
    /// Out-of-band metadata
    pub attributes: Attributes,
    /// Route-prefix stack
    pub context: RequestContext,
}

impl HttpRequest {
    /// Create a request. A `?query` suffix on `uri` is split into [`HttpRequest::query`].
    pub fn new(method: HttpMethod, uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path.to_string(), parse_query(query)),
            None => (uri, Vec::new()),
        };

        Self {
            method,
            uri: path,
            headers: Headers::new(),
            query,
            content: Bytes::new(),
            attributes: Attributes::new(),
            context: RequestContext::default(),
        }
    }

    /// Add a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }

    /// Set the raw body
    pub fn with_content(mut self, content: impl Into<Bytes>) -> Self {
        self.content = content.into();
        self
    }

    /// Set a JSON body with matching `Content-Type` and `Content-Length`
    pub fn with_json(mut self, value: &Value) -> Self {
        let body = value.to_string().into_bytes();
        self.headers.set("Content-Type", JSON_UTF_8);
        self.headers.set("Content-Length", body.len().to_string());
        self.content = Bytes::from(body);
        self
    }

    /// Attach out-of-band metadata
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// First value of a header
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// First value of a query parameter
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Body decoded as UTF-8, lossily
    pub fn utf8_string(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }

    /// Body parsed as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.content)?)
    }
}

impl fmt::Display for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.method, self.uri)
    }
}

/// An HTTP response as seen by the codecs and the router
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Raw body
    pub content: Bytes,
    /// Out-of-band metadata
    pub attributes: Attributes,
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new(200)
    }
}

impl HttpResponse {
    /// Create an empty response with the given status
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Headers::new(),
            content: Bytes::new(),
            attributes: Attributes::new(),
        }
    }

    /// Add a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }

    /// Set the raw body
    pub fn with_content(mut self, content: impl Into<Bytes>) -> Self {
        self.content = content.into();
        self
    }

    /// Set a JSON body with matching `Content-Type`
    pub fn with_json(mut self, value: &Value) -> Self {
        self.headers.set("Content-Type", JSON_UTF_8);
        self.content = Bytes::from(value.to_string().into_bytes());
        self
    }

    /// Set a plain-text body
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.headers.set("Content-Type", "text/plain; charset=utf-8");
        self.content = Bytes::from(text.into().into_bytes());
        self
    }

    /// First value of a header
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, lossily
    pub fn utf8_string(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }

    /// Body parsed as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.content)?)
    }
}

/// Parse an `a=b&c=d` query string, decoding `+` and percent escapes.
pub(crate) fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_query_component(key), decode_query_component(value))
        })
        .collect()
}

fn decode_query_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_headers_keep_order_and_case() {
        let mut headers = Headers::new();
        headers.add("X-Trace", "a");
        headers.add("Accept", "*/*");
        headers.add("x-trace", "b");

        assert_eq!(headers.get("X-TRACE"), Some("a"));
        assert_eq!(headers.get_all("x-trace").collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(
            headers.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            vec!["X-Trace", "Accept", "x-trace"]
        );

        headers.set("X-Trace", "c");
        assert_eq!(headers.get_all("x-trace").collect::<Vec<_>>(), vec!["c"]);
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_header_value_outlives_lookup_key() {
        let mut headers = Headers::new();
        headers.add("Content-Type", "text/plain");
        let value = {
            let key = String::from("content-type");
            headers.get(&key)
        };
        assert_eq!(value, Some("text/plain"));
    }

    #[test]
    fn test_request_splits_query() {
        let req = HttpRequest::new(HttpMethod::Get, "/session?user=a+b&x=%2F");
        assert_eq!(req.uri, "/session");
        assert_eq!(req.query_param("user"), Some("a b"));
        assert_eq!(req.query_param("x"), Some("/"));
        assert_eq!(req.query_param("missing"), None);
    }

    #[test]
    fn test_request_json_body() {
        let req = HttpRequest::new(HttpMethod::Post, "/session").with_json(&json!({"a": "é"}));
        assert_eq!(req.header("content-type"), Some(JSON_UTF_8));
        assert_eq!(req.header("Content-Length"), Some(req.content.len().to_string().as_str()));
        let parsed: Value = req.json().unwrap();
        assert_eq!(parsed["a"], "é");
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
        assert!("PATCH".parse::<HttpMethod>().is_err());
        assert_eq!(http::Method::from(HttpMethod::Post), http::Method::POST);
    }

    #[test]
    fn test_response_defaults() {
        let res = HttpResponse::default();
        assert_eq!(res.status, 200);
        assert!(res.is_success());
        assert!(!HttpResponse::new(404).is_success());
        assert_eq!(HttpResponse::new(200).with_text("hi").utf8_string(), "hi");
    }
}
