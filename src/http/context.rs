//! Route-prefix context threaded alongside a request.
//!
//! Nested routes strip their prefix from the path before delegating. Handlers
//! that need to emit links valid for the *original* URL read the stack of
//! stripped prefixes from here instead of an untyped attribute.

use super::HttpRequest;

/// Immutable stack of route prefixes stripped on the way to a handler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    prefixes: Vec<String>,
}

impl RequestContext {
    /// A context with a further prefix pushed on top
    pub fn with_prefix(&self, prefix: impl Into<String>) -> Self {
        let mut prefixes = self.prefixes.clone();
        prefixes.push(prefix.into());
        Self { prefixes }
    }

    /// Prefixes, outermost first
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Prefixes joined into a single path fragment
    pub fn joined(&self) -> String {
        self.prefixes.concat()
    }
}

/// Rebuild `path` so it is valid relative to the request's original URL.
pub fn relative_to_context(request: &HttpRequest, path: &str) -> String {
    let mut prefix = request.context.joined();
    if prefix.ends_with('/') && path.starts_with('/') {
        prefix.pop();
    }
    prefix + path
}
