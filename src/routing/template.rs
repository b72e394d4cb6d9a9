//! URL templates with `{name}` placeholders.
//!
//! ```text
//! template  /session/{sessionId}/element/{id}/attribute/{name}
//! path      /session/abc      /element/7   /attribute/value
//! bindings  {sessionId: "abc", id: "7", name: "value"}
//! ```
//!
//! Each `/`-separated fragment compiles to its own anchored regex; a path
//! matches only when it has the same number of fragments and every fragment
//! matches. A placeholder captures one or more non-`/` characters.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, WdpError};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z0-9]+)\}").expect("valid placeholder pattern"));

#[derive(Debug, Clone)]
struct Fragment {
    pattern: Regex,
    names: Vec<String>,
}

/// A compiled URL template
#[derive(Debug, Clone)]
pub struct UrlTemplate {
    template: String,
    fragments: Vec<Fragment>,
}

/// Successful [`UrlTemplate::matches`] result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplateMatch {
    url: String,
    parameters: HashMap<String, String>,
}

impl UrlTemplateMatch {
    /// The path that matched
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Placeholder bindings
    pub fn parameters(&self) -> &HashMap<String, String> {
        &self.parameters
    }

    /// One binding
    pub fn get(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    /// Take the bindings
    pub fn into_parameters(self) -> HashMap<String, String> {
        self.parameters
    }
}

impl UrlTemplate {
    /// Compile a template
    pub fn new(template: &str) -> Result<Self> {
        let fragments = split(template)
            .into_iter()
            .map(compile_fragment)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            template: template.to_string(),
            fragments,
        })
    }

    /// The source template
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Match a concrete path.
    ///
    /// A name bound by two fragments keeps the later binding.
    pub fn matches(&self, path: &str) -> Option<UrlTemplateMatch> {
        let parts = split(path);
        if parts.len() != self.fragments.len() {
            return None;
        }

        let mut parameters = HashMap::new();
        for (fragment, part) in self.fragments.iter().zip(parts) {
            let captures = fragment.pattern.captures(part)?;
            for (index, name) in fragment.names.iter().enumerate() {
                if let Some(value) = captures.get(index + 1) {
                    parameters.insert(name.clone(), value.as_str().to_string());
                }
            }
        }

        Some(UrlTemplateMatch {
            url: path.to_string(),
            parameters,
        })
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

/// Split on `/`, dropping trailing empty fragments
fn split(path: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = path.split('/').collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}

fn compile_fragment(fragment: &str) -> Result<Fragment> {
    let mut pattern = String::from("^");
    let mut names = Vec::new();
    let mut last = 0;

    for captures in PLACEHOLDER.captures_iter(fragment) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        pattern.push_str(&regex::escape(&fragment[last..whole.start()]));
        pattern.push_str("([^/]+)");
        names.push(name.as_str().to_string());
        last = whole.end();
    }
    pattern.push_str(&regex::escape(&fragment[last..]));
    pattern.push('$');

    let pattern = Regex::new(&pattern)
        .map_err(|e| WdpError::InvalidArgument(format!("Bad URL template fragment {fragment:?}: {e}")))?;
    Ok(Fragment { pattern, names })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_template() {
        let template = UrlTemplate::new("/session/{sessionId}/element/{id}/attribute/{name}").unwrap();
        let found = template.matches("/session/abc/element/7/attribute/value").unwrap();

        assert_eq!(found.url(), "/session/abc/element/7/attribute/value");
        assert_eq!(found.get("sessionId"), Some("abc"));
        assert_eq!(found.get("id"), Some("7"));
        assert_eq!(found.get("name"), Some("value"));
        assert_eq!(found.parameters().len(), 3);

        assert!(template.matches("/session/abc/element/7").is_none());
    }

    #[test]
    fn test_literal_segments_must_match() {
        let template = UrlTemplate::new("/session/{id}/url").unwrap();
        assert!(template.matches("/session/1/url").is_some());
        assert!(template.matches("/session/1/title").is_none());
        assert!(template.matches("/session//url").is_none());
        assert!(template.matches("/session/1/url/extra").is_none());
    }

    #[test]
    fn test_trailing_slash_is_ignored() {
        let template = UrlTemplate::new("/status").unwrap();
        assert!(template.matches("/status/").is_some());
        assert!(UrlTemplate::new("/").unwrap().matches("/").is_some());
    }

    #[test]
    fn test_placeholder_inside_fragment() {
        let template = UrlTemplate::new("/files/{name}.{ext}").unwrap();
        let found = template.matches("/files/report.pdf").unwrap();
        assert_eq!(found.get("name"), Some("report"));
        assert_eq!(found.get("ext"), Some("pdf"));
    }

    #[test]
    fn test_regex_characters_are_literal() {
        let template = UrlTemplate::new("/a+b/{id}").unwrap();
        assert!(template.matches("/a+b/1").is_some());
        assert!(template.matches("/aab/1").is_none());
    }

    #[test]
    fn test_repeated_name_keeps_last_binding() {
        let template = UrlTemplate::new("/{id}/x/{id}").unwrap();
        let found = template.matches("/first/x/second").unwrap();
        assert_eq!(found.get("id"), Some("second"));
    }
}
