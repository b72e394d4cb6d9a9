//! Command registry: name → (method, path template).
//!
//! Bindings are accumulated in a [`RegistryBuilder`] and frozen into a
//! [`CommandRegistry`] before any codec uses them. The frozen registry is never
//! mutated again, so one instance can back any number of concurrent encode and
//! decode calls.

use std::collections::HashMap;
use std::fmt;

use crate::http::HttpMethod;

/// One segment of a command path template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Must match exactly
    Literal(String),
    /// Named parameter; matches any non-empty segment
    Param(String),
}

/// Method and path template a command travels on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    method: HttpMethod,
    segments: Vec<PathSegment>,
}

impl CommandSpec {
    /// Parse a template such as `/session/{sessionId}/url`.
    ///
    /// Parameters are written `{name}` or `:name`; empty segments are ignored.
    pub fn new(method: HttpMethod, template: &str) -> Self {
        let segments = template
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if let Some(name) = s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    PathSegment::Param(name.to_string())
                } else if let Some(name) = s.strip_prefix(':') {
                    PathSegment::Param(name.to_string())
                } else {
                    PathSegment::Literal(s.to_string())
                }
            })
            .collect();

        Self { method, segments }
    }

    /// HTTP method
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Template segments, in order
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of path segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True for the root template `/`
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether `parts` (already split, non-empty segments) fit this template
    pub fn matches(&self, method: HttpMethod, parts: &[&str]) -> bool {
        self.method == method
            && self.segments.len() == parts.len()
            && self.segments.iter().zip(parts).all(|(seg, part)| match seg {
                PathSegment::Literal(lit) => lit == part,
                PathSegment::Param(_) => !part.is_empty(),
            })
    }

    /// Template rendered back as `/a/{b}/c`
    pub fn template(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            match segment {
                PathSegment::Literal(lit) => write!(f, "/{lit}")?,
                PathSegment::Param(name) => write!(f, "/{{{name}}}")?,
            }
        }
        Ok(())
    }
}

/// Mutable accumulator of command bindings
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    specs: Vec<(String, CommandSpec)>,
    aliases: HashMap<String, String>,
}

impl RegistryBuilder {
    /// Empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `method` + `template`. Rebinding a name replaces its spec
    /// in place, keeping its original registration position.
    pub fn define(&mut self, name: impl Into<String>, method: HttpMethod, template: &str) -> &mut Self {
        let name = name.into();
        let spec = CommandSpec::new(method, template);
        match self.specs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = spec,
            None => self.specs.push((name, spec)),
        }
        self
    }

    /// Encode `name` through the spec registered for `target`
    pub fn alias(&mut self, name: impl Into<String>, target: impl Into<String>) -> &mut Self {
        self.aliases.insert(name.into(), target.into());
        self
    }

    /// Freeze into an immutable registry
    pub fn freeze(self) -> CommandRegistry {
        let mut by_name = HashMap::with_capacity(self.specs.len());
        let mut by_method: HashMap<HttpMethod, Vec<usize>> = HashMap::new();
        for (index, (name, spec)) in self.specs.iter().enumerate() {
            by_name.insert(name.clone(), index);
            by_method.entry(spec.method()).or_default().push(index);
        }

        CommandRegistry {
            specs: self.specs,
            by_name,
            by_method,
            aliases: self.aliases,
        }
    }
}

/// Frozen command registry
#[derive(Debug)]
pub struct CommandRegistry {
    specs: Vec<(String, CommandSpec)>,
    by_name: HashMap<String, usize>,
    by_method: HashMap<HttpMethod, Vec<usize>>,
    aliases: HashMap<String, String>,
}

impl CommandRegistry {
    /// Spec registered under `name`, following one alias hop.
    /// Returns the resolved name alongside the spec.
    pub fn lookup(&self, name: &str) -> Option<(&str, &CommandSpec)> {
        let resolved = self.aliases.get(name).map_or(name, String::as_str);
        self.by_name.get(resolved).map(|&index| {
            let (name, spec) = &self.specs[index];
            (name.as_str(), spec)
        })
    }

    /// Resolve a method and split path to a command.
    ///
    /// Among matching specs the one with the fewest segments wins; equal
    /// lengths go to the earliest registration.
    pub fn resolve(&self, method: HttpMethod, parts: &[&str]) -> Option<(&str, &CommandSpec)> {
        self.by_method
            .get(&method)?
            .iter()
            .map(|&index| &self.specs[index])
            .filter(|(_, spec)| spec.matches(method, parts))
            .min_by_key(|(_, spec)| spec.len())
            .map(|(name, spec)| (name.as_str(), spec))
    }

    /// All bindings in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandSpec)> {
        self.specs.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Aliases as `(name, target)` pairs, sorted by name
    pub fn aliases(&self) -> Vec<(&str, &str)> {
        let mut aliases: Vec<_> = self
            .aliases
            .iter()
            .map(|(name, target)| (name.as_str(), target.as_str()))
            .collect();
        aliases.sort_unstable();
        aliases
    }

    /// Number of bindings, aliases excluded
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Split a request path into its non-empty segments
pub(crate) fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_template() {
        let spec = CommandSpec::new(HttpMethod::Get, "/session/{sessionId}/element/:id/text");
        assert_eq!(spec.len(), 5);
        assert_eq!(spec.segments()[1], PathSegment::Param("sessionId".into()));
        assert_eq!(spec.segments()[3], PathSegment::Param("id".into()));
        assert_eq!(spec.template(), "/session/{sessionId}/element/{id}/text");
        assert_eq!(CommandSpec::new(HttpMethod::Get, "/").template(), "/");
    }

    #[test]
    fn test_matches_requires_exact_segments() {
        let spec = CommandSpec::new(HttpMethod::Get, "/session/{sessionId}/url");
        assert!(spec.matches(HttpMethod::Get, &["session", "abc", "url"]));
        assert!(!spec.matches(HttpMethod::Post, &["session", "abc", "url"]));
        assert!(!spec.matches(HttpMethod::Get, &["session", "abc", "title"]));
        assert!(!spec.matches(HttpMethod::Get, &["session", "abc"]));
    }

    #[test]
    fn test_redefine_replaces_in_place() {
        let mut builder = RegistryBuilder::new();
        builder
            .define("a", HttpMethod::Get, "/a")
            .define("b", HttpMethod::Get, "/b")
            .define("a", HttpMethod::Post, "/a2");
        let registry = builder.freeze();

        let names: Vec<_> = registry.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(registry.lookup("a").unwrap().1.method(), HttpMethod::Post);
    }

    #[test]
    fn test_resolve_prefers_fewest_segments_then_first() {
        let mut builder = RegistryBuilder::new();
        builder
            .define("specific", HttpMethod::Get, "/x/{id}")
            .define("literal", HttpMethod::Get, "/x/y")
            .define("long", HttpMethod::Get, "/x/{id}/z");
        let registry = builder.freeze();

        // Both two-segment specs match; the earlier one wins
        assert_eq!(registry.resolve(HttpMethod::Get, &["x", "y"]).unwrap().0, "specific");
        assert_eq!(registry.resolve(HttpMethod::Get, &["x", "y", "z"]).unwrap().0, "long");
        assert!(registry.resolve(HttpMethod::Post, &["x", "y"]).is_none());
    }

    #[test]
    fn test_alias_lookup() {
        let mut builder = RegistryBuilder::new();
        builder
            .define("getRect", HttpMethod::Get, "/rect")
            .alias("getSize", "getRect");
        let registry = builder.freeze();

        let (name, spec) = registry.lookup("getSize").unwrap();
        assert_eq!(name, "getRect");
        assert_eq!(spec.template(), "/rect");
        assert!(registry.lookup("missing").is_none());
        assert_eq!(registry.aliases(), vec![("getSize", "getRect")]);
    }
}
