//! Endpoint templates (`/api/books/:id`) and their parameter bindings.

use crate::error::ResourceError;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;

/// Call-time parameter values, by name.
pub type Params = BTreeMap<String, String>;

const PLACEHOLDER: &str = r":(\w*)";
const ORIGIN: &str = r"^https?://[^/]*";

/// Build `Params` from literal pairs.
pub fn params<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Params
where
    K: Into<String>,
    V: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

/// A default parameter binding: a literal, or `@field` read from the entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Binding {
    Literal(String),
    Field(String),
}

impl Binding {
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix('@') {
            Some(field) => Binding::Field(field.to_string()),
            None => Binding::Literal(raw.to_string()),
        }
    }

    /// Value for this binding; `None` when a field binding has nothing to read.
    pub fn resolve(&self, entity: Option<&Value>) -> Option<String> {
        match self {
            Binding::Literal(s) => Some(s.clone()),
            Binding::Field(field) => match entity?.get(field)? {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            },
        }
    }
}

pub type Bindings = BTreeMap<String, Binding>;

pub fn parse_bindings(raw: &Params) -> Bindings {
    raw.iter().map(|(k, v)| (k.clone(), Binding::parse(v))).collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Part {
    Literal(String),
    Param(String),
}

/// Parsed URL template. Immutable once built.
#[derive(Clone, Debug)]
pub struct EndpointTemplate {
    raw: String,
    /// `scheme://host[:port]` of an absolute template, kept verbatim.
    origin: String,
    parts: Vec<Part>,
}

impl EndpointTemplate {
    /// Parse a template. It must start with `/` (or `http(s)://host` and then `/`) and
    /// name at least one `:placeholder`. A colon followed by digits (a port) is literal text.
    pub fn parse(raw: &str) -> Result<Self, ResourceError> {
        let invalid = |reason| ResourceError::InvalidTemplate {
            template: raw.to_string(),
            reason,
        };
        if raw.is_empty() {
            return Err(invalid("template is empty"));
        }
        let origin_re = Regex::new(ORIGIN).map_err(|_| invalid("origin pattern"))?;
        let origin = origin_re.find(raw).map(|m| m.as_str()).unwrap_or_default();
        let path = &raw[origin.len()..];
        if !path.starts_with('/') {
            return Err(invalid("template must start with '/'"));
        }
        let re = Regex::new(PLACEHOLDER).map_err(|_| invalid("placeholder pattern"))?;

        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut last = 0;
        for caps in re.captures_iter(path) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            literal.push_str(&path[last..whole.start()]);
            last = whole.end();
            let name = name.as_str();
            if name.is_empty() {
                return Err(invalid("placeholder has no name"));
            }
            if name.starts_with(|c: char| c.is_ascii_digit()) {
                literal.push_str(whole.as_str());
                continue;
            }
            if !literal.is_empty() {
                parts.push(Part::Literal(std::mem::take(&mut literal)));
            }
            parts.push(Part::Param(name.to_string()));
        }
        literal.push_str(&path[last..]);
        if !literal.is_empty() {
            parts.push(Part::Literal(literal));
        }

        if !parts.iter().any(|p| matches!(p, Part::Param(_))) {
            return Err(invalid("template has no :placeholder"));
        }
        Ok(EndpointTemplate {
            raw: raw.to_string(),
            origin: origin.to_string(),
            parts,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|p| match p {
            Part::Param(name) => Some(name.as_str()),
            Part::Literal(_) => None,
        })
    }

    /// Fill placeholders from `values`; unfilled placeholders drop out of the path
    /// and values that match no placeholder become the query string.
    pub fn expand(&self, values: &Params) -> String {
        let mut path = String::new();
        for part in &self.parts {
            match part {
                Part::Literal(s) => path.push_str(s),
                Part::Param(name) => {
                    if let Some(v) = values.get(name).filter(|v| !v.is_empty()) {
                        path.push_str(&encode_segment(v));
                    }
                }
            }
        }
        let mut path = format!("{}{}", self.origin, normalize_path(&path));

        let placeholders: Vec<&str> = self.placeholders().collect();
        let query: Vec<(&str, &str)> = values
            .iter()
            .filter(|(k, _)| !placeholders.contains(&k.as_str()))
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        if !query.is_empty() {
            if let Ok(qs) = serde_urlencoded::to_string(&query) {
                path.push('?');
                path.push_str(&qs);
            }
        }
        path
    }
}

/// Collapse `//`, turn a final `/.ext` into `.ext` (for `/:id.json` with no id),
/// then drop trailing `/`.
fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    if let Some(slash) = out.rfind("/.") {
        let ext = &out[slash + 2..];
        if slash > 0 && !ext.is_empty() && ext.chars().all(|c| c.is_alphanumeric() || c == '_') {
            out.remove(slash);
        }
    }
    while out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

/// Percent-encode a path segment value, keeping RFC 3986 unreserved characters.
fn encode_segment(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(b as char),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}
