//! # Header Handling
//!
//! Header names are canonicalised once, when they enter the program: response
//! headers when a record is built, exclusion names when the set is parsed, and
//! extra request headers when their `Name: Value` lines are read. Everything
//! downstream compares names with plain string equality.

use crate::errors::ConfigError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::{btree_map, BTreeMap, BTreeSet};
use std::path::Path;

/// Characters allowed in an HTTP token besides ASCII alphanumerics
const TOKEN_SYMBOLS: &[u8] = b"!#$%&'*+-.^_`|~";

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || TOKEN_SYMBOLS.contains(&b)
}

/// Canonical form of a header name: `content-TYPE` becomes `Content-Type`.
///
/// The first letter and every letter following a hyphen are upper-cased, the
/// rest lower-cased. Names containing characters that are not valid in an HTTP
/// token are returned trimmed but otherwise untouched.
pub fn canonical_header_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() || !name.bytes().all(is_token_byte) {
        return name.to_string();
    }

    let mut upper = true;
    name.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}

/// Case-insensitive header multimap: canonical name → values in arrival order.
///
/// Backed by a `BTreeMap` so that iteration order is the same on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMultiMap {
    entries: BTreeMap<String, Vec<String>>,
}

impl HeaderMultiMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value under `name`, keeping any values already present
    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        self.entries
            .entry(canonical_header_name(name))
            .or_default()
            .push(value.into());
    }

    /// Values for `name` (any casing), or `None` if the header is absent
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .get(&canonical_header_name(name))
            .map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Canonical names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.entries.iter()
    }

    /// Number of distinct header names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot a wire header map. Values go through [`header_value_text`], so
    /// two values that differ on the wire never compare equal.
    pub fn from_header_map(map: &HeaderMap) -> Self {
        let mut headers = Self::new();
        for (name, value) in map.iter() {
            headers.append(name.as_str(), header_value_text(value.as_bytes()));
        }
        headers
    }
}

/// Text form of a raw header value. Distinct byte strings always give
/// distinct text: bytes outside valid UTF-8 are written as `\xNN`, and a
/// literal backslash is doubled so the two cannot collide.
pub fn header_value_text(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    loop {
        let (valid, invalid_len) = match std::str::from_utf8(bytes) {
            Ok(valid) => (valid, 0),
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                let valid = std::str::from_utf8(valid).unwrap_or_default();
                (valid, e.error_len().unwrap_or(rest.len()))
            }
        };
        for c in valid.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                c => out.push(c),
            }
        }
        bytes = &bytes[valid.len()..];
        if invalid_len == 0 {
            return out;
        }
        for b in &bytes[..invalid_len] {
            out.push_str(&format!("\\x{b:02X}"));
        }
        bytes = &bytes[invalid_len..];
    }
}

impl<'a> IntoIterator for &'a HeaderMultiMap {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<N: AsRef<str>, V: Into<String>> FromIterator<(N, V)> for HeaderMultiMap {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.append(name.as_ref(), value);
        }
        headers
    }
}

/// Header names the differ ignores, stored in canonical form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    names: BTreeSet<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list such as `date, x-request-id`
    pub fn from_list(list: &str) -> Self {
        let mut set = Self::new();
        set.extend_from_list(list);
        set
    }

    /// Merge another comma-separated list into the set
    pub fn extend_from_list(&mut self, list: &str) {
        for name in list.split(',') {
            self.insert(name);
        }
    }

    pub fn insert(&mut self, name: &str) {
        let name = canonical_header_name(name);
        if !name.is_empty() {
            self.names.insert(name);
        }
    }

    /// Exact match against an already-canonical header name
    pub fn contains(&self, canonical_name: &str) -> bool {
        self.names.contains(canonical_name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for name in iter {
            set.insert(name.as_ref());
        }
        set
    }
}

/// Parse one `Name: Value` line into a canonical name and trimmed value.
///
/// The line is split on its first colon, so values may contain colons. The
/// name must be non-empty and both halves must be valid on the wire.
pub fn parse_header_line(line: &str) -> Result<(String, String), ConfigError> {
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| ConfigError::BadHeader(line.to_string()))?;

    let name = canonical_header_name(name);
    if name.is_empty() {
        return Err(ConfigError::BadHeader(line.to_string()));
    }
    let value = value.trim().to_string();

    HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| ConfigError::InvalidHeaderName(name.clone()))?;
    HeaderValue::from_str(&value).map_err(|_| ConfigError::InvalidHeaderValue(name.clone()))?;

    Ok((name, value))
}

/// Read a header file with one `Name: Value` per line. Blank lines are
/// skipped; any other malformed line fails the whole file.
pub fn read_header_file(path: &Path) -> Result<Vec<(String, String)>, ConfigError> {
    tracing::debug!("Reading headers from {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::HeaderFile {
        path: path.to_path_buf(),
        source,
    })?;

    let mut headers = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let header = parse_header_line(line).map_err(|e| match e {
            ConfigError::BadHeader(line) => ConfigError::BadHeaderInFile {
                path: path.to_path_buf(),
                line_no: idx + 1,
                line,
            },
            other => other,
        })?;
        headers.push(header);
    }

    tracing::debug!("Read {} headers from {}", headers.len(), path.display());
    Ok(headers)
}
