//! Glob patterns over object paths
//!
//! `*` matches within one path segment, `?` matches a single character and
//! a `**` segment matches any number of segments (including none).

use crate::error::{Error, Result};
use regex::Regex;

/// A compiled glob pattern, relative to a storage root
#[derive(Debug, Clone)]
pub struct GlobPattern {
    pattern: String,
    regex: Regex,
    prefix: Vec<String>,
}

impl GlobPattern {
    /// Compile a glob pattern
    pub fn new(pattern: &str) -> Result<Self> {
        let trimmed = pattern.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Err(Error::pattern(pattern, "pattern is empty"));
        }

        let segments: Vec<&str> = trimmed.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(Error::pattern(pattern, "pattern contains an empty segment"));
        }

        let mut source = String::from("^");
        for (i, segment) in segments.iter().enumerate() {
            let last = i + 1 == segments.len();
            if *segment == "**" {
                source.push_str(if last { ".*" } else { "(?:[^/]+/)*" });
                continue;
            }
            for ch in segment.chars() {
                match ch {
                    '*' => source.push_str("[^/]*"),
                    '?' => source.push_str("[^/]"),
                    c => source.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
                }
            }
            if !last {
                source.push('/');
            }
        }
        source.push('$');

        let regex = Regex::new(&source).map_err(|e| Error::pattern(pattern, e.to_string()))?;

        // Leading wildcard-free directories; the last segment names files
        let prefix = segments[..segments.len() - 1]
            .iter()
            .take_while(|s| !is_wildcard(s))
            .map(|s| (*s).to_string())
            .collect();

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            prefix,
        })
    }

    /// The original pattern text
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Directory segments that every match starts with
    pub fn literal_prefix(&self) -> &[String] {
        &self.prefix
    }

    /// Check a `/`-separated path relative to the storage root
    pub fn matches(&self, relative_path: &str) -> bool {
        self.regex.is_match(relative_path)
    }
}

fn is_wildcard(segment: &str) -> bool {
    segment.contains(['*', '?'])
}
