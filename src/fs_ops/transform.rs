//! Regex-based file-name rewriting.
//!
//! One compiled substitution is applied to the raw file name; no case
//! normalization, no Unicode folding. Results are scanned against a fixed
//! forbidden-character set so a rename can never produce a name that breaks
//! on another filesystem (Windows in particular).

use regex::Regex;

/// Characters rejected in produced names.
pub const FORBIDDEN_CHARS: [char; 15] = [
    '~', '"', '#', '%', '&', '*', ':', '<', '>', '?', '/', '\\', '{', '|', '}',
];

/// A compiled pattern/replacement pair. The replacement may reference capture
/// groups with `$1`, `$2` or `${name}`.
#[derive(Debug, Clone)]
pub struct NameTransform {
    pattern: Regex,
    replacement: String,
}

/// Outcome of applying a transform to one name. A non-empty `illegal` list
/// means the caller must not use the name; the file is skipped, not renamed.
#[derive(Debug, Clone)]
pub struct Transformed {
    pub name: String,
    pub illegal: Vec<char>,
}

impl NameTransform {
    pub fn new(pattern: &str, replacement: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.to_string(),
        })
    }

    /// Substitute every match in `name` and report forbidden characters found
    /// in the result.
    pub fn apply(&self, name: &str) -> Transformed {
        let new_name = self
            .pattern
            .replace_all(name, self.replacement.as_str())
            .into_owned();
        let illegal = FORBIDDEN_CHARS
            .iter()
            .copied()
            .filter(|c| new_name.contains(*c))
            .collect();
        Transformed {
            name: new_name,
            illegal,
        }
    }
}
