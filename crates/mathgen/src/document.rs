//! The sanitized LaTeX document handed to the presentation layer

use std::fmt;

use chrono::{DateTime, Utc};

use crate::sanitize::sanitize;

/// Topic used in file names when the user left it blank
pub const FALLBACK_FILE_TOPIC: &str = "数学练习题";

/// A complete LaTeX document. Always contains `\documentclass`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedDocument(String);

impl SanitizedDocument {
    /// Sanitize raw provider output.
    pub fn from_raw(raw: &str) -> Self {
        Self(sanitize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// `{topic}_{unix_millis}.tex`, with path separators and other characters
    /// that are unsafe in file names replaced by `_`.
    pub fn file_name(topic: &str, at: DateTime<Utc>) -> String {
        let topic = topic.trim();
        let topic = if topic.is_empty() {
            FALLBACK_FILE_TOPIC
        } else {
            topic
        };

        let safe: String = topic
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();

        format!("{}_{}.tex", safe, at.timestamp_millis())
    }
}

impl fmt::Display for SanitizedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SanitizedDocument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
