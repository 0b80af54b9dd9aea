//! Warning types for non-fatal errors during JSONL processing.
//!
//! When loading a JSONL file it is usually preferable to keep going past a
//! corrupted line rather than refuse the whole file. [`Warning`] captures
//! those skipped lines so the caller can report them.

/// A non-fatal warning that occurred while reading a JSONL file.
///
/// Each variant carries the 1-based line number where the problem occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A line contained malformed JSON that could not be parsed.
    ///
    /// The line is skipped and processing continues with the next line.
    MalformedJson {
        /// The 1-based line number where the error occurred.
        line_number: usize,
        /// A description of the JSON parsing error.
        error: String,
    },
}

impl Warning {
    /// Returns the line number associated with this warning.
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::MalformedJson { line_number, .. } => *line_number,
        }
    }

    /// Returns a human-readable description of the warning.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::MalformedJson { line_number, error } => {
                format!("line {}: malformed JSON: {}", line_number, error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_number_is_reported() {
        let warning = Warning::MalformedJson {
            line_number: 42,
            error: "unexpected token".to_string(),
        };
        assert_eq!(warning.line_number(), 42);
    }

    #[test]
    fn description_mentions_line_and_cause() {
        let warning = Warning::MalformedJson {
            line_number: 5,
            error: "unexpected end of input".to_string(),
        };
        let desc = warning.description();
        assert!(desc.contains("line 5"));
        assert!(desc.contains("unexpected end of input"));
    }
}
