//! Error types for generated-output ingestion

/// Errors while parsing the delimited generated-output grammar
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// `===FILE:===` marker without a path
    #[error("file marker on line {line} has an empty path")]
    EmptyPath { line: usize },

    /// The dependencies block is not valid JSON
    #[error("invalid dependencies block on line {line}: {source}")]
    InvalidDependencies {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// More than one dependencies block
    #[error("duplicate dependencies block on line {line}")]
    DuplicateDependencies { line: usize },
}

impl ParseError {
    /// Line of the offending marker, 1-based
    #[inline]
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::EmptyPath { line }
            | Self::InvalidDependencies { line, .. }
            | Self::DuplicateDependencies { line } => *line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ParseError::EmptyPath { line: 3 };
        assert_eq!(err.to_string(), "file marker on line 3 has an empty path");
        assert_eq!(err.line(), 3);
        assert_eq!(ParseError::DuplicateDependencies { line: 9 }.line(), 9);
    }
}
