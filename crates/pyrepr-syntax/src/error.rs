use crate::parser::Rule;
use pest::error::Error as PestError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReprError {
    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
        source_snippet: String,
    },

    #[error("Invalid number format: {0}")]
    InvalidNumber(String),

    #[error("Unexpected element '{0}' in payload")]
    Unexpected(String),
}

impl ReprError {
    pub fn from_pest_error(err: PestError<Rule>) -> Self {
        use pest::error::LineColLocation;

        let (line, column) = match err.line_col {
            LineColLocation::Pos((l, c)) => (l, c),
            LineColLocation::Span((l, c), _) => (l, c),
        };

        ReprError::Parse {
            message: format!("{}", err.variant),
            line,
            column,
            source_snippet: err.line().to_string(),
        }
    }

    /// Format error with a caret under the failing column.
    pub fn format_error(&self) -> String {
        match self {
            ReprError::Parse {
                message,
                line,
                column,
                source_snippet,
            } => format!(
                "Parse error at line {line}, column {column}:\n{source_snippet}\n{}^\n{message}",
                " ".repeat(column.saturating_sub(1)),
            ),
            other => other.to_string(),
        }
    }
}
