use thiserror::Error;

/// Result type alias for interpreter operations
pub type Result<T> = std::result::Result<T, BasicError>;

/// Errors that can occur while tokenizing or executing BASIC input
///
/// This is a closed set: every failure anywhere in the interpreter maps to
/// exactly one of these kinds. The driver prints one diagnostic line per
/// failed input line and resumes the prompt.
#[derive(Debug, Error)]
pub enum BasicError {
    /// I/O error while writing interpreter output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tokenizer could not classify a byte; carries the remaining input
    #[error("Syntax error {0}")]
    Syntax(String),

    /// Variable table full on first sighting of a new name
    #[error("Too many variables")]
    TooManyVariables,

    /// Missing closing `"` or `'`
    #[error("Unterminated string")]
    UnterminatedString,

    /// Arena write would exceed capacity
    #[error("Mem full")]
    MemFull,

    /// A required token was not present at the cursor
    #[error("Expected {0}")]
    Expected(&'static str),

    /// Integer remainder with a zero divisor
    #[error("Division by zero")]
    DivisionByZero,

    /// `run` while a run is already in progress
    #[error("Nested run")]
    NestedRun,

    /// Branch target absent from the chunk store
    #[error("Line not found")]
    LineNotFound,

    /// `gosub` past the call-stack depth limit
    #[error("Stack overflow")]
    StackOverflow,

    /// `next` with an empty loop stack, or `for` with a full one
    #[error("Next without for")]
    NextWithoutFor,

    /// Internal invariant violation (corrupt arena contents)
    #[error("Assert failed")]
    AssertFailed,

    /// `=` whose left side did not name a variable
    #[error("Not an lvalue")]
    NotLvalue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            BasicError::Expected("expression").to_string(),
            "Expected expression"
        );
        assert_eq!(
            BasicError::Syntax("@x".to_string()).to_string(),
            "Syntax error @x"
        );
        assert_eq!(BasicError::MemFull.to_string(), "Mem full");
        assert_eq!(BasicError::NextWithoutFor.to_string(), "Next without for");
    }
}
