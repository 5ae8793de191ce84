use thiserror::Error;

/// The result type for the `scanlex` crate.
pub type Result<T> = std::result::Result<T, ScanLexError>;

/// The error type for the `scanlex` crate.
#[derive(Error, Debug)]
pub struct ScanLexError {
    /// The source of the error.
    pub source: Box<ScanLexErrorKind>,
}

impl ScanLexError {
    /// Create a new `ScanLexError`.
    pub fn new(kind: ScanLexErrorKind) -> Self {
        ScanLexError {
            source: Box::new(kind),
        }
    }

    /// Get the kind of the error.
    pub fn kind(&self) -> &ScanLexErrorKind {
        &self.source
    }

    /// Create a lexer syntax error at the given location.
    pub(crate) fn syntax<S: Into<String>>(message: S, line: usize, column: usize) -> Self {
        ScanLexError::new(ScanLexErrorKind::SyntaxError {
            message: message.into(),
            line,
            column,
        })
    }
}

impl std::fmt::Display for ScanLexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// The error kind type.
#[derive(Error, Debug)]
pub enum ScanLexErrorKind {
    /// The pattern could not be compiled.
    #[error(transparent)]
    RegexSyntaxError(#[from] RegexSyntaxError),

    /// No token category matched at the current input position, or the input ended in the
    /// middle of a token.
    #[error("Syntax error at {line}:{column}: {message}")]
    SyntaxError {
        /// What went wrong.
        message: String,
        /// Line of the offending token start.
        line: usize,
        /// Column of the offending token start.
        column: usize,
    },

    /// A std::io error occurred.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Errors raised while scanning or compiling a pattern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegexSyntaxError {
    /// A byte outside the printable ASCII range 32..=126.
    #[error("Invalid character 0x{character:02x} at position {position}")]
    InvalidCharacter {
        /// The offending byte.
        character: u8,
        /// Byte offset in the pattern.
        position: usize,
    },

    /// A backslash followed by a byte that cannot be escaped.
    #[error("Invalid escape sequence '\\{}' at position {position}", printable(.character))]
    InvalidEscapeSequence {
        /// The byte following the backslash.
        character: u8,
        /// Byte offset of the backslash in the pattern.
        position: usize,
    },

    /// A group was opened but not closed, or closed without being opened.
    #[error("Inbalanced parentheses at position {position}")]
    InbalancedParens {
        /// Byte offset where the imbalance was detected.
        position: usize,
    },
}

impl From<RegexSyntaxError> for ScanLexError {
    fn from(error: RegexSyntaxError) -> Self {
        ScanLexError::new(ScanLexErrorKind::RegexSyntaxError(error))
    }
}

impl From<std::io::Error> for ScanLexError {
    fn from(error: std::io::Error) -> Self {
        ScanLexError::new(ScanLexErrorKind::IoError(error))
    }
}

fn printable(character: &u8) -> String {
    std::ascii::escape_default(*character).to_string()
}
