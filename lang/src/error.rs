use crate::grammar::token::Token;
use std::fmt;
use thiserror::Error;

// Token information for diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    pub kind: &'static str,
    pub text: String,
    pub line: usize,
    pub col: usize,
}

impl fmt::Display for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text.is_empty() {
            write!(f, "{} at {}:{}", self.kind, self.line + 1, self.col + 1)
        } else {
            write!(
                f,
                "{} `{}` at {}:{}",
                self.kind,
                self.text,
                self.line + 1,
                self.col + 1
            )
        }
    }
}

impl From<&Token> for TokenInfo {
    fn from(token: &Token) -> Self {
        TokenInfo {
            kind: token.kind.name(),
            text: token.text.clone(),
            line: token.pos.line,
            col: token.pos.col,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("Unrecognized lexeme: `{lexeme}` at {}:{}", line + 1, col + 1)]
    Lex {
        lexeme: String,
        line: usize,
        col: usize,
    },

    #[error("Syntax error: expected {expected}, found {found}")]
    Syntax {
        expected: &'static str,
        found: TokenInfo,
    },

    #[error("Invalid assignment target: `{target}` is not a single register (line {})", line + 1)]
    InvalidAssignmentTarget { target: String, line: usize },

    #[error("Unterminated block: expected {expected} before {found}")]
    UnterminatedBlock {
        expected: &'static str,
        found: TokenInfo,
    },
}

impl Error {
    /// 0-based source line the error points at.
    pub fn line(&self) -> usize {
        match self {
            Error::Lex { line, .. } => *line,
            Error::Syntax { found, .. } => found.line,
            Error::InvalidAssignmentTarget { line, .. } => *line,
            Error::UnterminatedBlock { found, .. } => found.line,
        }
    }

    /// Process exit status for this kind of failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Lex { .. } => 2,
            Error::Syntax { .. } => 3,
            Error::InvalidAssignmentTarget { .. } => 4,
            Error::UnterminatedBlock { .. } => 5,
        }
    }
}
