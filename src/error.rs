//! Error taxonomy for the documentation compiler.
//!
//! Every error carries the file name and the 1-based line/column of the
//! offending token. All errors are fatal to the batch that produced them;
//! there is no partial-success mode.

use crate::lexer::token::Pos;
use thiserror::Error;

/// A fatal compilation error, positioned at its offending token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{file}:{line}:{column}: {kind}")]
pub struct Error {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub kind: ErrorKind,
}

/// The stage that rejected the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// The tokenizer hit an unrecognized character or an unterminated state.
    #[error("lex error: {0}")]
    Lex(String),
    /// No grammar alternative matched the token run.
    #[error("syntax error: {0}")]
    Syntax(String),
    /// An annotation rule was violated.
    #[error("semantic error: {0}")]
    Semantic(String),
    /// The highlighter rejected a prototype snippet.
    #[error("highlight error: {0}")]
    Highlight(String),
}

impl Error {
    pub(crate) fn lex(file: &str, pos: Pos, msg: impl Into<String>) -> Self {
        Self::at(file, pos, ErrorKind::Lex(msg.into()))
    }

    pub(crate) fn syntax(file: &str, pos: Pos, msg: impl Into<String>) -> Self {
        Self::at(file, pos, ErrorKind::Syntax(msg.into()))
    }

    pub(crate) fn semantic(file: &str, pos: Pos, msg: impl Into<String>) -> Self {
        Self::at(file, pos, ErrorKind::Semantic(msg.into()))
    }

    pub(crate) fn highlight(file: &str, pos: Pos, msg: impl Into<String>) -> Self {
        Self::at(file, pos, ErrorKind::Highlight(msg.into()))
    }

    fn at(file: &str, pos: Pos, kind: ErrorKind) -> Self {
        Self {
            file: file.to_string(),
            line: pos.line,
            column: pos.column,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_position_and_stage() {
        let err = Error::lex("sample.h", Pos { line: 3, column: 7 }, "unexpected character `[`");
        assert_eq!(
            err.to_string(),
            "sample.h:3:7: lex error: unexpected character `[`"
        );
    }
}
