//! Token and source-position types shared by the lexer and parser.

/// A 1-based source position. The owning file name travels separately,
/// stamped into errors by whichever pass raises them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
}

/// Token kinds, grouped by the lexical state that produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `/**` at the start of a documentation comment line.
    DocCommentOpen,
    /// `/*` at the start of a plain comment line.
    CommentOpen,
    /// `*` continuing a comment block.
    CommentCont,
    /// `*/` closing a comment block.
    CommentClose,
    /// An `@`-prefixed command word inside a comment line.
    CommentCommand,
    /// A plain word inside a comment line.
    CommentValue,
    /// `#` introducing a preprocessor line.
    Hash,
    /// The directive name after `#`.
    PreProcName,
    /// Verbatim directive value, backslash continuations included.
    PreProcValue,
    /// An include path with its delimiters, e.g. `<math.h>` or `"shapes.h"`.
    IncludePath,
    /// The macro name after `#define`.
    MacroName,
    /// Verbatim parenthesized parameter list of a function-like macro.
    MacroParams,
    /// Verbatim macro replacement text.
    MacroValue,
    /// A C identifier inside a declaration.
    Ident,
    /// Single-character declaration punctuation: `. * , ( ) ; { }`.
    Punct,
    /// Opaque struct/enum member text between braces.
    MemberBody,
    /// `//` comment through end of line.
    LineComment,
    Newline,
    Whitespace,
}

/// One lexed token with its verbatim source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub pos: Pos,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, pos: Pos) -> Self {
        Self {
            kind,
            text: text.into(),
            pos,
        }
    }
}
