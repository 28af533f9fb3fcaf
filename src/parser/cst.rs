//! Concrete syntax tree for a single header.
//!
//! Nodes keep the verbatim token text they were built from so that
//! prototypes can be reassembled by plain concatenation.

use crate::lexer::token::{Pos, Token};

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCst {
    pub file: String,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub pos: Pos,
    pub node: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Comment(Comment),
    Include(Include),
    Define(Define),
    PreProc(PreProc),
    Decl(Decl),
    Blank,
}

/// One `/** ... */` or `/* ... */` block, line by line.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub lines: Vec<CommentLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentLine {
    pub marker: Marker,
    pub pos: Pos,
    /// Command and value tokens after the marker, in source order.
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    DocOpen,
    Open,
    Cont,
    Close,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Include {
    pub pos: Pos,
    /// Path including its `<...>` or `"..."` delimiters.
    pub path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Define {
    pub pos: Pos,
    pub name: String,
    /// Parameter list including parentheses, when function-like.
    pub params: Option<String>,
    pub value: Option<String>,
}

impl Define {
    /// Reassemble the directive as written, modulo interior spacing.
    pub fn prototype(&self) -> String {
        let mut out = String::from("#define ");
        out.push_str(&self.name);
        if let Some(params) = &self.params {
            out.push_str(params);
        }
        if let Some(value) = &self.value {
            out.push(' ');
            out.push_str(value);
        }
        out
    }
}

/// Any directive other than `#include` and `#define`.
#[derive(Debug, Clone, PartialEq)]
pub struct PreProc {
    pub pos: Pos,
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Struct(TypeDecl),
    Enum(TypeDecl),
    Function(FuncDecl),
    FunctionType(FuncDecl),
}

impl Decl {
    pub fn pos(&self) -> Pos {
        match self {
            Decl::Struct(d) | Decl::Enum(d) => d.pos,
            Decl::Function(d) | Decl::FunctionType(d) => d.pos,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Decl::Struct(d) | Decl::Enum(d) => d.name.as_deref().unwrap_or(""),
            Decl::Function(d) | Decl::FunctionType(d) => &d.name,
        }
    }

    pub fn prototype(&self) -> String {
        match self {
            Decl::Struct(d) | Decl::Enum(d) => d.prototype(),
            Decl::Function(d) | Decl::FunctionType(d) => d.prototype(),
        }
    }
}

/// `typedef struct { ... } name;` or `typedef enum { ... } name;`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub pos: Pos,
    /// Typedef name; enums may omit it.
    pub name: Option<String>,
    /// Verbatim text from `typedef` through the opening brace.
    pub before: String,
    /// Opaque member body between the braces.
    pub body: String,
    /// Verbatim text from the closing brace through the semicolon.
    pub after: String,
}

impl TypeDecl {
    pub fn prototype(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.before);
        out.push_str(&self.body);
        out.push_str(&self.after);
        out
    }
}

/// A function prototype or a `typedef ... (*name)(...)` pointer type.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub pos: Pos,
    /// Verbatim text before the name (return type, or typedef prelude).
    pub before: String,
    pub name: String,
    /// Verbatim text between the name and the argument list.
    pub mid: String,
    /// Argument list including parentheses.
    pub args: String,
    /// Verbatim text from after the argument list through the semicolon.
    pub trailing: String,
}

impl FuncDecl {
    pub fn prototype(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.before);
        out.push_str(&self.name);
        out.push_str(&self.mid);
        out.push_str(&self.args);
        out.push_str(&self.trailing);
        out
    }
}
