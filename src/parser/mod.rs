//! Grammar for the header dialect.
//!
//! Alternatives are tried in a fixed order with bounded lookahead and no
//! backtracking: comment block, include, define, other directive,
//! declaration, blank line. Declarations dispatch on their first two
//! meaningful tokens into struct, enum, function pointer typedef, or plain
//! function prototype.

pub mod cst;

use self::cst::{
    Comment, CommentLine, Decl, Define, Entry, FuncDecl, HeaderCst, Include, Marker, Node,
    PreProc, TypeDecl,
};
use crate::error::Error;
use crate::lexer::token::{Pos, Token, TokenKind};

pub fn parse(file: &str, tokens: Vec<Token>) -> Result<HeaderCst, Error> {
    let parser = Parser { file, tokens, i: 0 };
    parser.run()
}

struct Parser<'a> {
    file: &'a str,
    tokens: Vec<Token>,
    i: usize,
}

impl<'a> Parser<'a> {
    fn run(mut self) -> Result<HeaderCst, Error> {
        let mut entries = Vec::new();
        while let Some(tok) = self.peek().cloned() {
            let pos = tok.pos;
            match tok.kind {
                TokenKind::Whitespace | TokenKind::LineComment => {
                    self.i += 1;
                }
                TokenKind::Newline => {
                    self.i += 1;
                    entries.push(Entry { pos, node: Node::Blank });
                }
                TokenKind::DocCommentOpen
                | TokenKind::CommentOpen
                | TokenKind::CommentCont
                | TokenKind::CommentClose => {
                    let node = self.comment_entry();
                    entries.push(Entry { pos, node });
                }
                TokenKind::Hash => {
                    let node = self.preproc_entry(pos)?;
                    entries.push(Entry { pos, node });
                }
                TokenKind::Ident => {
                    let node = self.decl_entry(pos)?;
                    entries.push(Entry { pos, node });
                }
                _ => return Err(self.err_at(pos, format!("unexpected token `{}`", tok.text))),
            }
        }
        Ok(HeaderCst {
            file: self.file.to_owned(),
            entries,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.i)
    }

    fn bump(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.i).cloned();
        if tok.is_some() {
            self.i += 1;
        }
        tok
    }

    fn eof_pos(&self) -> Pos {
        self.tokens
            .last()
            .map(|t| t.pos)
            .unwrap_or(Pos { line: 1, column: 1 })
    }

    fn err_at(&self, pos: Pos, msg: impl Into<String>) -> Error {
        Error::syntax(self.file, pos, msg)
    }

    fn err_eof(&self) -> Error {
        Error::syntax(self.file, self.eof_pos(), "unexpected end of file in declaration")
    }

    /// Text of the nth upcoming token, ignoring layout.
    fn nth_meaningful_text(&self, n: usize) -> Option<String> {
        self.tokens[self.i..]
            .iter()
            .filter(|t| !matches!(t.kind, TokenKind::Whitespace | TokenKind::Newline))
            .nth(n)
            .map(|t| t.text.clone())
    }

    fn take_kind(&mut self, kind: TokenKind) -> Option<String> {
        if self.peek().map(|t| t.kind) == Some(kind) {
            self.bump().map(|t| t.text)
        } else {
            None
        }
    }

    /// Append whitespace and newline tokens verbatim to `out`.
    fn take_layout(&mut self, out: &mut String) {
        while let Some(tok) = self.peek() {
            match tok.kind {
                TokenKind::Whitespace | TokenKind::Newline => {
                    out.push_str(&tok.text);
                    self.i += 1;
                }
                _ => break,
            }
        }
    }

    fn expect_line_end(&mut self) -> Result<(), Error> {
        match self.bump() {
            Some(t) if t.kind == TokenKind::Newline => Ok(()),
            Some(t) => Err(self.err_at(t.pos, "expected end of line")),
            None => Ok(()),
        }
    }

    /// Consecutive comment lines form one block. A fresh opener starts a new
    /// block; a close marker ends the current one.
    fn comment_entry(&mut self) -> Node {
        let mut lines = Vec::new();
        while let Some(tok) = self.peek() {
            // Leading indentation before a marker stays outside the block.
            if tok.kind == TokenKind::Whitespace {
                self.i += 1;
                continue;
            }
            let marker = match tok.kind {
                TokenKind::DocCommentOpen => Marker::DocOpen,
                TokenKind::CommentOpen => Marker::Open,
                TokenKind::CommentCont => Marker::Cont,
                TokenKind::CommentClose => Marker::Close,
                _ => break,
            };
            if !lines.is_empty() && matches!(marker, Marker::DocOpen | Marker::Open) {
                break;
            }
            let pos = tok.pos;
            self.i += 1;
            let mut tokens = Vec::new();
            while let Some(t) = self.peek() {
                match t.kind {
                    TokenKind::CommentCommand | TokenKind::CommentValue => {
                        tokens.push(t.clone());
                        self.i += 1;
                    }
                    TokenKind::Newline => {
                        self.i += 1;
                        break;
                    }
                    _ => break,
                }
            }
            lines.push(CommentLine { marker, pos, tokens });
            if marker == Marker::Close {
                break;
            }
        }
        Node::Comment(Comment { lines })
    }

    fn preproc_entry(&mut self, pos: Pos) -> Result<Node, Error> {
        self.i += 1; // `#`
        let name = match self.bump() {
            Some(t) if t.kind == TokenKind::PreProcName => t,
            Some(t) => {
                return Err(self.err_at(t.pos, "expected a preprocessor directive after `#`"))
            }
            None => return Err(self.err_at(pos, "expected a preprocessor directive after `#`")),
        };
        let node = match name.text.as_str() {
            "include" => {
                let path = match self.bump() {
                    Some(t) if t.kind == TokenKind::IncludePath => t.text,
                    Some(t) => return Err(self.err_at(t.pos, "expected an include path")),
                    None => return Err(self.err_at(name.pos, "expected an include path")),
                };
                Node::Include(Include { pos, path })
            }
            "define" => {
                let mac = match self.bump() {
                    Some(t) if t.kind == TokenKind::MacroName => t,
                    Some(t) => {
                        return Err(self.err_at(t.pos, "expected a macro name after `#define`"))
                    }
                    None => {
                        return Err(self.err_at(name.pos, "expected a macro name after `#define`"))
                    }
                };
                let params = self.take_kind(TokenKind::MacroParams);
                let value = self.take_kind(TokenKind::MacroValue);
                Node::Define(Define {
                    pos,
                    name: mac.text,
                    params,
                    value,
                })
            }
            "pragma" | "if" | "ifdef" | "ifndef" | "elif" | "error" => {
                let value = self.take_kind(TokenKind::PreProcValue);
                Node::PreProc(PreProc {
                    pos,
                    name: name.text,
                    value,
                })
            }
            "else" | "endif" => {
                if let Some(t) = self.peek() {
                    if t.kind == TokenKind::PreProcValue {
                        return Err(
                            self.err_at(t.pos, format!("`#{}` takes no value", name.text))
                        );
                    }
                }
                Node::PreProc(PreProc {
                    pos,
                    name: name.text,
                    value: None,
                })
            }
            other => {
                return Err(
                    self.err_at(name.pos, format!("unknown preprocessor directive `{other}`"))
                )
            }
        };
        self.expect_line_end()?;
        Ok(node)
    }

    fn decl_entry(&mut self, pos: Pos) -> Result<Node, Error> {
        let decl = if self.nth_meaningful_text(0).as_deref() == Some("typedef") {
            match self.nth_meaningful_text(1).as_deref() {
                Some("struct") => Decl::Struct(self.type_decl(pos, "struct")?),
                Some("enum") => Decl::Enum(self.type_decl(pos, "enum")?),
                _ => Decl::FunctionType(self.functype_decl(pos)?),
            }
        } else {
            Decl::Function(self.func_decl(pos)?)
        };
        Ok(Node::Decl(decl))
    }

    /// `typedef struct { ... } name;` and the enum equivalent. Only the enum
    /// form may omit the name.
    fn type_decl(&mut self, pos: Pos, keyword: &str) -> Result<TypeDecl, Error> {
        let mut before = String::new();
        loop {
            let Some(tok) = self.peek() else {
                return Err(self.err_eof());
            };
            match tok.kind {
                TokenKind::Ident | TokenKind::Whitespace | TokenKind::Newline => {
                    before.push_str(&tok.text);
                    self.i += 1;
                }
                TokenKind::Punct if tok.text == "{" => {
                    before.push_str(&tok.text);
                    self.i += 1;
                    break;
                }
                _ => {
                    return Err(self.err_at(
                        tok.pos,
                        format!("unexpected token `{}` in {keyword} typedef", tok.text),
                    ))
                }
            }
        }
        let body = match self.bump() {
            Some(t) if t.kind == TokenKind::MemberBody => t.text,
            Some(t) => return Err(self.err_at(t.pos, format!("unexpected token `{}`", t.text))),
            None => return Err(self.err_eof()),
        };
        let mut after = String::new();
        match self.bump() {
            Some(t) if t.kind == TokenKind::Punct && t.text == "}" => after.push_str(&t.text),
            Some(t) => return Err(self.err_at(t.pos, format!("unexpected token `{}`", t.text))),
            None => return Err(self.err_eof()),
        }
        let mut name = None;
        let mut end = pos;
        loop {
            let Some(tok) = self.peek() else {
                return Err(self.err_eof());
            };
            match tok.kind {
                TokenKind::Whitespace | TokenKind::Newline => {
                    after.push_str(&tok.text);
                    self.i += 1;
                }
                TokenKind::Ident if name.is_none() => {
                    name = Some(tok.text.clone());
                    after.push_str(&tok.text);
                    self.i += 1;
                }
                TokenKind::Punct if tok.text == ";" => {
                    end = tok.pos;
                    after.push_str(&tok.text);
                    self.i += 1;
                    break;
                }
                _ => {
                    return Err(self.err_at(
                        tok.pos,
                        format!("unexpected token `{}` after `}}`", tok.text),
                    ))
                }
            }
        }
        if keyword == "struct" && name.is_none() {
            return Err(self.err_at(end, "struct typedef requires a name"));
        }
        Ok(TypeDecl {
            pos,
            name,
            before,
            body,
            after,
        })
    }

    /// A plain prototype: everything up to `(` is the return type plus the
    /// function name, the last identifier being the name.
    fn func_decl(&mut self, pos: Pos) -> Result<FuncDecl, Error> {
        let mut pre: Vec<Token> = Vec::new();
        loop {
            let Some(tok) = self.peek() else {
                return Err(self.err_eof());
            };
            match tok.kind {
                TokenKind::Ident | TokenKind::Whitespace | TokenKind::Newline => {
                    pre.push(tok.clone());
                    self.i += 1;
                }
                TokenKind::Punct if tok.text == "*" => {
                    pre.push(tok.clone());
                    self.i += 1;
                }
                TokenKind::Punct if tok.text == "(" => break,
                _ => {
                    return Err(self.err_at(
                        tok.pos,
                        format!("unexpected token `{}` in function declaration", tok.text),
                    ))
                }
            }
        }
        let name_idx = pre
            .iter()
            .rposition(|t| t.kind == TokenKind::Ident)
            .ok_or_else(|| self.err_at(pos, "expected a function name"))?;
        if pre[name_idx + 1..]
            .iter()
            .any(|t| !matches!(t.kind, TokenKind::Whitespace | TokenKind::Newline))
        {
            return Err(self.err_at(pre[name_idx].pos, "expected `(` after the function name"));
        }
        if !pre[..name_idx].iter().any(|t| t.kind == TokenKind::Ident) {
            return Err(
                self.err_at(pre[name_idx].pos, "function declaration is missing a return type")
            );
        }
        let before: String = pre[..name_idx].iter().map(|t| t.text.as_str()).collect();
        let name = pre[name_idx].text.clone();
        let mid: String = pre[name_idx + 1..].iter().map(|t| t.text.as_str()).collect();
        let args = self.paren_run(pos)?;
        let trailing = self.decl_trailing()?;
        Ok(FuncDecl {
            pos,
            before,
            name,
            mid,
            args,
            trailing,
        })
    }

    /// `typedef <type> (*name)(args);`
    fn functype_decl(&mut self, pos: Pos) -> Result<FuncDecl, Error> {
        let mut before = String::new();
        let mut idents = 0;
        loop {
            let Some(tok) = self.peek() else {
                return Err(self.err_eof());
            };
            match tok.kind {
                TokenKind::Ident => {
                    idents += 1;
                    before.push_str(&tok.text);
                    self.i += 1;
                }
                TokenKind::Whitespace | TokenKind::Newline => {
                    before.push_str(&tok.text);
                    self.i += 1;
                }
                TokenKind::Punct if tok.text == "*" => {
                    before.push_str(&tok.text);
                    self.i += 1;
                }
                TokenKind::Punct if tok.text == "(" => {
                    before.push_str(&tok.text);
                    self.i += 1;
                    break;
                }
                _ => {
                    return Err(self.err_at(
                        tok.pos,
                        format!("unexpected token `{}` in function pointer typedef", tok.text),
                    ))
                }
            }
        }
        // `typedef` itself is the first identifier.
        if idents < 2 {
            return Err(self.err_at(pos, "function pointer typedef is missing a return type"));
        }
        self.take_layout(&mut before);
        match self.bump() {
            Some(t) if t.kind == TokenKind::Punct && t.text == "*" => before.push_str(&t.text),
            Some(t) => {
                return Err(
                    self.err_at(t.pos, "expected `*` after `(` in a function pointer typedef")
                )
            }
            None => return Err(self.err_eof()),
        }
        self.take_layout(&mut before);
        let name = match self.bump() {
            Some(t) if t.kind == TokenKind::Ident => t.text,
            Some(t) => {
                return Err(self.err_at(t.pos, "expected a name in the function pointer typedef"))
            }
            None => return Err(self.err_eof()),
        };
        let mut mid = String::new();
        self.take_layout(&mut mid);
        match self.bump() {
            Some(t) if t.kind == TokenKind::Punct && t.text == ")" => mid.push_str(&t.text),
            Some(t) => {
                return Err(self.err_at(t.pos, "expected `)` after the function pointer name"))
            }
            None => return Err(self.err_eof()),
        }
        self.take_layout(&mut mid);
        let args = self.paren_run(pos)?;
        let trailing = self.decl_trailing()?;
        Ok(FuncDecl {
            pos,
            before,
            name,
            mid,
            args,
            trailing,
        })
    }

    /// Verbatim argument list from `(` through its matching `)`.
    fn paren_run(&mut self, pos: Pos) -> Result<String, Error> {
        let mut out = String::new();
        let mut depth = 0u32;
        loop {
            let Some(tok) = self.bump() else {
                return Err(self.err_at(pos, "unterminated argument list"));
            };
            match tok.kind {
                TokenKind::Punct if tok.text == "(" => {
                    depth += 1;
                    out.push_str(&tok.text);
                }
                _ if depth == 0 => {
                    return Err(
                        self.err_at(tok.pos, "expected `(` to open the argument list")
                    )
                }
                TokenKind::Punct if tok.text == ")" => {
                    depth -= 1;
                    out.push_str(&tok.text);
                    if depth == 0 {
                        break;
                    }
                }
                _ => out.push_str(&tok.text),
            }
        }
        Ok(out)
    }

    /// Layout after the argument list, through the terminating semicolon.
    fn decl_trailing(&mut self) -> Result<String, Error> {
        let mut out = String::new();
        loop {
            let Some(tok) = self.bump() else {
                return Err(self.err_at(self.eof_pos(), "expected `;` after the declaration"));
            };
            match tok.kind {
                TokenKind::Whitespace | TokenKind::Newline => out.push_str(&tok.text),
                TokenKind::Punct if tok.text == ";" => {
                    out.push_str(&tok.text);
                    return Ok(out);
                }
                _ => return Err(self.err_at(tok.pos, "expected `;` after the declaration")),
            }
        }
    }
}
