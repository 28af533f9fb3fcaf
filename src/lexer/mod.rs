//! Tokenizer for the constrained C header dialect.
//!
//! A state machine with an explicit state stack: Root pushes Comment,
//! PreProc, or Decl on their opening characters; PreProc pushes the Include
//! and Define sub-states; Decl pushes Members on `{`. Each state pops on its
//! own terminator, so context-sensitive runs (comment lines, include paths,
//! member bodies) are captured verbatim without a full C grammar.

pub mod token;

use self::token::{Pos, Token, TokenKind};
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Root,
    Comment,
    PreProc,
    Include,
    Define,
    Decl,
    Members,
}

pub struct Lexer<'a> {
    file: &'a str,
    chars: Vec<char>,
    i: usize,
    line: u32,
    column: u32,
    stack: Vec<State>,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(file: &'a str, source: &str) -> Self {
        Self {
            file,
            chars: source.chars().collect(),
            i: 0,
            line: 1,
            column: 1,
            stack: vec![State::Root],
            tokens: Vec::new(),
        }
    }

    /// Tokenize the whole source, stopping at the first error.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Error> {
        while self.i < self.chars.len() {
            match self.state() {
                State::Root => self.lex_root()?,
                State::Comment => self.lex_comment(),
                State::PreProc => self.lex_preproc()?,
                State::Include => self.lex_include()?,
                State::Define => self.lex_define()?,
                State::Decl => self.lex_decl()?,
                State::Members => self.lex_members(),
            }
        }
        match self.state() {
            // An unfinished declaration is the grammar's problem, not ours.
            State::Root | State::Decl => Ok(self.tokens),
            State::Comment => Err(self.err_here("unterminated comment")),
            State::PreProc | State::Include | State::Define => {
                Err(self.err_here("unterminated preprocessor directive"))
            }
            State::Members => Err(self.err_here("unterminated member body")),
        }
    }

    fn state(&self) -> State {
        self.stack.last().copied().unwrap_or(State::Root)
    }

    fn pos(&self) -> Pos {
        Pos {
            line: self.line,
            column: self.column,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.i).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.i + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.i += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn take_while(&mut self, f: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if !f(c) {
                break;
            }
            self.bump();
            out.push(c);
        }
        out
    }

    fn skip_blanks(&mut self) {
        self.take_while(|c| c == ' ' || c == '\t' || c == '\r');
    }

    fn push(&mut self, kind: TokenKind, text: impl Into<String>, pos: Pos) {
        self.tokens.push(Token::new(kind, text, pos));
    }

    fn err_here(&self, msg: impl Into<String>) -> Error {
        Error::lex(self.file, self.pos(), msg)
    }

    fn err_at(&self, pos: Pos, msg: impl Into<String>) -> Error {
        Error::lex(self.file, pos, msg)
    }

    fn lex_root(&mut self) -> Result<(), Error> {
        let pos = self.pos();
        match self.peek() {
            Some('\n') => {
                self.bump();
                self.push(TokenKind::Newline, "\n", pos);
            }
            Some(' ' | '\t' | '\r') => {
                let text = self.take_while(|c| c == ' ' || c == '\t' || c == '\r');
                self.push(TokenKind::Whitespace, text, pos);
            }
            Some('/') => match (self.peek_at(1), self.peek_at(2)) {
                (Some('*'), Some('*')) => {
                    self.bump();
                    self.bump();
                    self.bump();
                    self.push(TokenKind::DocCommentOpen, "/**", pos);
                    self.stack.push(State::Comment);
                }
                (Some('*'), _) => {
                    self.bump();
                    self.bump();
                    self.push(TokenKind::CommentOpen, "/*", pos);
                    self.stack.push(State::Comment);
                }
                (Some('/'), _) => {
                    let text = self.take_while(|c| c != '\n');
                    self.push(TokenKind::LineComment, text, pos);
                }
                _ => return Err(self.err_at(pos, "unexpected character `/`")),
            },
            Some('*') => {
                if self.peek_at(1) == Some('/') {
                    self.bump();
                    self.bump();
                    self.push(TokenKind::CommentClose, "*/", pos);
                } else {
                    self.bump();
                    self.push(TokenKind::CommentCont, "*", pos);
                }
                self.stack.push(State::Comment);
            }
            Some('#') => {
                self.bump();
                self.push(TokenKind::Hash, "#", pos);
                self.stack.push(State::PreProc);
            }
            Some(c) if is_ident_start(c) => {
                // The declaration state lexes the identifier itself.
                self.stack.push(State::Decl);
            }
            Some(c) => return Err(self.err_at(pos, format!("unexpected character `{c}`"))),
            None => {}
        }
        Ok(())
    }

    /// Comment body: `@`-commands and plain words until the line terminator.
    fn lex_comment(&mut self) {
        let pos = self.pos();
        match self.peek() {
            Some('\n') => {
                self.bump();
                self.push(TokenKind::Newline, "\n", pos);
                self.stack.pop();
            }
            Some(c) if c.is_whitespace() => {
                self.take_while(|c| c != '\n' && c.is_whitespace());
            }
            Some('@') => {
                let text = self.take_while(|c| !c.is_whitespace());
                self.push(TokenKind::CommentCommand, text, pos);
            }
            Some(_) => {
                let text = self.take_while(|c| !c.is_whitespace());
                self.push(TokenKind::CommentValue, text, pos);
            }
            None => {}
        }
    }

    fn lex_preproc(&mut self) -> Result<(), Error> {
        let pos = self.pos();
        match self.peek() {
            Some('\n') => {
                self.bump();
                self.push(TokenKind::Newline, "\n", pos);
                self.stack.pop();
            }
            Some(' ' | '\t' | '\r') => self.skip_blanks(),
            Some(c) if c.is_ascii_alphabetic() => {
                let name = self.take_while(is_ident_char);
                let directive = name.clone();
                self.push(TokenKind::PreProcName, name, pos);
                match directive.as_str() {
                    "include" => self.stack.push(State::Include),
                    "define" => self.stack.push(State::Define),
                    _ => self.lex_preproc_value(),
                }
            }
            Some(c) => return Err(self.err_at(pos, format!("unexpected character `{c}`"))),
            None => {}
        }
        Ok(())
    }

    /// Verbatim directive value through the end of the logical line.
    fn lex_preproc_value(&mut self) {
        self.skip_blanks();
        let pos = self.pos();
        let value = self.take_logical_line();
        if !value.is_empty() {
            self.push(TokenKind::PreProcValue, value, pos);
        }
    }

    /// Consume up to the next unescaped newline; a backslash-newline pair is
    /// captured and the line continues.
    fn take_logical_line(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            if c == '\\' && self.peek_at(1) == Some('\n') {
                self.bump();
                self.bump();
                out.push('\\');
                out.push('\n');
                continue;
            }
            self.bump();
            out.push(c);
        }
        out
    }

    fn lex_include(&mut self) -> Result<(), Error> {
        self.skip_blanks();
        let pos = self.pos();
        let open = match self.peek() {
            Some('<') => '<',
            Some('"') => '"',
            Some('\n') => {
                return Err(self.err_at(pos, "expected an include path after `#include`"))
            }
            Some(c) => {
                return Err(self.err_at(pos, format!("unexpected character `{c}` in include path")))
            }
            None => return Ok(()), // reported as unterminated after the main loop
        };
        let close = if open == '<' { '>' } else { '"' };
        self.bump();
        let mut text = String::new();
        text.push(open);
        loop {
            match self.peek() {
                Some('\n') | None => return Err(self.err_at(pos, "unterminated include path")),
                Some(c) => {
                    self.bump();
                    text.push(c);
                    if c == close {
                        break;
                    }
                }
            }
        }
        self.push(TokenKind::IncludePath, text, pos);
        self.stack.pop();
        Ok(())
    }

    fn lex_define(&mut self) -> Result<(), Error> {
        self.skip_blanks();
        let pos = self.pos();
        match self.peek() {
            Some(c) if is_ident_start(c) => {}
            Some('\n') | None => {
                // Missing macro name: the parser reports it against the directive.
                self.stack.pop();
                return Ok(());
            }
            Some(c) => {
                return Err(self.err_at(pos, format!("unexpected character `{c}` in macro definition")))
            }
        }
        let name = self.take_while(is_ident_char);
        self.push(TokenKind::MacroName, name, pos);

        // A parameter list only counts when it hugs the macro name.
        if self.peek() == Some('(') {
            let ppos = self.pos();
            let mut params = String::new();
            loop {
                match self.peek() {
                    Some('\n') | None => {
                        return Err(self.err_at(ppos, "unterminated macro parameter list"))
                    }
                    Some(c) => {
                        self.bump();
                        params.push(c);
                        if c == ')' {
                            break;
                        }
                    }
                }
            }
            self.push(TokenKind::MacroParams, params, ppos);
        }

        self.skip_blanks();
        let vpos = self.pos();
        let value = self.take_logical_line();
        if !value.is_empty() {
            self.push(TokenKind::MacroValue, value, vpos);
        }
        self.stack.pop();
        Ok(())
    }

    fn lex_decl(&mut self) -> Result<(), Error> {
        let pos = self.pos();
        match self.peek() {
            Some('\n') => {
                self.bump();
                self.push(TokenKind::Newline, "\n", pos);
            }
            Some(' ' | '\t' | '\r') => {
                let text = self.take_while(|c| c == ' ' || c == '\t' || c == '\r');
                self.push(TokenKind::Whitespace, text, pos);
            }
            Some(c) if is_ident_start(c) => {
                let text = self.take_while(is_ident_char);
                self.push(TokenKind::Ident, text, pos);
            }
            Some(c @ ('.' | ',' | '*' | '(' | ')')) => {
                self.bump();
                self.push(TokenKind::Punct, c.to_string(), pos);
            }
            Some(';') => {
                self.bump();
                self.push(TokenKind::Punct, ";", pos);
                self.stack.pop();
            }
            Some('{') => {
                self.bump();
                self.push(TokenKind::Punct, "{", pos);
                self.stack.push(State::Members);
            }
            Some(c) => return Err(self.err_at(pos, format!("unexpected character `{c}`"))),
            None => {}
        }
        Ok(())
    }

    /// Opaque member body up to the first unescaped `}`. Nested braces are
    /// not supported.
    fn lex_members(&mut self) {
        let pos = self.pos();
        let mut body = String::new();
        loop {
            match self.peek() {
                None => return, // reported as unterminated after the main loop
                Some('}') => break,
                Some('\\') => {
                    self.bump();
                    body.push('\\');
                    if let Some(c) = self.bump() {
                        body.push(c);
                    }
                }
                Some(c) => {
                    self.bump();
                    body.push(c);
                }
            }
        }
        self.push(TokenKind::MemberBody, body, pos);
        let bpos = self.pos();
        self.bump();
        self.push(TokenKind::Punct, "}", bpos);
        self.stack.pop();
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::token::TokenKind::*;
    use super::*;
    use crate::error::ErrorKind;

    fn lex(src: &str) -> Vec<Token> {
        Lexer::new("test.h", src).tokenize().unwrap()
    }

    fn lex_err(src: &str) -> Error {
        Lexer::new("test.h", src).tokenize().unwrap_err()
    }

    #[test]
    fn doc_comment_line_markers() {
        let toks = lex("/** @file\n * words here\n */\n");
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DocCommentOpen,
                CommentCommand,
                Newline,
                Whitespace,
                CommentCont,
                CommentValue,
                CommentValue,
                Newline,
                Whitespace,
                CommentClose,
                Newline,
            ]
        );
        assert_eq!(toks[1].text, "@file");
        assert_eq!(toks[5].text, "words");
    }

    #[test]
    fn plain_comment_open_is_distinct() {
        let toks = lex("/* internal\n */\n");
        assert_eq!(toks[0].kind, CommentOpen);
        assert_eq!(toks[1].text, "internal");
    }

    #[test]
    fn commands_keep_their_brackets() {
        let toks = lex("/** @param[in,out] buf data\n */\n");
        assert_eq!(toks[1].kind, CommentCommand);
        assert_eq!(toks[1].text, "@param[in,out]");
        assert_eq!(toks[2].kind, CommentValue);
        assert_eq!(toks[2].text, "buf");
    }

    #[test]
    fn declaration_is_captured_verbatim() {
        let src = "int add(int a, int b);\n";
        let toks = lex(src);
        let joined: String = toks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(joined, src);
        assert_eq!(toks[0].kind, Ident);
        assert_eq!(toks[3].kind, Punct);
        assert_eq!(toks[3].text, "(");
    }

    #[test]
    fn include_path_keeps_delimiters() {
        let toks = lex("#include <math.h>\n#include \"shapes.h\"\n");
        assert_eq!(toks[2].kind, IncludePath);
        assert_eq!(toks[2].text, "<math.h>");
        assert_eq!(toks[6].text, "\"shapes.h\"");
        assert_eq!(toks[4].pos.line, 2);
        assert_eq!(toks[4].pos.column, 1);
    }

    #[test]
    fn function_like_macro() {
        let toks = lex("#define GEO_SCALE(x) ((x) * 2)\n");
        assert_eq!(toks[2].kind, MacroName);
        assert_eq!(toks[2].text, "GEO_SCALE");
        assert_eq!(toks[3].kind, MacroParams);
        assert_eq!(toks[3].text, "(x)");
        assert_eq!(toks[4].kind, MacroValue);
        assert_eq!(toks[4].text, "((x) * 2)");
    }

    #[test]
    fn object_macro_has_no_params() {
        let toks = lex("#define GEO_PI 3.14159\n");
        assert_eq!(toks[2].kind, MacroName);
        assert_eq!(toks[3].kind, MacroValue);
        assert_eq!(toks[3].text, "3.14159");
    }

    #[test]
    fn backslash_continues_macro_value() {
        let toks = lex("#define X a \\\n b\n");
        assert_eq!(toks[3].kind, MacroValue);
        assert_eq!(toks[3].text, "a \\\n b");
        assert_eq!(toks[4].kind, Newline);
    }

    #[test]
    fn conditional_directives_take_values() {
        let toks = lex("#ifdef FOO\n#endif\n");
        assert_eq!(toks[1].kind, PreProcName);
        assert_eq!(toks[1].text, "ifdef");
        assert_eq!(toks[2].kind, PreProcValue);
        assert_eq!(toks[2].text, "FOO");
        assert_eq!(toks[5].text, "endif");
        assert_eq!(toks[6].kind, Newline);
    }

    #[test]
    fn member_body_is_opaque() {
        let toks = lex("typedef struct {\n    double x;\n} geo_point;\n");
        let body = toks.iter().find(|t| t.kind == MemberBody).unwrap();
        assert_eq!(body.text, "\n    double x;\n");
    }

    #[test]
    fn line_comments_lex_to_end_of_line() {
        let toks = lex("// note\nint f(void);\n");
        assert_eq!(toks[0].kind, LineComment);
        assert_eq!(toks[0].text, "// note");
        assert_eq!(toks[1].kind, Newline);
    }

    #[test]
    fn unexpected_character_has_position() {
        let err = lex_err("int x[3];\n");
        assert_eq!((err.line, err.column), (1, 6));
        assert!(matches!(err.kind, ErrorKind::Lex(_)));
    }

    #[test]
    fn unterminated_comment_at_eof() {
        let err = lex_err("/** dangling");
        assert!(err.to_string().contains("unterminated comment"));
    }

    #[test]
    fn unterminated_include_path() {
        let err = lex_err("#include <math.h\n");
        assert!(err.to_string().contains("unterminated include path"));
    }

    #[test]
    fn unterminated_member_body() {
        let err = lex_err("typedef struct {int x;\n");
        assert!(err.to_string().contains("unterminated member body"));
    }

    #[test]
    fn unterminated_directive_at_eof() {
        let err = lex_err("#pragma once");
        assert!(err.to_string().contains("unterminated preprocessor directive"));
    }
}
