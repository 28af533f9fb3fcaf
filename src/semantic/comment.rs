//! Doc comment lines: classification, inline markup, and the description
//! state machine.
//!
//! The machine keeps one open wrapper (paragraph, parameter table, or
//! warning block). Each wrapper is closed by the first line kind that does
//! not extend it, so the transition table lives here in one place.

use crate::error::Error;
use crate::lexer::token::{Pos, Token, TokenKind};
use crate::slug::slug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    In,
    Out,
    InOut,
}

impl ParamKind {
    pub fn label(self) -> &'static str {
        match self {
            ParamKind::In => "in",
            ParamKind::Out => "out",
            ParamKind::InOut => "in,out",
        }
    }

    fn index(self) -> usize {
        match self {
            ParamKind::In => 0,
            ParamKind::Out => 1,
            ParamKind::InOut => 2,
        }
    }
}

/// One content line of a doc block, inline markup already rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum DescLine {
    Blank,
    Text(String),
    Brief(String),
    Warning(String),
    Returns(String),
    Param {
        kind: ParamKind,
        name: String,
        text: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wrap {
    None,
    Para,
    Table,
    Warning,
}

/// Accumulates the HTML description of one doc block.
pub struct DescriptionMachine<'a> {
    file: &'a str,
    out: String,
    wrap: Wrap,
    wrote_content: bool,
    params_closed: bool,
    seen_brief: bool,
    seen_warning: bool,
    seen_returns: bool,
    seen_param: [bool; 3],
}

impl<'a> DescriptionMachine<'a> {
    pub fn new(file: &'a str) -> Self {
        Self {
            file,
            out: String::new(),
            wrap: Wrap::None,
            wrote_content: false,
            params_closed: false,
            seen_brief: false,
            seen_warning: false,
            seen_returns: false,
            seen_param: [false; 3],
        }
    }

    pub fn push(&mut self, line: DescLine, pos: Pos) -> Result<(), Error> {
        let is_blank = matches!(line, DescLine::Blank);
        match line {
            DescLine::Blank => self.close_wrap(),
            DescLine::Text(html) => match self.wrap {
                // Warning continuations stay inside the open div.
                Wrap::Para | Wrap::Warning => {
                    self.out.push(' ');
                    self.out.push_str(&html);
                }
                _ => {
                    self.close_wrap();
                    self.out.push_str("<p>");
                    self.out.push_str(&html);
                    self.wrap = Wrap::Para;
                }
            },
            DescLine::Brief(html) => {
                if self.seen_brief {
                    return Err(self.err(pos, "duplicate `@brief`"));
                }
                if self.wrote_content {
                    return Err(self.err(pos, "`@brief` must be the first content in its block"));
                }
                self.seen_brief = true;
                self.out.push_str("<p>");
                self.out.push_str(&html);
                self.wrap = Wrap::Para;
            }
            DescLine::Warning(html) => {
                if self.seen_warning {
                    return Err(self.err(pos, "duplicate `@warning`"));
                }
                self.seen_warning = true;
                self.close_wrap();
                self.out.push_str("<div class=\"warning\">");
                self.out.push_str(&html);
                self.wrap = Wrap::Warning;
            }
            DescLine::Returns(html) => {
                if self.seen_returns {
                    return Err(self.err(pos, "duplicate `@returns`"));
                }
                self.seen_returns = true;
                self.close_wrap();
                self.out.push_str("<div class=\"returns\"><b>Returns:</b>");
                if !html.is_empty() {
                    self.out.push(' ');
                    self.out.push_str(&html);
                }
                self.out.push_str("</div>\n");
            }
            DescLine::Param { kind, name, text } => {
                if self.seen_param[kind.index()] {
                    return Err(self.err(pos, format!("duplicate `@param[{}]`", kind.label())));
                }
                self.seen_param[kind.index()] = true;
                if self.wrap != Wrap::Table {
                    if self.params_closed {
                        return Err(self.err(pos, "`@param` lines must be grouped together"));
                    }
                    self.close_wrap();
                    self.out.push_str("<table class=\"params\">\n");
                    self.wrap = Wrap::Table;
                }
                self.out.push_str(&format!(
                    "<tr><td class=\"dir\">[{}]</td><td><code>{}</code></td><td>{}</td></tr>\n",
                    kind.label(),
                    name,
                    text
                ));
            }
        }
        if !is_blank {
            self.wrote_content = true;
        }
        Ok(())
    }

    pub fn finish(mut self) -> String {
        self.close_wrap();
        self.out
    }

    fn close_wrap(&mut self) {
        match self.wrap {
            Wrap::None => {}
            Wrap::Para => self.out.push_str("</p>\n"),
            Wrap::Table => {
                self.out.push_str("</table>\n");
                self.params_closed = true;
            }
            Wrap::Warning => self.out.push_str("</div>\n"),
        }
        self.wrap = Wrap::None;
    }

    fn err(&self, pos: Pos, msg: impl Into<String>) -> Error {
        Error::semantic(self.file, pos, msg)
    }
}

/// What a raw comment line means to the builder.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified<'a> {
    Empty,
    Text(&'a [Token]),
    Brief(&'a [Token]),
    Warning(&'a [Token]),
    Returns(&'a [Token]),
    Param(ParamKind, &'a [Token]),
    File(&'a [Token]),
    Name(&'a [Token]),
    SectionOpen,
    SectionClose,
}

/// Dispatch on the first token. The command vocabulary is closed; anything
/// else starting with `@` is an error.
pub fn classify_line<'a>(file: &str, tokens: &'a [Token]) -> Result<Classified<'a>, Error> {
    let Some(first) = tokens.first() else {
        return Ok(Classified::Empty);
    };
    if first.kind != TokenKind::CommentCommand {
        return Ok(Classified::Text(tokens));
    }
    let rest = &tokens[1..];
    match first.text.as_str() {
        "@file" => {
            reject_commands(file, rest)?;
            Ok(Classified::File(rest))
        }
        "@brief" => Ok(Classified::Brief(rest)),
        "@name" => {
            reject_commands(file, rest)?;
            Ok(Classified::Name(rest))
        }
        "@warning" => Ok(Classified::Warning(rest)),
        "@returns" => Ok(Classified::Returns(rest)),
        "@param[in]" => Ok(Classified::Param(ParamKind::In, rest)),
        "@param[out]" => Ok(Classified::Param(ParamKind::Out, rest)),
        "@param[in,out]" => Ok(Classified::Param(ParamKind::InOut, rest)),
        "@{" => {
            reject_commands(file, rest)?;
            Ok(Classified::SectionOpen)
        }
        "@}" => {
            reject_commands(file, rest)?;
            Ok(Classified::SectionClose)
        }
        "@ref" | "@b" | "@c" => Ok(Classified::Text(tokens)),
        other => Err(Error::semantic(
            file,
            first.pos,
            format!("unsupported command `{other}`"),
        )),
    }
}

/// `@file`, `@name`, and the section markers take plain-word arguments that
/// never pass through `render_inline`, so the command vocabulary is
/// enforced on them here.
fn reject_commands(file: &str, tokens: &[Token]) -> Result<(), Error> {
    for tok in tokens {
        if tok.kind != TokenKind::CommentCommand {
            continue;
        }
        let msg = if is_line_opener(&tok.text) {
            format!("`{}` must be the first token on its line", tok.text)
        } else {
            format!("unsupported command `{}`", tok.text)
        };
        return Err(Error::semantic(file, tok.pos, msg));
    }
    Ok(())
}

fn is_line_opener(text: &str) -> bool {
    matches!(
        text,
        "@file" | "@brief" | "@name" | "@warning" | "@returns" | "@param[in]"
            | "@param[out]" | "@param[in,out]" | "@{" | "@}"
    )
}

/// Render value tokens to HTML, expanding `@ref`, `@b`, and `@c`. An inline
/// command without a following word is dropped.
pub fn render_inline(file: &str, tokens: &[Token]) -> Result<String, Error> {
    let mut parts: Vec<String> = Vec::new();
    let mut i = 0;
    while let Some(tok) = tokens.get(i) {
        i += 1;
        match tok.kind {
            TokenKind::CommentValue => parts.push(html_escape(&tok.text)),
            TokenKind::CommentCommand => match tok.text.as_str() {
                "@b" | "@c" => {
                    let tag = if tok.text == "@b" { "b" } else { "code" };
                    if let Some(next) = tokens.get(i).filter(|t| t.kind == TokenKind::CommentValue)
                    {
                        parts.push(format!("<{tag}>{}</{tag}>", html_escape(&next.text)));
                        i += 1;
                    }
                }
                "@ref" => {
                    if let Some(next) = tokens.get(i).filter(|t| t.kind == TokenKind::CommentValue)
                    {
                        let (word, tail) = split_trailing_punct(&next.text);
                        let anchor = slug(word);
                        if anchor.is_empty() {
                            parts.push(format!("{}{tail}", html_escape(word)));
                        } else {
                            parts.push(format!(
                                "<a href=\"#{anchor}\">{}</a>{tail}",
                                html_escape(word)
                            ));
                        }
                        i += 1;
                    }
                }
                other if is_line_opener(other) => {
                    return Err(Error::semantic(
                        file,
                        tok.pos,
                        format!("`{other}` must be the first token on its line"),
                    ));
                }
                other => {
                    return Err(Error::semantic(
                        file,
                        tok.pos,
                        format!("unsupported command `{other}`"),
                    ));
                }
            },
            _ => {}
        }
    }
    Ok(parts.join(" "))
}

/// A reference ending in `.`, `,`, or `;` links the bare name and keeps the
/// punctuation outside the anchor.
fn split_trailing_punct(word: &str) -> (&str, &str) {
    match word.char_indices().last() {
        Some((idx, c)) if matches!(c, '.' | ',' | ';') => (&word[..idx], &word[idx..]),
        _ => (word, ""),
    }
}

pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
