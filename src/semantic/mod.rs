//! Semantic pass from header CSTs to the documentation model.
//!
//! Walks each header's entries in order, carrying a pending description, a
//! pending section, and the currently open section. Runs only once the whole
//! batch has parsed, because include links need the complete header name set.

mod comment;

use std::collections::HashSet;
use std::mem;

use self::comment::{
    classify_line, html_escape, render_inline, Classified, DescLine, DescriptionMachine,
};
use crate::error::Error;
use crate::highlight::Highlighter;
use crate::lexer::token::{Pos, TokenKind};
use crate::model::{EntryCtx, EntryGroups, HeaderCtx, SectionCtx};
use crate::parser::cst::{Comment, Decl, HeaderCst, Marker, Node};
use crate::slug::slug;

/// A parsed header plus the permalink base for its entries.
pub struct ParsedHeader {
    pub cst: HeaderCst,
    pub source_url: String,
}

/// Build the documentation model for a whole batch.
pub fn build(headers: &[ParsedHeader], highlighter: &Highlighter) -> Result<Vec<HeaderCtx>, Error> {
    let names: HashSet<&str> = headers.iter().map(|h| h.cst.file.as_str()).collect();
    headers
        .iter()
        .map(|h| build_header(h, &names, highlighter))
        .collect()
}

fn build_header(
    header: &ParsedHeader,
    names: &HashSet<&str>,
    highlighter: &Highlighter,
) -> Result<HeaderCtx, Error> {
    let file = header.cst.file.as_str();
    let mut ctx = HeaderCtx {
        id: slug(file),
        name: file.to_owned(),
        ..HeaderCtx::default()
    };
    let mut pending_desc = String::new();
    let mut pending_section: Option<SectionCtx> = None;
    let mut current: Option<SectionCtx> = None;

    for entry in &header.cst.entries {
        match &entry.node {
            Node::Comment(comment) => {
                process_block(
                    file,
                    comment,
                    &mut ctx,
                    &mut pending_desc,
                    &mut pending_section,
                    &mut current,
                )?;
            }
            Node::Include(inc) => {
                ctx.includes.push(render_include(&inc.path, names));
            }
            Node::Define(def) => {
                let entry_ctx = EntryCtx {
                    id: slug(&def.name),
                    kind: "Define".to_owned(),
                    name: def.name.clone(),
                    prototype: highlight(file, highlighter, &def.prototype(), def.pos)?,
                    description: mem::take(&mut pending_desc),
                    permalink: permalink(&header.source_url, def.pos.line),
                };
                groups_mut(&mut ctx, &mut current).defines.push(entry_ctx);
            }
            Node::Decl(decl) => {
                let name = decl.name().to_owned();
                let entry_ctx = EntryCtx {
                    id: slug(&name),
                    kind: kind_label(decl).to_owned(),
                    name,
                    prototype: highlight(file, highlighter, &decl.prototype(), decl.pos())?,
                    description: mem::take(&mut pending_desc),
                    permalink: permalink(&header.source_url, decl.pos().line),
                };
                let groups = groups_mut(&mut ctx, &mut current);
                match decl {
                    Decl::Struct(_) => groups.structs.push(entry_ctx),
                    Decl::Enum(_) => groups.enums.push(entry_ctx),
                    Decl::Function(_) => groups.functions.push(entry_ctx),
                    Decl::FunctionType(_) => groups.function_types.push(entry_ctx),
                }
            }
            Node::PreProc(_) | Node::Blank => {}
        }
    }
    if let Some(section) = current.take() {
        ctx.sections.push(section);
    }
    Ok(ctx)
}

enum SectionAction {
    Open,
    Close,
}

/// One doc comment block. Content lines feed the description machine;
/// `@file` and `@name` route the finished description, `@{`/`@}` run last.
fn process_block(
    file: &str,
    comment: &Comment,
    ctx: &mut HeaderCtx,
    pending_desc: &mut String,
    pending_section: &mut Option<SectionCtx>,
    current: &mut Option<SectionCtx>,
) -> Result<(), Error> {
    let Some(first) = comment.lines.first() else {
        return Ok(());
    };
    match first.marker {
        Marker::DocOpen => {}
        // Plain `/* ... */` blocks carry no documentation.
        Marker::Open => return Ok(()),
        Marker::Cont | Marker::Close => {
            return Err(Error::semantic(
                file,
                first.pos,
                "comment block must open with `/**`",
            ));
        }
    }
    let Some(last) = comment.lines.last() else {
        return Ok(());
    };
    if last.marker != Marker::Close {
        return Err(Error::semantic(
            file,
            last.pos,
            "comment block must end with `*/`",
        ));
    }

    let mut machine = DescriptionMachine::new(file);
    let mut is_file_block = false;
    let mut title: Option<String> = None;
    let mut actions: Vec<(SectionAction, Pos)> = Vec::new();

    for line in &comment.lines {
        let pos = line.tokens.first().map(|t| t.pos).unwrap_or(line.pos);
        match classify_line(file, &line.tokens)? {
            Classified::Empty => machine.push(DescLine::Blank, pos)?,
            Classified::Text(tokens) => {
                machine.push(DescLine::Text(render_inline(file, tokens)?), pos)?;
            }
            Classified::Brief(tokens) => {
                machine.push(DescLine::Brief(render_inline(file, tokens)?), pos)?;
            }
            Classified::Warning(tokens) => {
                machine.push(DescLine::Warning(render_inline(file, tokens)?), pos)?;
            }
            Classified::Returns(tokens) => {
                machine.push(DescLine::Returns(render_inline(file, tokens)?), pos)?;
            }
            Classified::Param(kind, tokens) => {
                let name = match tokens.first() {
                    Some(t) if t.kind == TokenKind::CommentValue => html_escape(&t.text),
                    _ => {
                        return Err(Error::semantic(
                            file,
                            pos,
                            format!("`@param[{}]` requires a parameter name", kind.label()),
                        ));
                    }
                };
                let text = render_inline(file, &tokens[1..])?;
                machine.push(DescLine::Param { kind, name, text }, pos)?;
            }
            Classified::File(_) => {
                if is_file_block {
                    return Err(Error::semantic(file, pos, "duplicate `@file`"));
                }
                // A filename argument after `@file` is ignored; the header is
                // identified by the name it was supplied under.
                is_file_block = true;
            }
            Classified::Name(tokens) => {
                if title.is_some() {
                    return Err(Error::semantic(file, pos, "duplicate `@name`"));
                }
                let text = tokens
                    .iter()
                    .map(|t| t.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                if text.is_empty() {
                    return Err(Error::semantic(file, pos, "`@name` requires a title"));
                }
                title = Some(text);
            }
            Classified::SectionOpen => actions.push((SectionAction::Open, pos)),
            Classified::SectionClose => actions.push((SectionAction::Close, pos)),
        }
    }

    let desc = machine.finish();
    if is_file_block {
        ctx.description = desc;
        if let Some(text) = title.take() {
            *pending_section = Some(SectionCtx {
                id: slug(&text),
                name: text,
                ..SectionCtx::default()
            });
        }
    } else if let Some(text) = title.take() {
        *pending_section = Some(SectionCtx {
            id: slug(&text),
            name: text,
            description: desc,
            ..SectionCtx::default()
        });
    } else {
        // A block with no routing command replaces any pending description.
        *pending_desc = desc;
    }

    for (action, pos) in actions {
        match action {
            SectionAction::Open => {
                if current.is_some() {
                    return Err(Error::semantic(file, pos, "`@{` inside an open section"));
                }
                match pending_section.take() {
                    Some(section) => *current = Some(section),
                    None => {
                        return Err(Error::semantic(
                            file,
                            pos,
                            "`@{` without a preceding `@name`",
                        ));
                    }
                }
            }
            SectionAction::Close => match current.take() {
                Some(section) => ctx.sections.push(section),
                None => {
                    return Err(Error::semantic(file, pos, "`@}` without an open section"));
                }
            },
        }
    }
    Ok(())
}

fn groups_mut<'a>(
    ctx: &'a mut HeaderCtx,
    current: &'a mut Option<SectionCtx>,
) -> &'a mut EntryGroups {
    match current {
        Some(section) => &mut section.entries,
        None => &mut ctx.entries,
    }
}

fn kind_label(decl: &Decl) -> &'static str {
    match decl {
        Decl::Struct(_) => "Struct",
        Decl::Enum(_) => "Enum",
        Decl::Function(_) => "Function",
        Decl::FunctionType(_) => "Function type",
    }
}

/// `#include` line as HTML. Paths naming another header in the batch link to
/// that header's anchor.
fn render_include(path: &str, names: &HashSet<&str>) -> String {
    let inner = path.get(1..path.len().saturating_sub(1)).unwrap_or("");
    let (open, close) = if path.starts_with('<') {
        ("&lt;", "&gt;")
    } else {
        ("&quot;", "&quot;")
    };
    if names.contains(inner) {
        format!(
            "{open}<a href=\"#{}\">{}</a>{close}",
            slug(inner),
            html_escape(inner)
        )
    } else {
        format!("{open}{}{close}", html_escape(inner))
    }
}

fn permalink(source_url: &str, line: u32) -> String {
    format!("{source_url}#L{line}")
}

fn highlight(
    file: &str,
    highlighter: &Highlighter,
    code: &str,
    pos: Pos,
) -> Result<String, Error> {
    highlighter
        .highlight(code)
        .map_err(|e| Error::highlight(file, pos, e.to_string()))
}
