//! Compile C headers written in a constrained, documentable dialect into an
//! in-memory documentation model.
//!
//! Each header is tokenized and parsed on its own; the semantic pass then
//! runs over the whole batch at once, so `#include` lines can link to other
//! documented headers and every anchor is derived from the full name set.
//! Renderers consume the resulting [`HeaderCtx`] values, they never see the
//! source text.

mod lexer;
mod parser;
mod semantic;

pub mod error;
pub mod highlight;
pub mod model;
pub mod slug;

pub use error::{Error, ErrorKind};
pub use highlight::Highlighter;
pub use model::{EntryCtx, HeaderCtx, SectionCtx};

use semantic::ParsedHeader;

/// One header to document: its display name, source text, and the base URL
/// used for permalinks.
pub struct HeaderSource {
    pub name: String,
    pub text: String,
    pub source_url: String,
}

/// Compile a batch of headers into one [`HeaderCtx`] each, in input order.
///
/// The first error anywhere in the batch aborts the whole batch.
pub fn compile(
    headers: &[HeaderSource],
    highlighter: &Highlighter,
) -> Result<Vec<HeaderCtx>, Error> {
    let mut parsed = Vec::with_capacity(headers.len());
    for header in headers {
        let tokens = lexer::Lexer::new(&header.name, &header.text).tokenize()?;
        let cst = parser::parse(&header.name, tokens)?;
        parsed.push(ParsedHeader {
            cst,
            source_url: header.source_url.clone(),
        });
    }
    semantic::build(&parsed, highlighter)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "/** @file\n * A sample header.\n */\nint add(int a, int b);\n";

    fn sample_source() -> HeaderSource {
        HeaderSource {
            name: "sample.h".into(),
            text: SAMPLE.into(),
            source_url: "u".into(),
        }
    }

    fn strip_tags(html: &str) -> String {
        let mut out = String::new();
        let mut in_tag = false;
        for c in html.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                c if !in_tag => out.push(c),
                _ => {}
            }
        }
        out.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&amp;", "&")
    }

    #[test]
    fn sample_header_model() {
        let hl = Highlighter::new();
        let docs = compile(&[sample_source()], &hl).unwrap();
        let doc = &docs[0];
        assert_eq!(doc.name, "sample.h");
        assert_eq!(doc.id, "sample-h");
        assert!(doc.description.contains("<p>A sample header.</p>"));
        assert_eq!(doc.entries.functions.len(), 1);
        let add = &doc.entries.functions[0];
        assert_eq!(add.name, "add");
        assert_eq!(add.kind, "Function");
        assert!(strip_tags(&add.prototype).contains("int add(int a, int b);"));
        assert_eq!(add.permalink, "u#L4");
    }

    #[test]
    fn recompiling_is_deterministic() {
        let hl = Highlighter::new();
        let first = compile(&[sample_source()], &hl).unwrap();
        let second = compile(&[sample_source()], &hl).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn batch_fails_fast_on_the_first_error() {
        let hl = Highlighter::new();
        let bad = HeaderSource {
            name: "bad.h".into(),
            text: "int x[3];\n".into(),
            source_url: "u".into(),
        };
        let err = compile(&[sample_source(), bad], &hl).unwrap_err();
        assert_eq!(err.file, "bad.h");
        assert_eq!((err.line, err.column), (1, 6));
    }
}
