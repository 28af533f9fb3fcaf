//! HTML renderer: one standalone page per header.
//!
//! Descriptions and prototypes arrive as HTML fragments; this module only
//! arranges them and adds headings and anchors.

use anyhow::Result;
use hdoc::model::EntryGroups;
use hdoc::{EntryCtx, HeaderCtx, SectionCtx};

use super::Renderer;

#[derive(Debug)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, doc: &HeaderCtx) -> Result<String> {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        out.push_str(&format!("<title>{}</title>\n", html_escape(&doc.name)));
        out.push_str("<style>\n");
        out.push_str(STYLE);
        out.push_str("</style>\n</head>\n<body>\n");
        out.push_str(&format!(
            "<h1 id=\"{}\">{}</h1>\n",
            doc.id,
            html_escape(&doc.name)
        ));
        out.push_str(&doc.description);

        if !doc.includes.is_empty() {
            out.push_str("<h2>Includes</h2>\n<ul>\n");
            for inc in &doc.includes {
                out.push_str(&format!("<li><code>#include {inc}</code></li>\n"));
            }
            out.push_str("</ul>\n");
        }

        render_index(&mut out, doc);
        render_groups(&mut out, &doc.entries, 2);
        for section in &doc.sections {
            render_section(&mut out, section);
        }

        out.push_str("</body>\n</html>\n");
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "html"
    }
}

fn render_index(out: &mut String, doc: &HeaderCtx) {
    let mut anchors: Vec<(&str, &str)> = Vec::new();
    collect_anchors(&mut anchors, &doc.entries);
    for section in &doc.sections {
        collect_anchors(&mut anchors, &section.entries);
    }
    if anchors.is_empty() {
        return;
    }
    out.push_str("<h2>Index</h2>\n<ul>\n");
    for (id, name) in anchors {
        out.push_str(&format!(
            "<li><a href=\"#{id}\">{}</a></li>\n",
            html_escape(name)
        ));
    }
    out.push_str("</ul>\n");
}

fn collect_anchors<'a>(anchors: &mut Vec<(&'a str, &'a str)>, groups: &'a EntryGroups) {
    for (_, entries) in groups.named() {
        for entry in entries {
            if !entry.id.is_empty() {
                anchors.push((&entry.id, &entry.name));
            }
        }
    }
}

fn render_section(out: &mut String, section: &SectionCtx) {
    if section.id.is_empty() {
        out.push_str(&format!("<h2>{}</h2>\n", html_escape(&section.name)));
    } else {
        out.push_str(&format!(
            "<h2 id=\"{}\">{}</h2>\n",
            section.id,
            html_escape(&section.name)
        ));
    }
    out.push_str(&section.description);
    render_groups(out, &section.entries, 3);
}

fn render_groups(out: &mut String, groups: &EntryGroups, level: u8) {
    for (heading, entries) in groups.named() {
        if entries.is_empty() {
            continue;
        }
        out.push_str(&format!("<h{level}>{heading}</h{level}>\n"));
        for entry in entries {
            render_entry(out, entry, level + 1);
        }
    }
}

fn render_entry(out: &mut String, entry: &EntryCtx, level: u8) {
    let label = if entry.name.is_empty() {
        &entry.kind
    } else {
        &entry.name
    };
    if entry.id.is_empty() {
        out.push_str(&format!("<h{level}>{}</h{level}>\n", html_escape(label)));
    } else {
        out.push_str(&format!(
            "<h{level} id=\"{}\">{}</h{level}>\n",
            entry.id,
            html_escape(label)
        ));
    }
    out.push_str(&entry.prototype);
    out.push_str(&entry.description);
    out.push_str(&format!(
        "<p class=\"source\"><a href=\"{}\">Source</a></p>\n",
        html_escape(&entry.permalink)
    ));
}

const STYLE: &str = "\
body { font-family: sans-serif; max-width: 56rem; margin: 0 auto; padding: 0 1rem; }
pre { padding: 0.5rem; overflow-x: auto; }
table.params { border-collapse: collapse; }
table.params td { border: 1px solid #ddd; padding: 0.25rem 0.5rem; }
table.params td.dir { color: #666; }
div.warning { border-left: 4px solid #c00; padding-left: 0.75rem; }
div.returns { margin: 0.5rem 0; }
p.source a { color: #888; font-size: 0.9rem; }
";

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_has_title_and_anchor() {
        let doc = HeaderCtx {
            id: "x-h".into(),
            name: "x.h".into(),
            ..HeaderCtx::default()
        };
        let out = HtmlRenderer.render(&doc).unwrap();
        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("<h1 id=\"x-h\">x.h</h1>"));
    }

    #[test]
    fn index_links_entries_from_every_group() {
        let mut doc = HeaderCtx::default();
        doc.entries.functions.push(EntryCtx {
            id: "add".into(),
            kind: "Function".into(),
            name: "add".into(),
            ..EntryCtx::default()
        });
        let mut section = SectionCtx::default();
        section.entries.defines.push(EntryCtx {
            id: "geo_pi".into(),
            kind: "Define".into(),
            name: "GEO_PI".into(),
            ..EntryCtx::default()
        });
        doc.sections.push(section);
        let out = HtmlRenderer.render(&doc).unwrap();
        assert!(out.contains("<h2>Index</h2>"));
        assert!(out.contains("<li><a href=\"#add\">add</a></li>"));
        assert!(out.contains("<li><a href=\"#geo_pi\">GEO_PI</a></li>"));
    }

    #[test]
    fn unnamed_entry_falls_back_to_its_kind() {
        let mut doc = HeaderCtx::default();
        doc.entries.enums.push(EntryCtx {
            kind: "Enum".into(),
            ..EntryCtx::default()
        });
        let out = HtmlRenderer.render(&doc).unwrap();
        assert!(out.contains("<h3>Enum</h3>"));
    }

    #[test]
    fn section_entries_nest_under_the_section() {
        let mut doc = HeaderCtx::default();
        let mut section = SectionCtx {
            id: "angles".into(),
            name: "Angles".into(),
            ..SectionCtx::default()
        };
        section.entries.functions.push(EntryCtx {
            id: "norm".into(),
            kind: "Function".into(),
            name: "norm".into(),
            ..EntryCtx::default()
        });
        doc.sections.push(section);
        let out = HtmlRenderer.render(&doc).unwrap();
        let section_at = out.find("<h2 id=\"angles\">").unwrap();
        let entry_at = out.find("<h4 id=\"norm\">").unwrap();
        assert!(section_at < entry_at);
    }
}
