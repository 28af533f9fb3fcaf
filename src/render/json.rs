//! JSON renderer: the documentation model, pretty-printed.

use anyhow::Result;
use hdoc::HeaderCtx;

use super::Renderer;

#[derive(Debug)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, doc: &HeaderCtx) -> Result<String> {
        let mut out = serde_json::to_string_pretty(doc)?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_pretty_json() {
        let doc = HeaderCtx {
            name: "x.h".into(),
            ..HeaderCtx::default()
        };
        let out = JsonRenderer.render(&doc).unwrap();
        assert!(out.contains("\"name\": \"x.h\""));
        assert!(out.ends_with('\n'));
    }
}
