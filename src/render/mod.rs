//! Output renderers for compiled headers.

mod html;
mod json;

use anyhow::Result;
use hdoc::HeaderCtx;

pub trait Renderer: std::fmt::Debug {
    fn render(&self, doc: &HeaderCtx) -> Result<String>;
    fn file_extension(&self) -> &str;
}

pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "json" => Ok(Box::new(json::JsonRenderer)),
        "html" => Ok(Box::new(html::HtmlRenderer)),
        _ => anyhow::bail!("unknown format: {}. Use json or html", format),
    }
}
