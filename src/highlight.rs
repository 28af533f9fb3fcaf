//! Syntax highlighting for reassembled prototypes.
//!
//! The syntax set and theme are loaded once at construction and shared
//! read-only afterwards, so one value can serve a whole batch.

use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

pub struct Highlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    pub fn new() -> Self {
        let syntaxes = SyntaxSet::load_defaults_newlines();
        let themes = ThemeSet::load_defaults();
        let theme = themes
            .themes
            .get("InspiredGitHub")
            .cloned()
            .unwrap_or_default();
        Self { syntaxes, theme }
    }

    /// Render one prototype as an HTML fragment, without line numbers.
    pub fn highlight(&self, code: &str) -> Result<String, syntect::Error> {
        let syntax = self
            .syntaxes
            .find_syntax_by_extension("c")
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());
        highlighted_html_for_string(code, &self.syntaxes, syntax, &self.theme)
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}
