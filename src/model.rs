//! Documentation model handed to renderers.
//!
//! Descriptions are pre-rendered HTML fragments; prototypes are highlighted
//! HTML. Renderers only arrange these, they never re-parse them.

use serde::Serialize;

/// One documented header file.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct HeaderCtx {
    /// Anchor id derived from the file name.
    pub id: String,
    /// File name as supplied, e.g. `geometry.h`.
    pub name: String,
    /// HTML description from the `@file` block.
    pub description: String,
    /// Rendered `#include` lines, cross-linked within the batch.
    pub includes: Vec<String>,
    pub sections: Vec<SectionCtx>,
    #[serde(flatten)]
    pub entries: EntryGroups,
}

/// A named group of entries opened with `@name` and `@{`.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct SectionCtx {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(flatten)]
    pub entries: EntryGroups,
}

/// Entries of one header or section, grouped by kind.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct EntryGroups {
    pub defines: Vec<EntryCtx>,
    pub structs: Vec<EntryCtx>,
    pub enums: Vec<EntryCtx>,
    pub functions: Vec<EntryCtx>,
    pub function_types: Vec<EntryCtx>,
}

impl EntryGroups {
    pub fn is_empty(&self) -> bool {
        self.defines.is_empty()
            && self.structs.is_empty()
            && self.enums.is_empty()
            && self.functions.is_empty()
            && self.function_types.is_empty()
    }

    /// Groups in display order with their headings.
    pub fn named(&self) -> [(&'static str, &[EntryCtx]); 5] {
        [
            ("Defines", &self.defines),
            ("Structs", &self.structs),
            ("Enums", &self.enums),
            ("Functions", &self.functions),
            ("Function types", &self.function_types),
        ]
    }
}

/// One define, type, or function.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct EntryCtx {
    /// Anchor id derived from the entry name; empty for unnamed entries.
    pub id: String,
    /// Display label: `Define`, `Struct`, `Enum`, `Function`, `Function type`.
    pub kind: String,
    pub name: String,
    /// Highlighted HTML for the declaration as written.
    pub prototype: String,
    /// HTML description from the preceding doc comment, possibly empty.
    pub description: String,
    /// `sourceURL#L<line>` link to the declaration.
    pub permalink: String,
}
