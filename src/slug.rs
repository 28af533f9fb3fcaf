//! Anchor/slug generation for symbol names and section titles.

/// Turn an arbitrary name into a URL- and HTML-anchor-safe identifier.
///
/// Every maximal run of characters outside `[A-Za-z0-9_]` collapses into a
/// single separator, leading and trailing separators are dropped, and the
/// result is lowercased. Idempotent: `slug(slug(x)) == slug(x)`. The empty
/// string means "no anchor".
pub fn slug(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_sep = false;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_becomes_anchor() {
        assert_eq!(slug("other.h"), "other-h");
        assert_eq!(slug("geometry.h"), "geometry-h");
    }

    #[test]
    fn lowercases() {
        assert_eq!(slug("Foo"), "foo");
        assert_eq!(slug("GEO_PI"), "geo_pi");
    }

    #[test]
    fn underscores_survive() {
        assert_eq!(slug("geo_point"), "geo_point");
        assert_eq!(slug("_internal"), "_internal");
    }

    #[test]
    fn punctuation_runs_collapse() {
        assert_eq!(slug("a -- b"), "a-b");
        assert_eq!(slug("  spaced  out  "), "spaced-out");
    }

    #[test]
    fn symbolic_input_yields_no_anchor() {
        assert_eq!(slug(""), "");
        assert_eq!(slug("!!! ???"), "");
    }

    #[test]
    fn idempotent() {
        for s in ["other.h", "Foo Bar", "geo_point", "a -- b", "", "!?"] {
            assert_eq!(slug(&slug(s)), slug(s));
        }
    }

    #[test]
    fn output_charset() {
        for s in ["A B.c", "x__y", "Crazy!@#Name", "MixedCASE_09"] {
            assert!(slug(s)
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'));
        }
    }
}
