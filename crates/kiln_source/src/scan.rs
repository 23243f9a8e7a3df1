//! Lexical scanning of import statements and version pragmas.
//!
//! Only the two regular features the build engine needs are recognized; the
//! rest of the source text is left to the compiler.

use std::sync::OnceLock;

use regex::Regex;

static IMPORT_RE: OnceLock<Regex> = OnceLock::new();
static PRAGMA_RE: OnceLock<Regex> = OnceLock::new();

fn import_re() -> &'static Regex {
    // `import "x";`, `import 'x' as Y;`, `import {A} from "x";`, `import * as X from 'x';`
    IMPORT_RE.get_or_init(|| {
        Regex::new(r#"\bimport\s*(?:[^;"']*?\bfrom\s*)?(?:"([^"]*)"|'([^']*)')"#)
            .expect("import pattern is valid")
    })
}

fn pragma_re() -> &'static Regex {
    PRAGMA_RE.get_or_init(|| {
        Regex::new(r"pragma\s+solidity\s+([^;]*);").expect("pragma pattern is valid")
    })
}

/// Returns the import paths named in `content`, in order of appearance, with
/// quotes stripped. Paths are returned as written (not yet resolved).
pub fn parse_imports(content: &str) -> Vec<String> {
    import_re()
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Returns the constraint text of every `pragma solidity` statement in
/// `content`, trimmed, in order of appearance. Empty when there is none.
pub fn parse_pragmas(content: &str) -> Vec<String> {
    pragma_re()
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}
