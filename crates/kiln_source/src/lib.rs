//! Source and compiled-unit model, lexical scanning, and import resolution.
//!
//! A [`Source`] is one tracked `.sol` file together with the two facts the
//! build engine needs from its text: the version pragma and the list of
//! imports, resolved to paths relative to the contracts directory. A
//! [`Contract`] is one unit the compiler produced from a source.

#![warn(missing_docs)]

pub mod contract;
pub mod error;
pub mod resolve;
pub mod scan;
pub mod source;
pub mod walk;

pub use contract::{qualified_name, split_qualified_name, Bytecode, Contract};
pub use error::ScanError;
pub use resolve::{resolve_import, resolve_imports};
pub use scan::{parse_imports, parse_pragmas};
pub use source::{parse_source, split_path, Source};
pub use walk::{read_dir, FileRef, SOURCE_EXT};
