//! Reader and writer for VEX observation schedule files.
//!
//! VEX is the line-oriented text format used to define a complete VLBI
//! experiment: one file carries the stations, modes, sources and scans of
//! an observation. This crate parses such files into an order-preserving
//! document tree and writes the tree back out, without interpreting any
//! of it: every value stays an opaque string, so the crate works with
//! any parameter vocabulary and format revision.
//!
//! Statements are grouped by `$SECTION;` markers and `def`/`scan` blocks;
//! a key that appears several times in one container keeps all its values,
//! in order. Re-rendering a parsed document normalizes the layout.
//!
//! ```
//! use vexfile::Document;
//!
//! let text = "$EXPER;\ndef n14c3;\n  exper_name = n14c3;\nenddef;\n";
//! let doc = Document::from_text("n14c3", text)?;
//! let def = doc.section("EXPER")?.block("n14c3")?;
//! assert!(def.contains_key("exper_name"));
//! # Ok::<(), vexfile::VexError>(())
//! ```

mod error;
mod model;
mod multimap;
mod parser;
mod render;

pub use error::VexError;
pub use model::{
    Block, BlockKind, Document, DocumentItem, Entry, EntryKind, EntryValue, Section, SectionItem,
};
pub use multimap::{OneOrMany, OrderedMultiMap};
