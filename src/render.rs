//! Serializer — the inverse of the parser.
//!
//! Rendering normalizes whitespace to a fixed convention rather than
//! preserving the source layout: re-parsing the output gives a tree equal
//! to the one rendered, but the bytes may differ from the input file.

use std::fmt;

use crate::model::{
    Block, Document, DocumentItem, Entry, EntryKind, EntryValue, Section, SectionItem,
};

/// Entries inside blocks and sections sit at a fixed five-space indent;
/// top-level document entries sit flush left.
const INDENT: usize = 5;

fn push_value(out: &mut String, value: &EntryValue) {
    match value {
        EntryValue::Single(text) => out.push_str(text),
        EntryValue::List(parts) => out.push_str(&parts.join(":")),
    }
}

pub(crate) fn write_entry(out: &mut String, entry: &Entry, indent: usize) {
    let key = entry.key().unwrap_or_default();
    match entry.kind() {
        // Comments hug the left margin no matter where they live.
        EntryKind::Comment => {
            out.push('*');
            push_value(out, entry.value());
            out.push('\n');
        }
        EntryKind::Parameter => {
            out.push_str(&" ".repeat(indent));
            out.push_str(key);
            out.push_str(" = ");
            push_value(out, entry.value());
            out.push_str(";\n");
        }
        EntryKind::Variable => {
            out.push_str(&" ".repeat(indent));
            out.push_str("ref $");
            out.push_str(key);
            out.push_str(" = ");
            push_value(out, entry.value());
            out.push_str(";\n");
        }
    }
}

pub(crate) fn write_block(out: &mut String, block: &Block) {
    out.push_str(block.kind().opener());
    out.push(' ');
    out.push_str(block.name());
    out.push_str(";\n");
    // A grouped slot expands back into one line per entry, oldest first.
    for slot in block.entries().values() {
        for entry in slot.iter() {
            write_entry(out, entry, INDENT);
        }
    }
    out.push_str(block.kind().closer());
    out.push_str(";\n");
}

pub(crate) fn write_section(out: &mut String, section: &Section) {
    out.push('$');
    out.push_str(section.name());
    out.push_str(";\n");
    for slot in section.children().values() {
        for item in slot.iter() {
            match item {
                SectionItem::Block(block) => write_block(out, block),
                SectionItem::Entry(entry) => write_entry(out, entry, INDENT),
            }
        }
    }
}

pub(crate) fn write_document(out: &mut String, document: &Document) {
    for slot in document.children().values() {
        for item in slot.iter() {
            match item {
                DocumentItem::Section(section) => write_section(out, section),
                DocumentItem::Entry(entry) => write_entry(out, entry, 0),
            }
        }
    }
}

impl Entry {
    /// Renders the entry as one statement line, indented by `indent`
    /// spaces. Comments ignore the indentation.
    pub fn to_text(&self, indent: usize) -> String {
        let mut out = String::new();
        write_entry(&mut out, self, indent);
        out
    }
}

impl Block {
    /// Renders the block, delimiter lines included.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        write_block(&mut out, self);
        out
    }
}

impl Section {
    /// Renders the section marker and everything under it.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        write_section(&mut out, self);
        out
    }
}

impl Document {
    /// Renders the whole document.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        write_document(&mut out, self);
        out
    }
}

impl fmt::Display for EntryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryValue::Single(text) => f.write_str(text),
            EntryValue::List(parts) => f.write_str(&parts.join(":")),
        }
    }
}

/// Displays with no indentation.
impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(0))
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_ignores_indentation() {
        let entry = Entry::comment(" first scan starts late");
        assert_eq!(entry.to_text(5), "* first scan starts late\n");
        assert_eq!(entry.to_text(0), "* first scan starts late\n");
    }

    #[test]
    fn parameter_line() {
        let entry = Entry::parameter("exper_name", "n14c3");
        assert_eq!(entry.to_text(5), "     exper_name = n14c3;\n");
    }

    #[test]
    fn variable_line_restores_marker() {
        let entry = Entry::variable("IF", "IF1");
        assert_eq!(entry.to_text(5), "     ref $IF = IF1;\n");
    }

    #[test]
    fn list_value_rejoins_with_colons() {
        let entry = Entry::parameter(
            "chan_def",
            EntryValue::List(vec!["&CH01 ".into(), " 4974.49 MHz ".into(), " U".into()]),
        );
        assert_eq!(
            entry.to_text(0),
            "chan_def = &CH01 : 4974.49 MHz : U;\n"
        );
    }

    #[test]
    fn block_expands_grouped_keys_one_line_each() {
        let mut scan = Block::scan("No0001");
        scan.add(Entry::parameter("station", "Ef"));
        scan.add(Entry::parameter("start", "2014y077d18h30m00s"));
        scan.add(Entry::parameter("station", "Wb"));
        // Grouped values come back together, at the key's first position.
        let expected = "scan No0001;\n     station = Ef;\n     station = Wb;\n     start = 2014y077d18h30m00s;\nendscan;\n";
        assert_eq!(scan.to_text(), expected);
    }

    #[test]
    fn section_renders_marker_then_children() {
        let mut section = Section::new("EXPER");
        section.add_entry(Entry::comment(" owner: JIVE"));
        let mut def = Block::definition("n14c3");
        def.add(Entry::parameter("exper_name", "n14c3"));
        section.add_block(def);
        let expected = "$EXPER;\n* owner: JIVE\ndef n14c3;\n     exper_name = n14c3;\nenddef;\n";
        assert_eq!(section.to_text(), expected);
    }

    #[test]
    fn document_entries_sit_flush_left() {
        let mut doc = Document::new("n14c3");
        doc.add_entry(Entry::parameter("VEX_rev", "1.5"));
        doc.add_section(Section::new("GLOBAL"));
        assert_eq!(doc.to_text(), "VEX_rev = 1.5;\n$GLOBAL;\n");
        assert_eq!(format!("{doc}"), doc.to_text());
    }

    #[test]
    fn rendering_then_reparsing_gives_an_equal_tree() {
        let text = "VEX_rev = 1.5;\n$SCHED;\n* two-station scan\nscan No0001;\n     start = 2014y077d18h30m00s;\n     station = Ef :    0 sec;\n     station = Wb :    0 sec;\nendscan;\n";
        let first = Document::from_text("t", text).unwrap();
        let second = Document::from_text("t", &first.to_text()).unwrap();
        assert_eq!(first, second);
    }
}
