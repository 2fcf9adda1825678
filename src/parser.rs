//! VEX text parser — line-by-line state machine.
//!
//! Statements end with `;` and may span several physical lines; fragments
//! accumulate in a continuation buffer until a terminator line completes
//! them. Comment lines short-circuit the buffer entirely: they are routed
//! the moment they are read, and whatever is buffered keeps waiting.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::VexError;
use crate::model::{Block, BlockKind, Document, Entry, EntryValue, Section};

// -- Line patterns --------------------------------------------------------

// Block and section names run from the keyword to the first `;`, kept
// verbatim (the format never trims them).

static RE_SECTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\$([^;]*);").unwrap());

static RE_DEF_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^def ([^;]*);").unwrap());

static RE_SCAN_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^scan ([^;]*);").unwrap());

// -- Parser state ----------------------------------------------------------

struct ParserState {
    document: Document,

    // Open containers; a block can stay open across a `$SECTION;` line, in
    // which case it attaches to the new section once its closer arrives.
    section: Option<Section>,
    block: Option<Block>,

    // Terminator-less physical lines, line breaks preserved.
    pending: String,

    // 1-based physical line number, for error reporting.
    line: usize,
}

impl ParserState {
    fn new(name: String) -> Self {
        ParserState {
            document: Document::new(name),
            section: None,
            block: None,
            pending: String::new(),
            line: 0,
        }
    }
}

// -- Public API ------------------------------------------------------------

/// Parses the whole input into a document called `name`.
pub(crate) fn parse_document(name: String, input: &str) -> Result<Document, VexError> {
    let mut s = ParserState::new(name);

    for (idx, line) in input.lines().enumerate() {
        s.line = idx + 1;
        process_line(&mut s, line)?;
    }

    finish(s)
}

// -- Line processing ---------------------------------------------------------

fn process_line(s: &mut ParserState, raw: &str) -> Result<(), VexError> {
    // 1. Comment lines, terminator or not, are routed immediately.
    if raw.trim_start().starts_with('*') {
        let entry = parse_entry(raw, s.line)?;
        route_entry(s, entry);
        return Ok(());
    }

    // 2. No terminator yet: keep accumulating the logical line. Blank
    //    lines land here too and vanish in the trim below.
    if !raw.contains(';') {
        s.pending.push_str(raw);
        s.pending.push('\n');
        return Ok(());
    }

    // 3. The logical line is complete.
    let assembled = if s.pending.is_empty() {
        raw.to_owned()
    } else {
        let mut text = std::mem::take(&mut s.pending);
        text.push_str(raw);
        text
    };
    let text = assembled.trim();

    // 4. `$NAME;` seals the open section and starts the next one.
    if let Some(caps) = RE_SECTION.captures(text) {
        seal_section(s);
        s.section = Some(Section::new(&caps[1]));
        return Ok(());
    }

    // 5. Block delimiters.
    if let Some(caps) = RE_DEF_OPEN.captures(text) {
        return open_block(s, Block::definition(&caps[1]));
    }
    if text.starts_with("enddef") {
        return close_block(s, BlockKind::Definition);
    }
    if let Some(caps) = RE_SCAN_OPEN.captures(text) {
        return open_block(s, Block::scan(&caps[1]));
    }
    if text.starts_with("endscan") {
        return close_block(s, BlockKind::Scan);
    }

    // 6. Anything else must be an entry.
    let entry = parse_entry(text, s.line)?;
    route_entry(s, entry);
    Ok(())
}

fn open_block(s: &mut ParserState, block: Block) -> Result<(), VexError> {
    if let Some(open) = &s.block {
        return Err(VexError::nesting(
            s.line,
            format!(
                "cannot open {} '{}' inside {} '{}'",
                block.kind().opener(),
                block.name(),
                open.kind().opener(),
                open.name()
            ),
        ));
    }
    s.block = Some(block);
    Ok(())
}

fn close_block(s: &mut ParserState, kind: BlockKind) -> Result<(), VexError> {
    match s.block.take() {
        Some(block) if block.kind() == kind => match &mut s.section {
            Some(section) => {
                section.add_block(block);
                Ok(())
            }
            None => Err(VexError::nesting(
                s.line,
                format!("'{}' outside any section", kind.closer()),
            )),
        },
        Some(block) => Err(VexError::nesting(
            s.line,
            format!(
                "'{}' cannot close {} '{}'",
                kind.closer(),
                block.kind().opener(),
                block.name()
            ),
        )),
        None => Err(VexError::nesting(
            s.line,
            format!("'{}' with no open {}", kind.closer(), kind.opener()),
        )),
    }
}

/// Entries go to the innermost open container: block, then section, then
/// the document itself.
fn route_entry(s: &mut ParserState, entry: Entry) {
    if let Some(block) = &mut s.block {
        block.add(entry);
    } else if let Some(section) = &mut s.section {
        section.add_entry(entry);
    } else {
        s.document.add_entry(entry);
    }
}

fn seal_section(s: &mut ParserState) {
    if let Some(section) = s.section.take() {
        s.document.add_section(section);
    }
}

fn finish(mut s: ParserState) -> Result<Document, VexError> {
    if let Some(block) = &s.block {
        return Err(VexError::nesting(
            s.line,
            format!(
                "{} '{}' still open at end of input",
                block.kind().opener(),
                block.name()
            ),
        ));
    }
    seal_section(&mut s);
    // A trailing fragment that never saw its terminator is dropped.
    Ok(s.document)
}

// -- Entry grammar ---------------------------------------------------------

/// Parses one assembled logical line into an entry.
///
/// `'* text'` → comment, `'key = value;'` → parameter,
/// `'ref $key = value;'` → variable. A value containing `:` becomes an
/// ordered list, split on every occurrence.
fn parse_entry(text: &str, line: usize) -> Result<Entry, VexError> {
    let text = text.trim();
    if let Some(rest) = text.strip_prefix('*') {
        return Ok(Entry::comment(rest));
    }

    // Only the first `=` is structural; later ones belong to the value.
    let Some((raw_key, raw_value)) = text.split_once('=') else {
        return Err(VexError::grammar(
            line,
            format!("expected 'key = value;', got '{text}'"),
        ));
    };

    let key = raw_key.trim();
    let mut value = raw_value.trim();
    // The statement terminator is not part of the value. Strip it once,
    // without re-trimming: interior whitespace before it is data.
    if let Some(stripped) = value.strip_suffix(';') {
        value = stripped;
    }

    if key.contains("ref ") {
        // The key proper of a `ref $KEY = ...` declaration is whatever
        // follows the `$`.
        return match key.split_once('$') {
            Some((_, after)) if !after.contains('$') => {
                Ok(Entry::variable(after.trim(), EntryValue::from_raw(value)))
            }
            _ => Err(VexError::grammar(
                line,
                format!("expected exactly one '$' in ref declaration '{key}'"),
            )),
        };
    }

    Ok(Entry::parameter(key, EntryValue::from_raw(value)))
}
