//! Document tree for the VEX format — order-preserving and
//! schema-agnostic. Every value is an opaque string; nothing here knows
//! the format's parameter vocabulary.

use std::fs;
use std::path::Path;

use crate::error::VexError;
use crate::multimap::{OneOrMany, OrderedMultiMap};
use crate::parser;

/// What a single statement is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// `* free text`
    Comment,
    /// `key = value;`
    Parameter,
    /// `ref $key = value;`
    Variable,
}

/// The right-hand side of an entry: one opaque string, or the ordered
/// parts of a `:`-delimited value.
///
/// An undelimited value is always `Single`, never a one-element list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValue {
    Single(String),
    List(Vec<String>),
}

impl EntryValue {
    /// Builds a value from raw statement text: split on every `:` when
    /// one is present (parts kept verbatim, untrimmed), whole otherwise.
    pub fn from_raw(raw: &str) -> Self {
        if raw.contains(':') {
            EntryValue::List(raw.split(':').map(str::to_owned).collect())
        } else {
            EntryValue::Single(raw.to_owned())
        }
    }
}

impl From<&str> for EntryValue {
    fn from(value: &str) -> Self {
        EntryValue::Single(value.to_owned())
    }
}

impl From<String> for EntryValue {
    fn from(value: String) -> Self {
        EntryValue::Single(value)
    }
}

impl From<Vec<String>> for EntryValue {
    fn from(parts: Vec<String>) -> Self {
        EntryValue::List(parts)
    }
}

/// One statement: a comment, a parameter assignment, or a variable
/// declaration.
///
/// Entries are immutable once built; the three constructors fix the
/// kind/key relationship (`key` is `None` exactly for comments), so an
/// inconsistent entry cannot be constructed. Editing a document means
/// building a new entry and [`set`](Document::set)ting it in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    kind: EntryKind,
    key: Option<String>,
    value: EntryValue,
}

impl Entry {
    /// `* text`, where the stored value is everything after the marker.
    pub fn comment(text: impl Into<String>) -> Self {
        Entry {
            kind: EntryKind::Comment,
            key: None,
            value: EntryValue::Single(text.into()),
        }
    }

    /// `key = value;`
    pub fn parameter(key: impl Into<String>, value: impl Into<EntryValue>) -> Self {
        Entry {
            kind: EntryKind::Parameter,
            key: Some(key.into()),
            value: value.into(),
        }
    }

    /// `ref $key = value;`
    pub fn variable(key: impl Into<String>, value: impl Into<EntryValue>) -> Self {
        Entry {
            kind: EntryKind::Variable,
            key: Some(key.into()),
            value: value.into(),
        }
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// `None` exactly when the entry is a comment.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn value(&self) -> &EntryValue {
        &self.value
    }
}

/// Which delimiter pair a [`Block`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// `def <name>;` … `enddef;`
    Definition,
    /// `scan <name>;` … `endscan;`
    Scan,
}

impl BlockKind {
    pub fn opener(self) -> &'static str {
        match self {
            BlockKind::Definition => "def",
            BlockKind::Scan => "scan",
        }
    }

    pub fn closer(self) -> &'static str {
        match self {
            BlockKind::Definition => "enddef",
            BlockKind::Scan => "endscan",
        }
    }
}

/// A named, delimited group of entries inside a section: a definition or
/// a scan. The two kinds behave identically and differ only in the
/// keywords their text form uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    kind: BlockKind,
    name: String,
    entries: OrderedMultiMap<Entry>,
}

impl Block {
    pub fn new(kind: BlockKind, name: impl Into<String>) -> Self {
        Block {
            kind,
            name: name.into(),
            entries: OrderedMultiMap::new(),
        }
    }

    pub fn definition(name: impl Into<String>) -> Self {
        Block::new(BlockKind::Definition, name)
    }

    pub fn scan(name: impl Into<String>) -> Self {
        Block::new(BlockKind::Scan, name)
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &OrderedMultiMap<Entry> {
        &self.entries
    }

    /// Adds an entry under its own key; comments go under the next
    /// synthetic `comment-<n>` key.
    pub fn add(&mut self, entry: Entry) {
        match entry.key().map(str::to_owned) {
            Some(key) => self.entries.insert(key, entry),
            None => {
                self.entries.insert_comment(entry);
            }
        }
    }

    pub fn get(&self, key: &str) -> Result<&OneOrMany<Entry>, VexError> {
        self.entries.get(key).ok_or_else(|| VexError::key_not_found(key))
    }

    /// Replaces whatever is stored under `key` with a single entry,
    /// keeping the key's position.
    pub fn set(&mut self, key: impl Into<String>, entry: Entry) {
        self.entries.set(key, entry);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<OneOrMany<Entry>> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &OneOrMany<Entry>> {
        self.entries.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OneOrMany<Entry>)> {
        self.entries.iter()
    }
}

/// A child of a [`Section`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionItem {
    Block(Block),
    Entry(Entry),
}

/// A `$NAME;` group: definitions, scans and stray entries, in source
/// order. Sections have no closing marker; the next `$NAME;` or the end
/// of input seals them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    children: OrderedMultiMap<SectionItem>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Section {
            name: name.into(),
            children: OrderedMultiMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &OrderedMultiMap<SectionItem> {
        &self.children
    }

    /// Adds a sealed block under its name.
    pub fn add_block(&mut self, block: Block) {
        let key = block.name.clone();
        self.children.insert(key, SectionItem::Block(block));
    }

    /// Adds an entry that sits directly under the section.
    pub fn add_entry(&mut self, entry: Entry) {
        match entry.key().map(str::to_owned) {
            Some(key) => self.children.insert(key, SectionItem::Entry(entry)),
            None => {
                self.children.insert_comment(SectionItem::Entry(entry));
            }
        }
    }

    pub fn get(&self, key: &str) -> Result<&OneOrMany<SectionItem>, VexError> {
        self.children.get(key).ok_or_else(|| VexError::key_not_found(key))
    }

    pub fn set(&mut self, key: impl Into<String>, item: SectionItem) {
        self.children.set(key, item);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.children.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<OneOrMany<SectionItem>> {
        self.children.remove(key)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.children.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &OneOrMany<SectionItem>> {
        self.children.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OneOrMany<SectionItem>)> {
        self.children.iter()
    }

    /// Looks up a definition or scan by name, skipping any plain entries
    /// that happen to share the key.
    pub fn block(&self, name: &str) -> Result<&Block, VexError> {
        self.children
            .get(name)
            .into_iter()
            .flat_map(OneOrMany::iter)
            .find_map(|item| match item {
                SectionItem::Block(block) => Some(block),
                SectionItem::Entry(_) => None,
            })
            .ok_or_else(|| VexError::key_not_found(name))
    }

    pub fn block_mut(&mut self, name: &str) -> Result<&mut Block, VexError> {
        self.children
            .get_mut(name)
            .into_iter()
            .flat_map(OneOrMany::iter_mut)
            .find_map(|item| match item {
                SectionItem::Block(block) => Some(block),
                SectionItem::Entry(_) => None,
            })
            .ok_or_else(|| VexError::key_not_found(name))
    }
}

/// A child of a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentItem {
    Section(Section),
    Entry(Entry),
}

/// A whole VEX document: sections plus any entries that appear before
/// the first section (the format's revision marker usually does).
///
/// The document owns its sections, which own their blocks, which own
/// their entries; the tree is acyclic and children are plain owned
/// values. The name never appears in the serialized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    children: OrderedMultiMap<DocumentItem>,
}

impl Document {
    /// An empty document with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Document {
            name: name.into(),
            children: OrderedMultiMap::new(),
        }
    }

    /// Parses `text` into a document called `name`.
    pub fn from_text(name: impl Into<String>, text: &str) -> Result<Document, VexError> {
        parser::parse_document(name.into(), text)
    }

    /// Reads and parses a file; the document is named after the file
    /// stem.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Document, VexError> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let text = fs::read_to_string(path)?;
        Document::from_text(name, &text)
    }

    /// Serializes the document to `path`. Refuses to touch an existing
    /// file unless `overwrite` is set; the check happens before any
    /// bytes are written.
    pub fn to_file(&self, path: impl AsRef<Path>, overwrite: bool) -> Result<(), VexError> {
        let path = path.as_ref();
        if !overwrite && path.exists() {
            return Err(VexError::DestinationExists {
                path: path.to_path_buf(),
            });
        }
        fs::write(path, self.to_text())?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn children(&self) -> &OrderedMultiMap<DocumentItem> {
        &self.children
    }

    /// Adds a sealed section under its name.
    pub fn add_section(&mut self, section: Section) {
        let key = section.name.clone();
        self.children.insert(key, DocumentItem::Section(section));
    }

    /// Adds a top-level entry (one that precedes any section).
    pub fn add_entry(&mut self, entry: Entry) {
        match entry.key().map(str::to_owned) {
            Some(key) => self.children.insert(key, DocumentItem::Entry(entry)),
            None => {
                self.children.insert_comment(DocumentItem::Entry(entry));
            }
        }
    }

    pub fn get(&self, key: &str) -> Result<&OneOrMany<DocumentItem>, VexError> {
        self.children.get(key).ok_or_else(|| VexError::key_not_found(key))
    }

    pub fn set(&mut self, key: impl Into<String>, item: DocumentItem) {
        self.children.set(key, item);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.children.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<OneOrMany<DocumentItem>> {
        self.children.remove(key)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.children.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &OneOrMany<DocumentItem>> {
        self.children.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OneOrMany<DocumentItem>)> {
        self.children.iter()
    }

    /// Looks up a section by name.
    pub fn section(&self, name: &str) -> Result<&Section, VexError> {
        self.children
            .get(name)
            .into_iter()
            .flat_map(OneOrMany::iter)
            .find_map(|item| match item {
                DocumentItem::Section(section) => Some(section),
                DocumentItem::Entry(_) => None,
            })
            .ok_or_else(|| VexError::key_not_found(name))
    }

    pub fn section_mut(&mut self, name: &str) -> Result<&mut Section, VexError> {
        self.children
            .get_mut(name)
            .into_iter()
            .flat_map(OneOrMany::iter_mut)
            .find_map(|item| match item {
                DocumentItem::Section(section) => Some(section),
                DocumentItem::Entry(_) => None,
            })
            .ok_or_else(|| VexError::key_not_found(name))
    }
}
