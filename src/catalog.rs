//! Catalog persistence: the ordered entry mapping, document parsing on
//! load, canonical serialization, and atomic replacement on save.

use std::path::Path;

use indexmap::IndexMap;

use crate::document;
use crate::error::Error;
use crate::normalize;
use crate::source::SourceCache;
use crate::types::{Entry, Key, SourceText};

/// Preamble written at the top of every catalog document. Parsed as prose
/// and ignored on load.
pub const CATALOG_HEADER: &str = "\
# `lintack`

**WARNING: This file is programmatically generated.**

This file is parsed by `lintack` to determine which analyzer
findings are already acknowledged.

- Do not edit this file manually.
- To update, run `lintack update`.

The recommended approach to using `lintack` is:

1. If a finding points at a real issue, fix the code rather than
   acknowledging the finding.
2. If a finding should *always* be ignored, disable it in the
   analyzer's own configuration rather than in this file.
3. If a finding is a false positive, suppress it with an inline
   comment explaining why.

";

/// Ordered mapping of acknowledged findings.
///
/// Insertion order follows document order on load, with last write winning
/// for duplicate keys. Equality is content equality of keys and entries,
/// independent of order; `dumps` imposes its own deterministic ordering.
#[derive(Debug, Default, PartialEq)]
pub struct Catalog {
    /// The entries, keyed by their stable identity.
    entries: IndexMap<Key, Entry>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        return Self::default();
    }

    /// Write the canonical document to `path` via a sibling temp file and
    /// atomic rename. A concurrent reader sees either the prior complete
    /// file or the new complete file, never a half-written one.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the temp file cannot be written or renamed.
    pub fn dump(&self, path: &Path) -> Result<(), Error> {
        let text = self.dumps();
        let tmp_name = path.file_name().map_or_else(
            || return std::ffi::OsString::from("catalog.md.tmp"),
            |name| {
                let mut name = name.to_os_string();
                name.push(".tmp");
                return name;
            },
        );
        let tmp_path = path.with_file_name(tmp_name);
        std::fs::write(&tmp_path, &text)?;
        std::fs::rename(&tmp_path, path)?;
        return Ok(());
    }

    /// Render the catalog as its canonical document text.
    ///
    /// Header-only entries are dropped; the rest are stable-sorted by
    /// (msg_id, new line number, message text), so repeated load/dump
    /// cycles are byte-identical.
    pub fn dumps(&self) -> String {
        let mut entries: Vec<(&Entry, &SourceText)> = self
            .entries
            .values()
            .filter_map(|entry| {
                return entry.srctxt.as_ref().map(|srctxt| return (entry, srctxt));
            })
            .collect();
        entries.sort_by(|(a, a_src), (b, b_src)| {
            return (&a.msg_id, a_src.new_lineno, &a.msg_text).cmp(&(
                &b.msg_id,
                b_src.new_lineno,
                &b.msg_text,
            ));
        });

        let mut out = String::from(CATALOG_HEADER);
        for (entry, srctxt) in entries {
            out.push_str(&render_entry(entry, srctxt));
        }
        return out;
    }

    /// The entry stored under exactly this key, if any.
    pub fn get(&self, key: &Key) -> Option<&Entry> {
        return self.entries.get(key);
    }

    /// Insert an entry under its key. Last write wins.
    pub fn insert(&mut self, key: Key, entry: Entry) {
        self.entries.insert(key, entry);
    }

    /// Whether the catalog holds no entries.
    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Entry)> {
        return self.entries.iter();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        return self.entries.len();
    }

    /// Load a catalog from disk, re-anchoring every entry against current
    /// source through `cache`.
    ///
    /// An absent file is "no catalog yet" and loads empty. Content problems
    /// never abort a load: obsolete records are skipped silently, invalid
    /// records are logged and skipped, and the worst case is a smaller
    /// catalog plus log lines.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` for filesystem failures other than the catalog
    /// file being absent, including failures reading referenced sources.
    pub fn load(path: &Path, cache: &mut SourceCache) -> Result<Self, Error> {
        let text = match std::fs::read_to_string(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
            Ok(t) => t,
        };
        return Self::parse(&text, cache);
    }

    /// Parse catalog document text, resolving records against current
    /// source. Same skip semantics as `load`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if a referenced source file cannot be read.
    pub fn parse(text: &str, cache: &mut SourceCache) -> Result<Self, Error> {
        let mut catalog = Self::default();
        for raw in document::scan(text) {
            match normalize::normalize(cache, &raw) {
                Ok((key, entry)) => {
                    catalog.entries.insert(key, entry);
                }
                // Source edits make entries obsolete in the normal course
                // of things; the catalog is under version control and the
                // diff makes the loss visible.
                Err(err @ Error::ObsoleteEntry { .. }) => {
                    log::debug!("dropping entry at catalog line {}: {err}", raw.catalog_lineno);
                }
                Err(err @ Error::InvalidEntry { .. }) => {
                    log::error!("{err}");
                }
                Err(err) => return Err(err),
            }
        }
        return Ok(catalog);
    }
}

/// Render one entry as its document block: header line, list items, and the
/// fenced context window with line-number prefixes and the `>` anchor mark.
fn render_entry(entry: &Entry, srctxt: &SourceText) -> String {
    let width = (srctxt.end_idx + 1).to_string().len();
    let mut block_lines: Vec<String> = Vec::new();

    if let Some(def_line) = &srctxt.def_line {
        let def_lineno = def_line.idx + 1;
        block_lines.push(format!("  {def_lineno:>width$}: {}", def_line.text));
        if def_line.idx + 1 < srctxt.start_idx {
            block_lines.push("  ...".to_string());
        }
    }

    for (offset, line) in srctxt.context.iter().enumerate() {
        let lineno = srctxt.start_idx + offset + 1;
        // Blank-content lines are rendered without trailing whitespace.
        let content =
            if line.trim().is_empty() { String::new() } else { format!(" {line}") };
        let marker = if lineno == srctxt.new_lineno { '>' } else { ' ' };
        block_lines.push(format!("{marker} {lineno:>width$}:{content}"));
    }

    let block = block_lines.join("\n");
    return format!(
        "## File {path} - Line {lineno} - {msg_id} ({symbol})\n\
         \n\
         - `message: {msg_text}`\n\
         - `author : {author}`\n\
         - `date   : {date}`\n\
         \n\
         ```\n\
         {block}\n\
         ```\n\
         \n\
         \n",
        path = entry.path,
        lineno = srctxt.new_lineno,
        msg_id = entry.msg_id,
        symbol = entry.symbol,
        msg_text = entry.msg_text,
        author = entry.author,
        date = entry.date,
    );
}
