//! Entry normalization: raw document records into keyed catalog entries.
//!
//! The fenced context block stored in the catalog is a rendering of the
//! source as it looked at write time. Only one piece of it is ground truth
//! for re-anchoring: the `>`-marked line. Everything else (window, enclosing
//! definition) is re-derived from the current source.

use std::path::Path;

use regex::Regex;

use crate::anchor;
use crate::document::RawEntry;
use crate::error::Error;
use crate::source::SourceCache;
use crate::types::{Entry, Key};

/// Extract the `>`-marked anchor line's text from a fenced context block.
///
/// The recognized shape is `> {lineno}: {text}` with arbitrary leading
/// padding; the recorded line number is a stale hint and is ignored in
/// favor of the header's. Returns `None` when no line matches, which
/// classifies the block as malformed.
fn anchor_line_text(block: &str) -> Option<String> {
    let marked = Regex::new(r"^\s*>\s*\d+:\s?(?P<text>.*)$").expect("valid regex");
    for line in block.lines() {
        if let Some(caps) = marked.captures(line) {
            return Some(caps["text"].to_string());
        }
    }
    return None;
}

/// A per-record validation failure, reported with the record's position.
fn invalid(raw: &RawEntry, reason: &str) -> Error {
    return Error::InvalidEntry {
        catalog_lineno: raw.catalog_lineno,
        path: raw.path.clone(),
        reason: reason.to_string(),
    };
}

/// Convert a raw record into a structured entry plus its lookup key.
///
/// The anchor line from the fenced block is relocated in the current source;
/// the key's `source_line` is the line at the **new** location, so the key
/// tracks edits to surrounding context while still requiring the anchor line
/// itself to match.
///
/// # Errors
///
/// Returns `Error::InvalidEntry` when the record is missing its context
/// block or a required list item, `Error::ObsoleteEntry` when the block has
/// no anchor line or the anchor text cannot be relocated, and `Error::Io`
/// when the referenced source file cannot be read at all.
pub fn normalize(cache: &mut SourceCache, raw: &RawEntry) -> Result<(Key, Entry), Error> {
    let context = raw
        .context
        .as_deref()
        .ok_or_else(|| return invalid(raw, "missing context block"))?;
    let old_source_line = anchor_line_text(context)
        .ok_or(Error::ObsoleteEntry { reason: "context block has no anchor line" })?;

    let msg_text = raw
        .message
        .clone()
        .ok_or_else(|| return invalid(raw, "missing `message` item"))?;
    let author = raw
        .author
        .clone()
        .ok_or_else(|| return invalid(raw, "missing `author` item"))?;
    let date = raw
        .date
        .clone()
        .ok_or_else(|| return invalid(raw, "missing `date` item"))?;

    let path = Path::new(&raw.path);
    let new_lineno = anchor::find_anchor_lineno(cache, path, &old_source_line, raw.lineno)?;
    let srctxt = anchor::read_anchor(cache, path, new_lineno, raw.lineno)?;
    let source_line = srctxt.source_line.clone();

    let entry = Entry {
        author,
        date,
        msg_id: raw.msg_id.clone(),
        msg_text: msg_text.clone(),
        path: raw.path.clone(),
        srctxt: Some(srctxt),
        symbol: raw.symbol.clone(),
    };
    let key = Key {
        msg_id: raw.msg_id.clone(),
        msg_text,
        path: raw.path.clone(),
        source_line,
        symbol: raw.symbol.clone(),
    };
    return Ok((key, entry));
}
