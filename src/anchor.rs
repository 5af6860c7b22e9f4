//! Source anchor resolution: relocating a remembered line in the current
//! file and extracting the context around it.
//!
//! Anchors are matched on text, not line numbers. Line numbers drift as
//! files are edited; the literal line text is the ground truth, and the
//! recorded number is only a search hint.

use std::path::Path;

use crate::error::Error;
use crate::source::SourceCache;
use crate::types::{DefLine, SourceText};

/// Lines of context captured above and below the anchor line.
pub const CONTEXT_LINES: usize = 2;

/// First tokens that mark a definition boundary when walking upward for the
/// enclosing definition line. The catalog is analyzer-agnostic, so this
/// covers the common function/class-like openers rather than one language.
const DEF_KEYWORDS: [&str; 6] = ["class", "def", "fn", "function", "impl", "trait"];

/// How far from the recorded line the anchor search reaches, in lines.
/// Beyond this the line plausibly moved far, was deleted, or was rewritten,
/// and the entry is declared obsolete.
const SEARCH_RADIUS: isize = 100;

/// Find the current one-based line number of `old_text` in `path`.
///
/// Searches outward from `old_lineno`, alternating between the lower and
/// higher candidate at each offset (lower first), comparing
/// trailing-whitespace-stripped text. First match wins.
///
/// # Errors
///
/// Returns `Error::ObsoleteEntry` if no match exists within the search
/// radius, or `Error::Io` if the file cannot be read.
pub fn find_anchor_lineno(
    cache: &mut SourceCache,
    path: &Path,
    old_text: &str,
    old_lineno: usize,
) -> Result<usize, Error> {
    let lines = cache.lines(path)?;
    let target = old_text.trim_end();
    let old_idx = isize::try_from(old_lineno).unwrap_or(isize::MAX).saturating_sub(1);

    for offset in 0..SEARCH_RADIUS {
        // Lower candidate first; at offset 0 both collapse to the original index.
        for idx in [old_idx - offset, old_idx + offset] {
            let Ok(i) = usize::try_from(idx) else {
                continue;
            };
            if lines.get(i).is_some_and(|line| return line.trim_end() == target) {
                return Ok(i + 1);
            }
        }
    }

    return Err(Error::ObsoleteEntry { reason: "anchor text not found near recorded line" });
}

/// Extract the anchor at `new_lineno`: the literal line, a clamped ±2
/// context window, and the enclosing definition line when it falls before
/// the window.
///
/// # Errors
///
/// Returns `Error::ObsoleteEntry` if `new_lineno` lies outside the file,
/// or `Error::Io` if the file cannot be read.
pub fn read_anchor(
    cache: &mut SourceCache,
    path: &Path,
    new_lineno: usize,
    old_lineno: usize,
) -> Result<SourceText, Error> {
    let lines = cache.lines(path)?;
    let line_idx = new_lineno
        .checked_sub(1)
        .ok_or(Error::ObsoleteEntry { reason: "line number zero" })?;
    let Some(anchor) = lines.get(line_idx) else {
        return Err(Error::ObsoleteEntry { reason: "anchor line beyond end of file" });
    };

    let indent = indent_width(anchor);
    let start_idx = line_idx.saturating_sub(CONTEXT_LINES);
    let end_idx = (line_idx + CONTEXT_LINES + 1).min(lines.len());
    let context = lines[start_idx..end_idx]
        .iter()
        .map(|line| return strip_terminator(line).to_string())
        .collect();
    let def_line = find_enclosing_def(&lines, line_idx, indent, start_idx);

    return Ok(SourceText {
        context,
        def_line,
        end_idx,
        new_lineno,
        old_lineno,
        source_line: anchor.trim_end().to_string(),
        start_idx,
    });
}

/// Walk upward from the anchor line to the nearest strictly-less-indented
/// non-blank line opening with a definition keyword. Recorded only when it
/// lies before the window start; a qualifying line already inside the window
/// is omitted to avoid duplicating what the window shows.
fn find_enclosing_def(
    lines: &[String],
    line_idx: usize,
    indent: usize,
    start_idx: usize,
) -> Option<DefLine> {
    let mut idx = line_idx;
    while idx > 0 {
        let text = &lines[idx];
        if !text.trim().is_empty() && indent_width(text) < indent {
            let first = text.split_whitespace().next().unwrap_or("");
            if DEF_KEYWORDS.contains(&first) {
                if idx < start_idx {
                    return Some(DefLine { idx, text: strip_terminator(text).to_string() });
                }
                return None;
            }
        }
        idx -= 1;
    }
    return None;
}

/// Leading-whitespace width of a line, in bytes.
fn indent_width(line: &str) -> usize {
    return line.len().saturating_sub(line.trim_start().len());
}

/// A line without its terminator, handling both `\n` and `\r\n`.
fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    return line.strip_suffix('\r').unwrap_or(line);
}
