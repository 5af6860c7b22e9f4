//! Core domain types for findings, catalog keys, entries, and source anchors.

/// The enclosing definition line recorded alongside a context window when it
/// falls before the window start. Never constructed when the window already
/// shows the definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefLine {
    /// Zero-based line index of the definition line in the source file.
    pub idx: usize,
    /// Text of the definition line, trailing whitespace stripped.
    pub text: String,
}

/// One acknowledged finding as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Who acknowledged the finding.
    pub author: String,
    /// When the finding was acknowledged (opaque timestamp string).
    pub date: String,
    /// Analyzer message id, e.g. `W0511`.
    pub msg_id: String,
    /// Analyzer message text at acknowledgment time.
    pub msg_text: String,
    /// Path of the analyzed source file.
    pub path: String,
    /// Source anchor. `None` is a header-only acknowledgment that carries
    /// no line context and is not preserved across a save cycle.
    pub srctxt: Option<SourceText>,
    /// Analyzer symbol, e.g. `fixme`.
    pub symbol: String,
}

/// One observation reported by the external analyzer. Fields are opaque to
/// the catalog engine; they are matched, never interpreted.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Finding {
    /// One-based line number of the finding.
    pub lineno: usize,
    /// Analyzer message id.
    pub msg_id: String,
    /// Analyzer message text.
    pub msg_text: String,
    /// Path of the analyzed source file.
    pub path: String,
    /// Analyzer symbol name.
    pub symbol: String,
}

/// Stable identity for a catalog entry.
///
/// Deliberately strict: two occurrences of the "same" issue produce the same
/// key only if all five fields are byte-identical. It carries no line number,
/// so the key survives edits elsewhere in the file; the fuzzy matcher exists
/// to bridge near-identical keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    /// Analyzer message id.
    pub msg_id: String,
    /// Analyzer message text.
    pub msg_text: String,
    /// Path of the analyzed source file.
    pub path: String,
    /// Anchor line text, trailing whitespace stripped.
    pub source_line: String,
    /// Analyzer symbol name.
    pub symbol: String,
}

/// Anchor into a source file: where the acknowledged line sits now, where it
/// sat at catalog-write time, and the context window around it.
///
/// Invariant: `start_idx <= new_lineno - 1 < end_idx <= file length`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    /// Context window lines, line terminators stripped.
    pub context: Vec<String>,
    /// Enclosing definition line, only when outside the context window.
    pub def_line: Option<DefLine>,
    /// Exclusive end of the context window (zero-based line index).
    pub end_idx: usize,
    /// One-based line number where the anchor text sits now.
    pub new_lineno: usize,
    /// One-based line number recorded at catalog-write time.
    pub old_lineno: usize,
    /// Anchor line text, trailing whitespace stripped.
    pub source_line: String,
    /// Inclusive start of the context window (zero-based line index).
    pub start_idx: usize,
}

impl Key {
    /// The key a freshly observed finding would carry, given the current
    /// text of its anchor line.
    pub fn for_finding(finding: &Finding, source_line: &str) -> Self {
        return Self {
            msg_id: finding.msg_id.clone(),
            msg_text: finding.msg_text.clone(),
            path: finding.path.clone(),
            source_line: source_line.trim_end().to_string(),
            symbol: finding.symbol.clone(),
        };
    }
}
