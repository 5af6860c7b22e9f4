use regex::Regex;

/// A raw entry record as it appears in the catalog document, before
/// normalization. Field presence is validated by the normalizer, not here.
#[derive(Debug, Clone)]
pub struct RawEntry {
    /// `- `author : ...`` list item value, if seen.
    pub author: Option<String>,
    /// One-based line number of this record's header in the catalog file.
    pub catalog_lineno: usize,
    /// Fenced context block, verbatim including the fence lines, if seen.
    pub context: Option<String>,
    /// `- `date   : ...`` list item value, if seen.
    pub date: Option<String>,
    /// Source line number recorded in the header.
    pub lineno: usize,
    /// `- `message: ...`` list item value, if seen.
    pub message: Option<String>,
    /// Analyzer message id from the header.
    pub msg_id: String,
    /// Source file path from the header.
    pub path: String,
    /// Analyzer symbol from the header.
    pub symbol: String,
}

/// Classified shape of a single catalog document line.
#[derive(Debug)]
pub enum LineShape {
    /// Opening fence; everything through the matching close is context text.
    FenceOpen {
        /// The fence marker, three backticks or three tildes.
        marker: &'static str,
    },
    /// `## File {path} - Line {lineno} - {msg_id} ({symbol})`
    Header {
        /// Source line number from the header.
        lineno: usize,
        /// Analyzer message id.
        msg_id: String,
        /// Source file path.
        path: String,
        /// Analyzer symbol.
        symbol: String,
    },
    /// `` - `key: value` `` for key in {message, author, date}.
    ListItem {
        /// The recognized key.
        key: String,
        /// The captured value.
        value: String,
    },
    /// Anything else: prose, blank lines, document boilerplate. Ignored.
    Other,
}

/// Compiled patterns for the two recognized line shapes.
pub struct LinePatterns {
    header: Regex,
    list_item: Regex,
}

impl LinePatterns {
    /// Compile the line-shape patterns.
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded patterns are invalid (compile-time invariant).
    pub fn new() -> Self {
        Self {
            header: Regex::new(
                r"^## File (?P<path>.+) - Line (?P<lineno>\d+) - (?P<msg_id>\w\d+) \((?P<symbol>.*)\)$",
            )
            .expect("valid regex"),
            list_item: Regex::new(r"^\s*- `(?P<key>message|author|date)\s*:\s(?P<value>.*)`$")
                .expect("valid regex"),
        }
    }
}

impl Default for LinePatterns {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify one document line. A header whose line number overflows is
/// treated as prose rather than a record boundary.
pub fn classify(patterns: &LinePatterns, line: &str) -> LineShape {
    if line.starts_with("```") {
        return LineShape::FenceOpen { marker: "```" };
    }
    if line.starts_with("~~~") {
        return LineShape::FenceOpen { marker: "~~~" };
    }

    if let Some(caps) = patterns.header.captures(line) {
        let Ok(lineno) = caps["lineno"].parse::<usize>() else {
            return LineShape::Other;
        };
        return LineShape::Header {
            lineno,
            msg_id: caps["msg_id"].to_string(),
            path: caps["path"].to_string(),
            symbol: caps["symbol"].to_string(),
        };
    }

    if let Some(caps) = patterns.list_item.captures(line) {
        return LineShape::ListItem {
            key: caps["key"].to_string(),
            value: caps["value"].to_string(),
        };
    }

    LineShape::Other
}

/// Scanner state. Fenced blocks swallow every line, recognized shapes
/// included, until the matching close fence.
enum State {
    Idle,
    InEntry(RawEntry),
    InFencedBlock {
        block: String,
        entry: Option<RawEntry>,
        marker: &'static str,
    },
}

/// Scan a catalog document into raw entry records.
///
/// Forward-only accumulation: a header opens a record and closes any record
/// in progress; list items and fenced blocks attach to the open record; end
/// of input flushes the last record. Content between recognized markers is
/// tolerated and ignored, as are fences and list items outside any record.
pub fn scan(text: &str) -> Vec<RawEntry> {
    let patterns = LinePatterns::new();
    let mut records = Vec::new();
    let mut state = State::Idle;

    for (i, line) in text.lines().enumerate() {
        state = step(state, line, i + 1, &patterns, &mut records);
    }

    match state {
        State::Idle => {}
        State::InEntry(entry) => records.push(entry),
        // Unterminated fence: keep what was collected and flush the record.
        State::InFencedBlock { block, entry, .. } => {
            if let Some(mut entry) = entry {
                entry.context = Some(block);
                records.push(entry);
            }
        }
    }

    records
}

/// Advance the scanner by one line.
fn step(
    state: State,
    line: &str,
    catalog_lineno: usize,
    patterns: &LinePatterns,
    records: &mut Vec<RawEntry>,
) -> State {
    let state = match state {
        State::InFencedBlock { mut block, entry, marker } => {
            block.push_str(line);
            block.push('\n');
            if line.trim() == marker {
                return match entry {
                    // Stray fence outside any record: consumed and discarded.
                    None => State::Idle,
                    Some(mut entry) => {
                        entry.context = Some(block);
                        State::InEntry(entry)
                    }
                };
            }
            return State::InFencedBlock { block, entry, marker };
        }
        other => other,
    };

    match classify(patterns, line) {
        LineShape::FenceOpen { marker } => {
            let entry = if let State::InEntry(entry) = state { Some(entry) } else { None };
            State::InFencedBlock { block: format!("{line}\n"), entry, marker }
        }
        LineShape::Header { lineno, msg_id, path, symbol } => {
            if let State::InEntry(prev) = state {
                records.push(prev);
            }
            State::InEntry(RawEntry {
                author: None,
                catalog_lineno,
                context: None,
                date: None,
                lineno,
                message: None,
                msg_id,
                path,
                symbol,
            })
        }
        LineShape::ListItem { key, value } => match state {
            State::InEntry(mut entry) => {
                match key.as_str() {
                    "author" => entry.author = Some(value),
                    "date" => entry.date = Some(value),
                    "message" => entry.message = Some(value),
                    _ => {}
                }
                State::InEntry(entry)
            }
            // A list item before any header is prose.
            other => other,
        },
        LineShape::Other => state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\
# `lintack`

Some boilerplate prose the scanner must ignore.

## File src/queue.py - Line 6 - W0511 (fixme)

- `message: TODO: handle empty queue`
- `author : Ada <ada@example.com>`
- `date   : 2026-03-01T10:00:00`

```
  4:
  5:     def pop(self):
> 6:         # TODO: handle empty queue
  7:         return self.items.pop(0)
```


## File src/queue.py - Line 2 - R0902 (too-many-instance-attributes)

- `message: Too many instance attributes (10/7)`
- `author : Ada <ada@example.com>`
- `date   : 2026-03-02T09:30:00`
";

    #[test]
    fn classifies_header_lines() {
        let patterns = LinePatterns::new();
        let shape = classify(
            &patterns,
            "## File src/queue.py - Line 6 - W0511 (fixme)",
        );
        let LineShape::Header { lineno, msg_id, path, symbol } = shape else {
            panic!("expected header, got {shape:?}");
        };
        assert_eq!((lineno, msg_id.as_str()), (6, "W0511"));
        assert_eq!((path.as_str(), symbol.as_str()), ("src/queue.py", "fixme"));
    }

    #[test]
    fn rejects_near_miss_headers() {
        let patterns = LinePatterns::new();
        let cases = [
            "## File src/queue.py",
            "### Line 6 - W0511 (fixme)",
            "- ## File src/queue.py - Line 6 - W0511 (fixme)",
            "## File src/queue.py - Line six - W0511 (fixme)",
        ];
        for case in cases {
            assert!(
                matches!(classify(&patterns, case), LineShape::Other),
                "classified as non-prose: {case}"
            );
        }
    }

    #[test]
    fn classifies_list_items_with_padded_keys() {
        let patterns = LinePatterns::new();
        let shape = classify(&patterns, "- `author : Ada <ada@example.com>`");
        let LineShape::ListItem { key, value } = shape else {
            panic!("expected list item, got {shape:?}");
        };
        assert_eq!(key, "author");
        assert_eq!(value, "Ada <ada@example.com>");

        // Unrecognized keys are prose.
        assert!(matches!(
            classify(&patterns, "- `ignored: yes`"),
            LineShape::Other
        ));
    }

    #[test]
    fn scans_records_with_and_without_context() {
        let records = scan(DOC);
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.msg_id, "W0511");
        assert_eq!(first.lineno, 6);
        assert_eq!(first.catalog_lineno, 5);
        assert_eq!(first.message.as_deref(), Some("TODO: handle empty queue"));
        let context = first.context.as_deref().unwrap();
        assert!(context.starts_with("```\n"));
        assert!(context.ends_with("```\n"));
        assert!(context.contains("> 6:         # TODO: handle empty queue\n"));

        let second = &records[1];
        assert_eq!(second.msg_id, "R0902");
        assert!(second.context.is_none());
    }

    #[test]
    fn header_closes_the_record_in_progress() {
        let doc = "\
## File a.py - Line 1 - W0511 (fixme)
## File b.py - Line 2 - W0511 (fixme)
- `message: second`
";
        let records = scan(doc);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].path, "a.py");
        assert!(records[0].message.is_none());
        assert_eq!(records[1].message.as_deref(), Some("second"));
    }

    #[test]
    fn fence_swallows_header_lookalikes() {
        let doc = "\
## File a.py - Line 1 - W0511 (fixme)
~~~
## File b.py - Line 9 - E0001 (syntax-error)
~~~
";
        let records = scan(doc);
        assert_eq!(records.len(), 1);
        assert!(
            records[0]
                .context
                .as_deref()
                .unwrap()
                .contains("## File b.py - Line 9")
        );
    }

    #[test]
    fn stray_fence_outside_records_is_discarded() {
        let doc = "\
```
> 1: not attached to anything
```
## File a.py - Line 1 - W0511 (fixme)
";
        let records = scan(doc);
        assert_eq!(records.len(), 1);
        assert!(records[0].context.is_none());
    }

    #[test]
    fn unterminated_fence_flushes_partial_context() {
        let doc = "\
## File a.py - Line 1 - W0511 (fixme)
```
> 1: dangling
";
        let records = scan(doc);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].context.as_deref(), Some("```\n> 1: dangling\n"));
    }
}
