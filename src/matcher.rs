//! Fuzzy entry lookup: bridging near-identical keys across small edits.
//!
//! Exact key equality is deliberately strict, so a reworded message or a
//! lightly edited source line would otherwise force re-acknowledgment. The
//! matcher tolerates small edits within a bounded edit distance, and treats
//! any ambiguity as no match: erring toward re-acknowledgment beats silently
//! picking the wrong prior entry.

use crate::catalog::Catalog;
use crate::types::{Entry, Key};

/// Maximum Levenshtein distance tolerated per compared field.
pub const MAX_EDIT_DISTANCE_ABS: usize = 4;

/// Maximum distance as a percentage of the longer compared string.
pub const MAX_EDIT_DISTANCE_PCT: usize = 20;

/// Look up the catalog entry for `search_key`.
///
/// Exact membership wins immediately. Otherwise candidates are the entries
/// sharing (msg_id, path, symbol), and one is returned only when it is the
/// single candidate whose message text and source line both lie within
/// tolerance of the search key's.
pub fn find_entry<'c>(catalog: &'c Catalog, search_key: &Key) -> Option<&'c Entry> {
    if let Some(entry) = catalog.get(search_key) {
        return Some(entry);
    }

    let mut qualifying = catalog
        .iter()
        .filter(|(key, _)| {
            return key.msg_id == search_key.msg_id
                && key.path == search_key.path
                && key.symbol == search_key.symbol
                && within_tolerance(&key.msg_text, &search_key.msg_text)
                && within_tolerance(&key.source_line, &search_key.source_line);
        })
        .map(|(_, entry)| return entry);

    return match (qualifying.next(), qualifying.next()) {
        (Some(entry), None) => Some(entry),
        // Zero or several qualifying candidates both mean no match.
        _ => None,
    };
}

/// Whether two strings differ by at most the absolute bound and at most
/// the percentage bound of the longer string. A zero-length denominator is
/// treated as 0% distance, so only an exact empty/empty pair qualifies.
fn within_tolerance(a: &str, b: &str) -> bool {
    let dist = strsim::levenshtein(a, b);
    if dist > MAX_EDIT_DISTANCE_ABS {
        return false;
    }
    let longer = a.chars().count().max(b.chars().count());
    return dist * 100 <= MAX_EDIT_DISTANCE_PCT * longer;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Entry, Key};

    fn key(msg_text: &str, source_line: &str) -> Key {
        Key {
            msg_id: "W0511".to_string(),
            msg_text: msg_text.to_string(),
            path: "src/queue.py".to_string(),
            source_line: source_line.to_string(),
            symbol: "fixme".to_string(),
        }
    }

    fn entry(msg_text: &str, author: &str) -> Entry {
        Entry {
            author: author.to_string(),
            date: "2026-03-01T10:00:00".to_string(),
            msg_id: "W0511".to_string(),
            msg_text: msg_text.to_string(),
            path: "src/queue.py".to_string(),
            srctxt: None,
            symbol: "fixme".to_string(),
        }
    }

    #[test]
    fn exact_key_wins() {
        let mut catalog = Catalog::new();
        catalog.insert(key("TODO: handle empty queue", "# a"), entry("TODO: handle empty queue", "ada"));

        let found = find_entry(&catalog, &key("TODO: handle empty queue", "# a")).unwrap();
        assert_eq!(found.author, "ada");
    }

    #[test]
    fn single_candidate_within_tolerance_matches() {
        let mut catalog = Catalog::new();
        catalog.insert(
            key("TODO: handle the empty queue case", "        # TODO: handle it"),
            entry("TODO: handle the empty queue case", "ada"),
        );

        // One word tweaked in the message, one in the line: both within 4 edits.
        let found = find_entry(
            &catalog,
            &key("TODO: handle the empty queue cases", "        # TODO: handle is"),
        )
        .unwrap();
        assert_eq!(found.author, "ada");
    }

    #[test]
    fn ambiguous_candidates_match_nothing() {
        let mut catalog = Catalog::new();
        catalog.insert(
            key("unused variable 'spam_a'", "    spam_a = 1"),
            entry("unused variable 'spam_a'", "first"),
        );
        catalog.insert(
            key("unused variable 'spam_b'", "    spam_b = 1"),
            entry("unused variable 'spam_b'", "second"),
        );

        // Both prior entries are within tolerance of the search key.
        let found = find_entry(&catalog, &key("unused variable 'spam_c'", "    spam_c = 1"));
        assert!(found.is_none());
    }

    #[test]
    fn absolute_bound_rejects_distant_text() {
        let mut catalog = Catalog::new();
        catalog.insert(
            key("a long message text that stays put in the file", "line"),
            entry("a long message text that stays put in the file", "ada"),
        );

        // Five edits: under 20% of the string, but over the absolute cap.
        let found = find_entry(
            &catalog,
            &key("a long message text that stays put in the file!!!!!", "line"),
        );
        assert!(found.is_none());
    }

    #[test]
    fn percentage_bound_rejects_short_strings() {
        // 4 edits on a 12-char string passes the absolute bound but is 33%.
        assert!(!within_tolerance("abcdefghijkl", "abcdefgh9912"));
        // The same 4 edits on a 40-char string is 10%.
        assert!(within_tolerance(
            "abcdefghijklmnopqrstuvwxyz0123456789abcd",
            "abcdefghijklmnopqrstuvwxyz0123456789zzzz",
        ));
    }

    #[test]
    fn empty_against_empty_is_zero_distance() {
        assert!(within_tolerance("", ""));
        assert!(!within_tolerance("", "x"));
    }

    #[test]
    fn candidates_must_share_identity_fields() {
        let mut catalog = Catalog::new();
        let mut other = key("TODO: handle empty queue", "# a");
        other.symbol = "todo".to_string();
        catalog.insert(other, entry("TODO: handle empty queue", "ada"));

        // Same message and line, different symbol: not a candidate at all.
        let found = find_entry(&catalog, &key("TODO: handle empty queues", "# a"));
        assert!(found.is_none());
    }
}
