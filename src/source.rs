//! Bounded in-memory cache of source file lines.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use lru::LruCache;

use crate::error::Error;

/// A run typically touches one or two source files in sequence, so the cache
/// holds exactly two before evicting the least recently used.
const CACHE_CAPACITY: usize = 2;

/// Per-session cache of file contents, split into lines with their
/// terminators preserved. Owned by one load/save session and threaded
/// through the engine; there is no process-global state.
pub struct SourceCache {
    /// Cached line vectors keyed by source path.
    lines: LruCache<PathBuf, Rc<Vec<String>>>,
}

impl SourceCache {
    /// Create an empty cache.
    ///
    /// # Panics
    ///
    /// Panics if the capacity constant is zero (compile-time invariant).
    pub fn new() -> Self {
        let capacity = NonZeroUsize::new(CACHE_CAPACITY).expect("nonzero capacity");
        return Self { lines: LruCache::new(capacity) };
    }

    /// The lines of `path`, terminators preserved, from cache when possible.
    ///
    /// Repeat access for the same path returns the same shared allocation
    /// without re-reading the file; callers must treat it as read-only.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read.
    pub fn lines(&mut self, path: &Path) -> Result<Rc<Vec<String>>, Error> {
        if let Some(cached) = self.lines.get(path) {
            return Ok(Rc::clone(cached));
        }

        let text = std::fs::read_to_string(path)?;
        let lines: Rc<Vec<String>> =
            Rc::new(text.split_inclusive('\n').map(String::from).collect());
        self.lines.put(path.to_path_buf(), Rc::clone(&lines));
        return Ok(lines);
    }
}

impl Default for SourceCache {
    fn default() -> Self {
        return Self::new();
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn preserves_line_terminators() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "a.py", "first\nsecond\r\nlast");

        let mut cache = SourceCache::new();
        let lines = cache.lines(&path).unwrap();
        assert_eq!(lines.as_slice(), &["first\n", "second\r\n", "last"]);
    }

    #[test]
    fn repeat_access_returns_same_allocation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "a.py", "one\ntwo\n");

        let mut cache = SourceCache::new();
        let first = cache.lines(&path).unwrap();
        // Overwrite on disk: the cache must not notice.
        write_file(dir.path(), "a.py", "changed\n");
        let second = cache.lines(&path).unwrap();

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(second[0], "one\n");
    }

    #[test]
    fn evicts_least_recently_used_beyond_two_paths() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.py", "a\n");
        let b = write_file(dir.path(), "b.py", "b\n");
        let c = write_file(dir.path(), "c.py", "c\n");

        let mut cache = SourceCache::new();
        let a_first = cache.lines(&a).unwrap();
        let _ = cache.lines(&b).unwrap();
        let _ = cache.lines(&c).unwrap(); // evicts a

        write_file(dir.path(), "a.py", "rewritten\n");
        let a_second = cache.lines(&a).unwrap();
        assert!(!Rc::ptr_eq(&a_first, &a_second));
        assert_eq!(a_second[0], "rewritten\n");
    }
}
