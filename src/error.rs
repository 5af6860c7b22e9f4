/// Crate-level error types for lintack.
///
/// The taxonomy mirrors how failures propagate: `ObsoleteEntry` and
/// `InvalidEntry` are caught at the per-record boundary during a catalog
/// load; everything else is fatal to the run.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A catalog record is structurally present but fails field validation.
    /// Logged with the catalog line number, then skipped; never fatal.
    #[error("invalid entry on line {catalog_lineno} of {path}: {reason}")]
    InvalidEntry {
        /// One-based line number of the record's header in the catalog file.
        catalog_lineno: usize,
        /// Path of the analyzed source file named by the record.
        path: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// A findings input line is not a valid finding record.
    #[error("findings input: {0}")]
    Json(
        /// The wrapped JSON deserialization error.
        #[from]
        serde_json::Error,
    ),

    /// An entry's anchor can no longer be located in current source, or its
    /// fenced context block has no recognizable anchor line. Expected and
    /// recoverable: the record is skipped without user-visible noise.
    #[error("obsolete entry: {reason}")]
    ObsoleteEntry {
        /// Why the entry was classified obsolete.
        reason: &'static str,
    },

    /// Config file deserialization failed.
    #[error("config: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),
}
