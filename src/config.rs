use std::path::{Path, PathBuf};

use crate::error::Error;

/// Project configuration loaded from `.lintack.toml`.
pub struct Config {
    /// Path of the catalog document, relative to the project root.
    pub catalog: PathBuf,
}

/// Raw TOML structure for `.lintack.toml`.
#[derive(serde::Deserialize)]
struct LintackTomlConfig {
    #[serde(default)]
    catalog: Option<PathBuf>,
}

impl Config {
    /// Load config from `.lintack.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist. Returns an error if the
    /// file exists but is malformed; never silently falls back to defaults
    /// when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(".lintack.toml");
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::defaults()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: LintackTomlConfig = toml::from_str(&content)?;
        Ok(Self {
            catalog: raw.catalog.unwrap_or_else(|| PathBuf::from("lintack.md")),
        })
    }

    /// Default config: the catalog lives at `lintack.md` in the root.
    fn defaults() -> Self {
        Self { catalog: PathBuf::from("lintack.md") }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.catalog, PathBuf::from("lintack.md"));
    }

    #[test]
    fn catalog_path_is_read_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".lintack.toml"), "catalog = \"docs/acks.md\"\n")
            .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.catalog, PathBuf::from("docs/acks.md"));
    }

    #[test]
    fn malformed_config_is_a_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".lintack.toml"), "catalog = [not toml").unwrap();
        assert!(matches!(Config::load(dir.path()), Err(Error::TomlDe(_))));
    }
}
