//! Centralized configuration and builder for the recorder.
//!
//! Goals:
//! - Single place to collect the env lookups (REGRR_DIR / REGRR_EXT).
//! - RecorderConfig::from_env() reads the same env vars the instrumented binaries use.
//! - Fluent setters so tests can build a config without touching the process env.
//!
//! The config only describes *where* and *how* to write. Whether the recorder ends up
//! enabled is decided once by the gate (see `gate.rs`), which also creates the output root.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::consts::{DEFAULT_EXTENSION, ENV_DIR, ENV_EXT, MANIFEST_FILE};

/// Top-level configuration for a Recorder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecorderConfig {
    /// Output root directory. None => recorder is disabled.
    /// Env: REGRR_DIR (empty value is treated as absent)
    pub output_root: Option<PathBuf>,

    /// Output file extension, appended verbatim after "<name>.<ordinal>".
    /// Env: REGRR_EXT (default ".xml")
    pub extension: String,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            output_root: None,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl RecorderConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var(ENV_DIR) {
            if !v.trim().is_empty() {
                cfg.output_root = Some(PathBuf::from(v));
            }
        }

        if let Ok(v) = std::env::var(ENV_EXT) {
            let s = v.trim();
            if !s.is_empty() {
                cfg.extension = normalize_extension(s);
            }
        }

        cfg
    }

    // ---------- Fluent setters (builder-style) ----------

    pub fn with_output_root<P: Into<PathBuf>>(mut self, root: Option<P>) -> Self {
        self.output_root = root.map(Into::into);
        self
    }

    pub fn with_extension<S: AsRef<str>>(mut self, ext: S) -> Self {
        let s = ext.as_ref().trim();
        self.extension = if s.is_empty() {
            DEFAULT_EXTENSION.to_string()
        } else {
            normalize_extension(s)
        };
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> Self {
        self
    }

    /// Manifest path for a given output root (<root>/lists.txt).
    pub fn manifest_path_for(root: &Path) -> PathBuf {
        root.join(MANIFEST_FILE)
    }
}

/// "json" -> ".json"; ".json" остаётся как есть.
fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}

impl fmt::Display for RecorderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RecorderConfig {{ output_root: {}, extension: \"{}\" }}",
            self.output_root
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "none(disabled)".to_string()),
            self.extension,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_disabled_xml() {
        let cfg = RecorderConfig::default();
        assert!(cfg.output_root.is_none());
        assert_eq!(cfg.extension, ".xml");
    }

    #[test]
    fn extension_gets_leading_dot() {
        let cfg = RecorderConfig::default().with_extension("yml");
        assert_eq!(cfg.extension, ".yml");
        let cfg = cfg.with_extension(".json");
        assert_eq!(cfg.extension, ".json");
        let cfg = cfg.with_extension("  ");
        assert_eq!(cfg.extension, ".xml");
    }

    #[test]
    fn display_mentions_disabled() {
        let s = RecorderConfig::default().to_string();
        assert!(s.contains("disabled"), "{s}");
        let s = RecorderConfig::default()
            .with_output_root(Some("tmp"))
            .build()
            .to_string();
        assert!(s.contains("tmp"), "{s}");
    }
}
