//! gate — однократное решение enabled/disabled для Recorder.
//!
//! Resolve happens once, in `Recorder::new`:
//! - no output root        => Disabled;
//! - root + setup succeeds => Enabled (root created, lists.txt reset to "<ext>\n");
//! - setup I/O failure     => Disabled, warning logged, nothing returned to the caller.
//!
//! После решения режим не пересчитывается.

use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::RecorderConfig;
use crate::manifest::ManifestWriter;

/// Resolved output settings of an enabled recorder.
#[derive(Debug, Clone)]
pub struct Output {
    pub root: PathBuf,
    pub extension: String,
    pub manifest: ManifestWriter,
}

#[derive(Debug, Clone)]
pub enum Gate {
    Enabled(Output),
    Disabled,
}

impl Gate {
    pub fn resolve(cfg: &RecorderConfig) -> Gate {
        let gate = match cfg.output_root.as_deref() {
            None => Gate::Disabled,
            Some(root) => match setup(root, &cfg.extension) {
                Ok(out) => Gate::Enabled(out),
                Err(e) => {
                    warn!("regrr: cannot initialize regression capture, disabled: {e:#}");
                    Gate::Disabled
                }
            },
        };
        info!(
            "regrr initialized: enabled={}, extension=\"{}\", output_root=\"{}\", manifest=\"{}\"",
            gate.is_enabled(),
            cfg.extension,
            cfg.output_root
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            gate.output()
                .map(|o| o.manifest.path().display().to_string())
                .unwrap_or_default(),
        );
        gate
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        matches!(self, Gate::Enabled(_))
    }

    pub fn output(&self) -> Option<&Output> {
        match self {
            Gate::Enabled(o) => Some(o),
            Gate::Disabled => None,
        }
    }
}

fn setup(root: &Path, extension: &str) -> Result<Output> {
    // create_dir_all — noop, если каталог уже есть
    fs::create_dir_all(root)
        .with_context(|| format!("create output root {}", root.display()))?;

    let manifest = ManifestWriter::new(RecorderConfig::manifest_path_for(root));
    manifest
        .reset(extension)
        .with_context(|| format!("reset manifest {}", manifest.path().display()))?;

    Ok(Output {
        root: root.to_path_buf(),
        extension: extension.to_string(),
        manifest,
    })
}
