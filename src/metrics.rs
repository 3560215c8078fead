//! Lightweight per-recorder metrics.
//!
//! Счётчики живут в самом Recorder (а не в глобальных static), чтобы два
//! независимых recorder'а в одном процессе (например, в тестах) не смешивали цифры.
//! Recorder однопоточный, поэтому хватает Cell.

use serde::Serialize;
use std::cell::Cell;

#[derive(Debug, Default)]
pub(crate) struct Counters {
    scopes_entered: Cell<u64>,
    scopes_exited: Cell<u64>,
    artifacts_stored: Cell<u64>,
    artifacts_released: Cell<u64>,
    direct_saves: Cell<u64>,
    files_written: Cell<u64>,
    manifest_lines: Cell<u64>,
}

#[inline]
fn bump(c: &Cell<u64>) {
    c.set(c.get().saturating_add(1));
}

impl Counters {
    pub(crate) fn record_scope_enter(&self) {
        bump(&self.scopes_entered);
        bump(&self.manifest_lines);
    }

    pub(crate) fn record_scope_exit(&self) {
        bump(&self.scopes_exited);
        bump(&self.manifest_lines);
    }

    pub(crate) fn record_store(&self) {
        bump(&self.artifacts_stored);
        bump(&self.manifest_lines);
    }

    pub(crate) fn record_release(&self) {
        bump(&self.artifacts_released);
    }

    pub(crate) fn record_direct_save(&self, appended: bool) {
        bump(&self.direct_saves);
        if appended {
            bump(&self.manifest_lines);
        }
    }

    pub(crate) fn record_file_written(&self) {
        bump(&self.files_written);
    }

    pub(crate) fn snapshot(&self) -> RecorderMetrics {
        RecorderMetrics {
            scopes_entered: self.scopes_entered.get(),
            scopes_exited: self.scopes_exited.get(),
            artifacts_stored: self.artifacts_stored.get(),
            artifacts_released: self.artifacts_released.get(),
            direct_saves: self.direct_saves.get(),
            files_written: self.files_written.get(),
            manifest_lines: self.manifest_lines.get(),
        }
    }
}

/// Point-in-time copy of a recorder's counters.
/// `manifest_lines` excludes the header line written by the gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecorderMetrics {
    pub scopes_entered: u64,
    pub scopes_exited: u64,
    pub artifacts_stored: u64,
    pub artifacts_released: u64,
    pub direct_saves: u64,
    pub files_written: u64,
    pub manifest_lines: u64,
}

impl RecorderMetrics {
    /// Managed artifacts stored but not yet released.
    pub fn artifacts_pending(&self) -> u64 {
        self.artifacts_stored.saturating_sub(self.artifacts_released)
    }
}
