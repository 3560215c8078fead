//! RAII guards for scopes and managed artifacts.
//!
//! Both guards run their closing action on every exit path of the owning block
//! (normal return, early return, `?`, unwinding) via Drop. Drop cannot return an
//! error, so a failure there is logged and swallowed; use `close()` to get it.
//! Neither guard is Clone: there is exactly one owner of the closing action.

use log::warn;

use crate::error::Result;
use crate::recorder::Recorder;
use crate::registry::MatHandle;

/// Exits the scope entered by `Recorder::scoped`.
#[must_use = "the scope is exited as soon as the guard is dropped"]
pub struct ScopeGuard<'r> {
    rec: &'r Recorder,
    armed: bool,
}

impl<'r> ScopeGuard<'r> {
    pub(crate) fn new(rec: &'r Recorder) -> Self {
        Self { rec, armed: true }
    }

    /// Exit now and report the result.
    pub fn close(mut self) -> Result<()> {
        self.armed = false;
        self.rec.exit_scope()
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = self.rec.exit_scope() {
            warn!("regrr: scope exit failed in drop: {e}");
        }
    }
}

/// Releases the artifact stored by `Recorder::managed`. Keeps only the name:
/// the data belongs to the recorder until release.
#[must_use = "the artifact is released as soon as the guard is dropped"]
pub struct ArtifactGuard<'r> {
    rec: &'r Recorder,
    name: String,
    armed: bool,
}

impl<'r> ArtifactGuard<'r> {
    pub(crate) fn new(rec: &'r Recorder, name: &str) -> Self {
        Self {
            rec,
            name: name.to_string(),
            armed: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handle to the stored data (see `Recorder::get`).
    pub fn get(&self) -> Result<MatHandle> {
        self.rec.get(&self.name)
    }

    /// Release now and report the result.
    pub fn close(mut self) -> Result<()> {
        self.armed = false;
        self.rec.release(&self.name)
    }
}

impl Drop for ArtifactGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = self.rec.release(&self.name) {
            warn!("regrr: release of '{}' failed in drop: {e}", self.name);
        }
    }
}
