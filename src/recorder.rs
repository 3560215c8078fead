//! Recorder — сессия regression capture: scope-стек, реестр managed-артефактов,
//! общий счётчик ordinal, manifest и serializer за одним объектом.
//!
//! Semantics in short:
//! - the gate is decided once in `new()`; when disabled every mutating call is a
//!   no-op returning Ok, and `get` fails with NotFound;
//! - `store` fixes ordinal + scope snapshot and writes the manifest line *now*,
//!   `release` writes the bytes *later* using the frozen values;
//! - direct `save` writes immediately using the live scope stack and, with
//!   `append`, logs the manifest line after the file.
//!
//! The recorder is single-threaded (`RefCell` inside, so it is `!Sync`). Guards
//! borrow it shared, which lets scopes and artifacts nest freely.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::codec::ArrayCodec;
use crate::config::RecorderConfig;
use crate::error::{RegrrError, Result};
use crate::gate::{Gate, Output};
use crate::guard::{ArtifactGuard, ScopeGuard};
use crate::manifest::ManifestEvent;
use crate::mat::Mat;
use crate::metrics::{Counters, RecorderMetrics};
use crate::registry::{ArtifactRegistry, MatHandle};
use crate::scope::ScopeStack;
use crate::serializer::ArtifactSerializer;

#[derive(Debug, Default)]
struct State {
    scopes: ScopeStack,
    registry: ArtifactRegistry,
}

pub struct Recorder {
    config: RecorderConfig,
    gate: Gate,
    serializer: Option<ArtifactSerializer>,
    state: RefCell<State>,
    counters: Counters,
}

impl Recorder {
    /// Resolve the gate for `config` and build the session.
    /// Setup failures never surface here: they leave the recorder disabled.
    pub fn new(config: RecorderConfig) -> Self {
        let gate = Gate::resolve(&config);
        let serializer = gate
            .output()
            .map(|o| ArtifactSerializer::new(o.root.clone(), o.extension.clone()));
        Self {
            config,
            gate,
            serializer,
            state: RefCell::new(State::default()),
            counters: Counters::default(),
        }
    }

    /// Same as `new(RecorderConfig::from_env())` (REGRR_DIR / REGRR_EXT).
    pub fn from_env() -> Self {
        Self::new(RecorderConfig::from_env())
    }

    /// Always-disabled recorder (no output root).
    pub fn disabled() -> Self {
        Self::new(RecorderConfig::default())
    }

    /// Build with an explicit codec instead of the one picked from the extension.
    pub fn with_codec(config: RecorderConfig, codec: Box<dyn ArrayCodec>) -> Self {
        let mut rec = Self::new(config);
        rec.serializer = rec.serializer.take().map(|s| s.with_codec(codec));
        rec
    }

    // ---------- Introspection ----------

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.gate.is_enabled()
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Output root of an enabled recorder.
    pub fn output_root(&self) -> Option<&Path> {
        self.gate.output().map(|o| o.root.as_path())
    }

    pub fn manifest_path(&self) -> Option<&Path> {
        self.gate.output().map(|o| o.manifest.path())
    }

    /// Current scope nesting depth.
    pub fn depth(&self) -> usize {
        self.state.borrow().scopes.depth()
    }

    /// Snapshot of the live scope stack, outer to inner.
    pub fn scope_path(&self) -> Vec<String> {
        self.state.borrow().scopes.snapshot()
    }

    /// Names of managed artifacts stored and not yet released (sorted).
    pub fn live_artifacts(&self) -> Vec<String> {
        self.state.borrow().registry.names()
    }

    /// Last ordinal issued for `name` (0 if never issued).
    pub fn last_ordinal(&self, name: &str) -> u32 {
        self.state.borrow().registry.last_ordinal(name)
    }

    pub fn metrics(&self) -> RecorderMetrics {
        self.counters.snapshot()
    }

    fn output(&self) -> Option<&Output> {
        self.gate.output()
    }

    // ---------- Scopes ----------

    /// Push `name` and log `+ name`.
    pub fn enter_scope(&self, name: &str) -> Result<()> {
        let Some(out) = self.output() else {
            return Ok(());
        };
        self.state.borrow_mut().scopes.push(name);
        out.manifest.append(&ManifestEvent::Enter(name))?;
        self.counters.record_scope_enter();
        Ok(())
    }

    /// Pop the innermost scope and log `-`.
    pub fn exit_scope(&self) -> Result<()> {
        let Some(out) = self.output() else {
            // Disabled: unbalanced exits are ignored.
            return Ok(());
        };
        if self.state.borrow_mut().scopes.pop().is_none() {
            return Err(RegrrError::ScopeUnderflow);
        }
        out.manifest.append(&ManifestEvent::Exit)?;
        self.counters.record_scope_exit();
        Ok(())
    }

    /// Enter `name` now, exit when the returned guard goes out of scope.
    pub fn scoped(&self, name: &str) -> Result<ScopeGuard<'_>> {
        self.enter_scope(name)?;
        Ok(ScopeGuard::new(self))
    }

    // ---------- Managed artifacts ----------

    /// Register `data` under `name`. The ordinal and the scope path are fixed
    /// here and the manifest line is written immediately; the file itself is
    /// written by `release`.
    pub fn store(&self, name: &str, data: Mat) -> Result<()> {
        let Some(out) = self.output() else {
            return Ok(());
        };
        let ordinal = {
            let mut st = self.state.borrow_mut();
            let snapshot = st.scopes.snapshot();
            st.registry.insert(name, data, snapshot)?
        };
        out.manifest
            .append(&ManifestEvent::Artifact { name, ordinal })?;
        self.counters.record_store();
        Ok(())
    }

    /// Handle to a stored artifact's data. Does not touch ordinal or manifest.
    ///
    /// Each artifact sits in its own cell, so handles to different artifacts
    /// can be borrowed at the same time and other recorder calls keep working
    /// while a borrow is alive. Conflicting borrows of one artifact, or a
    /// `release` of an artifact that is still borrowed, fail with `Busy`.
    pub fn get(&self, name: &str) -> Result<MatHandle> {
        if !self.is_enabled() {
            return Err(RegrrError::not_found(name));
        }
        let st = self.state.borrow();
        Ok(st.registry.get(name)?.handle())
    }

    /// Write a stored artifact with its frozen ordinal/scope path, then forget it.
    /// The entry stays in the registry until the write succeeds: on failure the
    /// data is still there and `release` can be retried.
    pub fn release(&self, name: &str) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        let (handle, ordinal, scope_path) = {
            let st = self.state.borrow();
            let a = st.registry.get(name)?;
            (a.handle(), a.ordinal, a.scope_path.clone())
        };
        {
            let data = handle.borrow()?;
            self.save_with(&data, false, Some(ordinal), Some(&scope_path), name)?;
        }
        self.state.borrow_mut().registry.remove(name)?;
        self.counters.record_release();
        Ok(())
    }

    /// Store now, release when the returned guard goes out of scope.
    pub fn managed(&self, name: &str, data: Mat) -> Result<ArtifactGuard<'_>> {
        self.store(name, data)?;
        Ok(ArtifactGuard::new(self, name))
    }

    // ---------- Direct save ----------

    /// Write `data` immediately under the live scope path with the next ordinal
    /// for `name`. With `append`, the manifest line follows the file write.
    pub fn save(&self, data: &Mat, name: &str, append: bool) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        self.save_with(data, append, None, None, name)?;
        self.counters.record_direct_save(append);
        Ok(())
    }

    /// Common write path. `ordinal`/`scopes` = None => take them from the
    /// shared counter / live stack.
    fn save_with(
        &self,
        data: &Mat,
        append: bool,
        ordinal: Option<u32>,
        scopes: Option<&[String]>,
        name: &str,
    ) -> Result<Option<PathBuf>> {
        let (Some(out), Some(ser)) = (self.output(), self.serializer.as_ref()) else {
            return Ok(None);
        };

        let ordinal = match ordinal {
            Some(o) => o,
            None => self.state.borrow_mut().registry.next_ordinal(name),
        };
        let live;
        let scopes = match scopes {
            Some(s) => s,
            None => {
                live = self.scope_path();
                &live
            }
        };

        let path = ser.write(data, scopes, name, ordinal)?;
        self.counters.record_file_written();

        if append {
            out.manifest
                .append(&ManifestEvent::Artifact { name, ordinal })?;
        }
        Ok(Some(path))
    }
}
