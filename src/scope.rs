//! ScopeStack — активные scope, от внешнего (index 0) к внутреннему.
//!
//! Меняется только в LIFO-порядке. Проверка "exit без enter" делается здесь:
//! `pop()` на пустом стеке возвращает None, recorder превращает это в ScopeUnderflow.

use std::path::{Component, Path, PathBuf};

#[derive(Debug, Default, Clone)]
pub struct ScopeStack {
    frames: Vec<String>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str) {
        self.frames.push(name.to_string());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.frames.pop()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Copy of the current frames (frozen into managed artifacts at store time).
    pub fn snapshot(&self) -> Vec<String> {
        self.frames.clone()
    }
}

/// Relative directory for a scope path: scope1/scope2/...
///
/// Names are split on separators and only plain components are kept, so an
/// absolute name or ".." never leaves the output root.
pub fn scope_dir(scopes: &[String]) -> PathBuf {
    let mut dir = PathBuf::new();
    for s in scopes {
        push_relative(&mut dir, s);
    }
    dir
}

/// Append the plain components of `part` ("/a/../b" -> "a/b").
pub(crate) fn push_relative(path: &mut PathBuf, part: &str) {
    for c in Path::new(part).components() {
        if let Component::Normal(seg) = c {
            path.push(seg);
        }
    }
}
