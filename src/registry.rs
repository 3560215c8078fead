//! ArtifactRegistry — managed-артефакты "в полёте" + счётчик вызовов по имени.
//!
//! Счётчик общий для managed-пути и direct save: ordinal для имени растёт
//! на 1 при каждом выпуске, начиная с 1, и никогда не сбрасывается.
//!
//! Данные каждого артефакта лежат в своей ячейке (`Rc<RefCell<Mat>>`): хэндл
//! одного артефакта не блокирует ни другие артефакты, ни остальной recorder.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{RegrrError, Result};
use crate::mat::Mat;

/// A stored array plus the location/sequence frozen at store time.
#[derive(Debug, Clone)]
pub struct ManagedArtifact {
    pub name: String,
    pub data: Rc<RefCell<Mat>>,
    pub scope_path: Vec<String>,
    pub ordinal: u32,
}

impl ManagedArtifact {
    pub fn handle(&self) -> MatHandle {
        MatHandle {
            name: self.name.clone(),
            cell: Rc::clone(&self.data),
        }
    }
}

/// Access to the data of one managed artifact, returned by `Recorder::get`.
///
/// Borrowing never panics: a conflicting borrow of the *same* artifact is
/// reported as `RegrrError::Busy`. A handle kept past `release` still points at
/// the data, but the recorder no longer writes it.
#[derive(Debug)]
pub struct MatHandle {
    name: String,
    cell: Rc<RefCell<Mat>>,
}

impl MatHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn borrow(&self) -> Result<Ref<'_, Mat>> {
        self.cell.try_borrow().map_err(|_| self.busy())
    }

    pub fn borrow_mut(&self) -> Result<RefMut<'_, Mat>> {
        self.cell.try_borrow_mut().map_err(|_| self.busy())
    }

    fn busy(&self) -> RegrrError {
        RegrrError::Busy {
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ArtifactRegistry {
    managed: HashMap<String, ManagedArtifact>,
    call_counts: HashMap<String, u32>,
}

impl ArtifactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ordinal for `name` (1, 2, 3, ...).
    pub fn next_ordinal(&mut self, name: &str) -> u32 {
        let c = self.call_counts.entry(name.to_string()).or_insert(0);
        *c += 1;
        *c
    }

    /// Last issued ordinal (0 if none yet).
    pub fn last_ordinal(&self, name: &str) -> u32 {
        self.call_counts.get(name).copied().unwrap_or(0)
    }

    /// Register a managed artifact. Fails before consuming an ordinal if the
    /// name is already held. Returns the ordinal.
    pub fn insert(&mut self, name: &str, data: Mat, scope_path: Vec<String>) -> Result<u32> {
        if self.managed.contains_key(name) {
            return Err(RegrrError::IdentityConflict {
                name: name.to_string(),
            });
        }
        let ordinal = self.next_ordinal(name);
        self.managed.insert(
            name.to_string(),
            ManagedArtifact {
                name: name.to_string(),
                data: Rc::new(RefCell::new(data)),
                scope_path,
                ordinal,
            },
        );
        Ok(ordinal)
    }

    pub(crate) fn get(&self, name: &str) -> Result<&ManagedArtifact> {
        self.managed.get(name).ok_or_else(|| RegrrError::not_found(name))
    }

    /// Take the artifact out of the registry.
    pub fn remove(&mut self, name: &str) -> Result<ManagedArtifact> {
        self.managed
            .remove(name)
            .ok_or_else(|| RegrrError::not_found(name))
    }

    /// Names currently held, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut v: Vec<String> = self.managed.keys().cloned().collect();
        v.sort();
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mat::Depth;

    fn m() -> Mat {
        Mat::zeros(1, 1, 1, Depth::F32)
    }

    #[test]
    fn ordinals_are_per_name() {
        let mut r = ArtifactRegistry::new();
        assert_eq!(r.next_ordinal("a"), 1);
        assert_eq!(r.next_ordinal("a"), 2);
        assert_eq!(r.next_ordinal("b"), 1);
        assert_eq!(r.last_ordinal("a"), 2);
        assert_eq!(r.last_ordinal("zzz"), 0);
    }

    #[test]
    fn conflict_does_not_consume_ordinal() {
        let mut r = ArtifactRegistry::new();
        assert_eq!(r.insert("M", m(), vec![]).unwrap(), 1);
        assert!(matches!(
            r.insert("M", m(), vec![]),
            Err(RegrrError::IdentityConflict { .. })
        ));
        assert_eq!(r.last_ordinal("M"), 1);
        r.remove("M").unwrap();
        assert_eq!(r.insert("M", m(), vec![]).unwrap(), 2);
    }

    #[test]
    fn missing_is_not_found() {
        let mut r = ArtifactRegistry::new();
        assert!(matches!(r.remove("x"), Err(RegrrError::NotFound { .. })));
        assert!(matches!(r.get("x"), Err(RegrrError::NotFound { .. })));
    }

    #[test]
    fn names_sorted() {
        let mut r = ArtifactRegistry::new();
        r.insert("b", m(), vec![]).unwrap();
        r.insert("a", m(), vec![]).unwrap();
        assert_eq!(r.names(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn handle_reports_busy_instead_of_panicking() {
        let mut r = ArtifactRegistry::new();
        r.insert("a", m(), vec![]).unwrap();
        let h1 = r.get("a").unwrap().handle();
        let h2 = r.get("a").unwrap().handle();
        let w = h1.borrow_mut().unwrap();
        assert!(matches!(h2.borrow(), Err(RegrrError::Busy { .. })));
        assert!(matches!(h2.borrow_mut(), Err(RegrrError::Busy { .. })));
        drop(w);
        assert!(h2.borrow().is_ok());
        assert_eq!(h2.name(), "a");
    }
}
