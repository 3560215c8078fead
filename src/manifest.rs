//! manifest — append-only журнал выполнения (lists.txt).
//!
//! Формат (по строке на событие):
//!
//! ```text
//!   <extension>        первая строка, пишется один раз при инициализации
//!   + <scope>          вход в scope
//!   -                  выход из scope
//!   <name>.<ordinal>   создание артефакта (managed store или direct save с append)
//! ```
//!
//! Каждый append открывает файл, пишет одну строку и закрывает его. Долгоживущего
//! хэндла нет: после падения процесса журнал цел до последней записанной строки.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::consts::{ENTER_PREFIX, EXIT_LINE};
use crate::error::{RegrrError, Result};

/// One manifest event; `Display` renders the exact line (without terminator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestEvent<'a> {
    Enter(&'a str),
    Exit,
    Artifact { name: &'a str, ordinal: u32 },
}

impl fmt::Display for ManifestEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestEvent::Enter(name) => write!(f, "{ENTER_PREFIX}{name}"),
            ManifestEvent::Exit => f.write_str(EXIT_LINE),
            ManifestEvent::Artifact { name, ordinal } => write!(f, "{name}.{ordinal}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ManifestWriter {
    path: PathBuf,
}

impl ManifestWriter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncate (or create) the manifest and write the header line.
    pub fn reset(&self, extension: &str) -> Result<()> {
        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| RegrrError::io(&self.path, e))?;
        self.append_line(extension)
    }

    pub fn append(&self, event: &ManifestEvent<'_>) -> Result<()> {
        self.append_line(&event.to_string())
    }

    fn append_line(&self, line: &str) -> Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| RegrrError::io(&self.path, e))?;
        writeln!(f, "{line}").map_err(|e| RegrrError::io(&self.path, e))?;
        Ok(())
    }
}
