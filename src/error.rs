//! Error taxonomy of the public recorder API.
//!
//! Setup failures of the gate are not represented here: they downgrade the
//! recorder to disabled mode and are only logged.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegrrError {
    /// A managed artifact with this name is already stored and not yet released.
    #[error("managed artifact with the same name already exists: {name}")]
    IdentityConflict { name: String },

    /// `get`/`release` on a name that is not in the registry (or recorder disabled).
    #[error("managed artifact with this name does not exist: {name}")]
    NotFound { name: String },

    /// A managed artifact's data is already borrowed through a `MatHandle`.
    #[error("managed artifact is already borrowed: {name}")]
    Busy { name: String },

    /// `exit_scope` with an empty scope stack.
    #[error("exit_scope called outside any scope")]
    ScopeUnderflow,

    /// Manifest append or directory creation failed. Together with `Codec`
    /// this covers every I/O failure of the write paths.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The array codec could not write the file (the codec half of I/O failures).
    #[error("cannot write artifact '{path}': {detail}")]
    Codec { path: PathBuf, detail: String },
}

impl RegrrError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RegrrError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn not_found(name: &str) -> Self {
        RegrrError::NotFound {
            name: name.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegrrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_name() {
        let e = RegrrError::IdentityConflict { name: "M".into() };
        assert!(e.to_string().contains("M"));
        let e = RegrrError::not_found("hello");
        assert!(e.to_string().ends_with("hello"));
    }

    #[test]
    fn io_keeps_source() {
        use std::error::Error as _;
        let e = RegrrError::io(
            "/x/lists.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(e.source().is_some());
        assert!(e.to_string().contains("lists.txt"));
    }
}
