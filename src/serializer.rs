//! ArtifactSerializer — путь артефакта + запись через кодек.
//!
//! Destination: <root>/<scope1>/.../<name>.<ordinal><extension>.
//! The extension always carries its leading dot (see config), so the default
//! gives `M.1.xml`.

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::codec::{codec_for_extension, ArrayCodec};
use crate::error::{RegrrError, Result};
use crate::mat::Mat;
use crate::scope::{push_relative, scope_dir};

/// "<name>.<ordinal><extension>"
pub fn artifact_file_name(name: &str, ordinal: u32, extension: &str) -> String {
    format!("{name}.{ordinal}{extension}")
}

pub fn artifact_path(
    root: &Path,
    scopes: &[String],
    name: &str,
    ordinal: u32,
    extension: &str,
) -> PathBuf {
    // scope_dir/push_relative keep only plain components: the result stays under root.
    let mut path = root.join(scope_dir(scopes));
    push_relative(&mut path, &artifact_file_name(name, ordinal, extension));
    path
}

pub struct ArtifactSerializer {
    root: PathBuf,
    extension: String,
    codec: Box<dyn ArrayCodec>,
}

impl ArtifactSerializer {
    pub fn new(root: PathBuf, extension: String) -> Self {
        let codec = codec_for_extension(&extension);
        Self {
            root,
            extension,
            codec,
        }
    }

    /// Replace the codec chosen from the extension.
    pub fn with_codec(mut self, codec: Box<dyn ArrayCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn path_for(&self, scopes: &[String], name: &str, ordinal: u32) -> PathBuf {
        artifact_path(&self.root, scopes, name, ordinal, &self.extension)
    }

    /// Create parent directories and write `mat`. Returns the written path.
    pub fn write(&self, mat: &Mat, scopes: &[String], name: &str, ordinal: u32) -> Result<PathBuf> {
        let path = self.path_for(scopes, name, ordinal);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| RegrrError::io(parent, e))?;
        }

        debug!("regrr: saving {}", path.display());

        // Форматы OpenCV не держат >4 каналов: пишем "плоскую" матрицу.
        let flat;
        let to_write = match self.codec.max_channels() {
            Some(max) if mat.channels() > max => {
                flat = mat.reshape_single_channel();
                &flat
            }
            _ => mat,
        };

        self.codec
            .write(&path, to_write)
            .map_err(|e| RegrrError::Codec {
                path: path.clone(),
                detail: format!("{e:#}"),
            })?;
        Ok(path)
    }
}
