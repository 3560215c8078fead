//! OpenCV FileStorage YAML (`%YAML:1.0`, `!!opencv-matrix`).

use anyhow::Result;
use std::path::Path;

use super::{format_rows, write_text, ArrayCodec};
use crate::consts::{OPENCV_MAX_CHANNELS, ROOT_NODE};
use crate::mat::Mat;

#[derive(Clone, Copy, Debug, Default)]
pub struct YamlCodec;

impl YamlCodec {
    pub fn encode(&self, mat: &Mat) -> String {
        let mut s = String::new();
        s.push_str("%YAML:1.0\n---\n");
        s.push_str(&format!("{ROOT_NODE}: !!opencv-matrix\n"));
        s.push_str(&format!("   rows: {}\n", mat.rows()));
        s.push_str(&format!("   cols: {}\n", mat.cols()));
        s.push_str(&format!("   dt: {}\n", mat.dt()));
        s.push_str("   data: [ ");
        s.push_str(&format_rows(mat, ", ", 8, "       "));
        s.push_str(" ]\n");
        s
    }
}

impl ArrayCodec for YamlCodec {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn max_channels(&self) -> Option<usize> {
        Some(OPENCV_MAX_CHANNELS)
    }

    fn write(&self, path: &Path, mat: &Mat) -> Result<()> {
        write_text(path, &self.encode(mat))
    }
}
