//! OpenCV FileStorage XML (`<opencv_storage>` + `type_id="opencv-matrix"`).

use anyhow::Result;
use std::path::Path;

use super::{format_rows, write_text, ArrayCodec};
use crate::consts::{OPENCV_MAX_CHANNELS, ROOT_NODE};
use crate::mat::Mat;

#[derive(Clone, Copy, Debug, Default)]
pub struct XmlCodec;

impl XmlCodec {
    pub fn encode(&self, mat: &Mat) -> String {
        let mut s = String::new();
        s.push_str("<?xml version=\"1.0\"?>\n");
        s.push_str("<opencv_storage>\n");
        s.push_str(&format!("<{ROOT_NODE} type_id=\"opencv-matrix\">\n"));
        s.push_str(&format!("  <rows>{}</rows>\n", mat.rows()));
        s.push_str(&format!("  <cols>{}</cols>\n", mat.cols()));
        s.push_str(&format!("  <dt>{}</dt>\n", mat.dt()));
        s.push_str("  <data>\n    ");
        s.push_str(&format_rows(mat, " ", 8, "    "));
        s.push_str(&format!("</data></{ROOT_NODE}>\n"));
        s.push_str("</opencv_storage>\n");
        s
    }
}

impl ArrayCodec for XmlCodec {
    fn name(&self) -> &'static str {
        "xml"
    }

    fn max_channels(&self) -> Option<usize> {
        Some(OPENCV_MAX_CHANNELS)
    }

    fn write(&self, path: &Path, mat: &Mat) -> Result<()> {
        write_text(path, &self.encode(mat))
    }
}
