//! OpenCV FileStorage JSON, собирается через serde_json.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::path::Path;

use super::{write_text, ArrayCodec};
use crate::consts::{OPENCV_MAX_CHANNELS, ROOT_NODE};
use crate::mat::Mat;

#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn to_value(&self, mat: &Mat) -> Value {
        let data: Vec<Value> = if mat.depth().is_integer() {
            mat.data().iter().map(|v| json!(v.round() as i64)).collect()
        } else {
            // NaN/inf не представимы в JSON: serde_json пишет их как null.
            mat.data().iter().map(|v| json!(v)).collect()
        };
        let mut root = serde_json::Map::new();
        root.insert(
            ROOT_NODE.to_string(),
            json!({
                "type_id": "opencv-matrix",
                "rows": mat.rows(),
                "cols": mat.cols(),
                "dt": mat.dt(),
                "data": data,
            }),
        );
        Value::Object(root)
    }
}

impl ArrayCodec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn max_channels(&self) -> Option<usize> {
        Some(OPENCV_MAX_CHANNELS)
    }

    fn write(&self, path: &Path, mat: &Mat) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.to_value(mat))
            .context("serialize opencv-matrix json")?;
        write_text(path, &text)
    }
}
