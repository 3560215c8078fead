//! codec — запись Mat на диск в формате, совместимом с OpenCV FileStorage.
//!
//! Кодек выбирается по расширению выходного файла:
//! - ".xml"          -> XmlCodec
//! - ".yml"/".yaml"  -> YamlCodec
//! - ".json"         -> JsonCodec
//! - иначе           -> XmlCodec (с предупреждением в лог)
//!
//! Кодек не решает, куда писать, и не создаёт каталоги — это делает serializer.
//! Ограничение по каналам (max_channels) тоже применяет serializer: кодек
//! получает уже "плоскую" матрицу.

use anyhow::{Context, Result};
use log::warn;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::mat::Mat;

mod json;
mod xml;
mod yaml;

pub use json::JsonCodec;
pub use xml::XmlCodec;
pub use yaml::YamlCodec;

/// Writes one array to one file.
pub trait ArrayCodec {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Maximum channel count the format accepts (None = unlimited).
    fn max_channels(&self) -> Option<usize>;

    /// Encode `mat` into `path` (truncating any existing file).
    fn write(&self, path: &Path, mat: &Mat) -> Result<()>;
}

/// Pick the codec for an output extension (case-insensitive, leading dot optional).
pub fn codec_for_extension(ext: &str) -> Box<dyn ArrayCodec> {
    let e = ext.trim_start_matches('.').to_ascii_lowercase();
    match e.as_str() {
        "xml" => Box::new(XmlCodec),
        "yml" | "yaml" => Box::new(YamlCodec),
        "json" => Box::new(JsonCodec),
        other => {
            warn!("regrr: unknown extension '{other}', falling back to XML codec");
            Box::new(XmlCodec)
        }
    }
}

/// Общий хелпер: записать текст целиком (create+truncate).
pub(crate) fn write_text(path: &Path, text: &str) -> Result<()> {
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("open {} for write", path.display()))?;
    f.write_all(text.as_bytes())
        .with_context(|| format!("write {}", path.display()))?;
    f.flush()?;
    Ok(())
}

/// Values joined with `sep`, `per_line` values per line, each line prefixed by `indent`.
pub(crate) fn format_rows(mat: &Mat, sep: &str, per_line: usize, indent: &str) -> String {
    let mut out = String::new();
    for (i, v) in mat.data().iter().enumerate() {
        if i > 0 {
            out.push_str(sep.trim_end());
            if i % per_line == 0 {
                out.push('\n');
                out.push_str(indent);
            } else {
                out.push(' ');
            }
        }
        out.push_str(&mat.format_value(*v));
    }
    out
}
