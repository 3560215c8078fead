//! Общие константы (env-переменные, имена файлов, ограничения кодеков).

// -------- Environment --------
/// Output root. Absent or empty => recorder is disabled.
pub const ENV_DIR: &str = "REGRR_DIR";
/// Output file extension (with or without the leading dot).
pub const ENV_EXT: &str = "REGRR_EXT";

// -------- Layout --------
/// Manifest file name, always directly under the output root.
pub const MANIFEST_FILE: &str = "lists.txt";
pub const DEFAULT_EXTENSION: &str = ".xml";

// -------- Manifest lines --------
pub const ENTER_PREFIX: &str = "+ ";
pub const EXIT_LINE: &str = "-";

// -------- Codecs --------
// OpenCV FileStorage не умеет матрицы с числом каналов > 4.
pub const OPENCV_MAX_CHANNELS: usize = 4;
/// Node name used for every stored matrix.
pub const ROOT_NODE: &str = "root";
