// Базовые модули
pub mod config;
pub mod consts;
pub mod error;
pub mod metrics;

// Данные и запись на диск
pub mod codec;   // src/codec/{mod,xml,yaml,json}.rs
pub mod mat;
pub mod serializer;

// Состояние сессии
pub mod gate;
pub mod manifest;
pub mod registry;
pub mod scope;

// Публичный API
pub mod guard;
pub mod recorder;

// CLI демо-пайплайна (бинарь regrr-demo)
pub mod cli;

// Удобные реэкспорты
pub use config::RecorderConfig;
pub use error::{RegrrError, Result};
pub use guard::{ArtifactGuard, ScopeGuard};
pub use mat::{Depth, Mat};
pub use metrics::RecorderMetrics;
pub use recorder::Recorder;
pub use registry::MatHandle;
