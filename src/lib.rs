pub mod config;
pub mod error;
pub mod interactive;
pub mod pipeline;
pub mod session;
pub mod subtitle;
pub mod translate;

pub use config::{Config, OutputFormat, SourceFormat};
pub use error::{Result, SubtransError};
pub use pipeline::{
    print_summary, translate_file, PipelineConfig, PipelineResult, PipelineStats,
};
pub use session::{Export, TranslationSession};
