//! Output formatting module

use anyhow::Result;
use jogak_core::Chunk;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format and output a single chunk
    fn format_chunk(&mut self, chunk: &Chunk) -> Result<()>;

    /// Finalize output (e.g., write a footer and flush)
    fn finish(&mut self) -> Result<()>;
}

pub mod flat;
pub mod markdown;
pub mod record;

pub use flat::{FlatFormatter, FlatRecord};
pub use markdown::MarkdownFormatter;
pub use record::RecordFormatter;

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `{content, page, metadata}` JSON Lines for the indexing stage
    #[default]
    Record,
    /// JSON Lines with the chunk fields at top level
    Flat,
    /// Human-readable preview
    Markdown,
}

/// Build a formatter writing `format` to `writer`
pub fn create_formatter<'w, W>(format: OutputFormat, writer: W) -> Box<dyn OutputFormatter + 'w>
where
    W: Write + Send + Sync + 'w,
{
    match format {
        OutputFormat::Record => Box::new(RecordFormatter::new(writer)),
        OutputFormat::Flat => Box::new(FlatFormatter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
    }
}
