//! `jogak.toml` batch configuration
//!
//! Every section is optional; missing keys take their defaults. Command-line
//! flags override values read from the file.

use crate::error::CliError;
use crate::output::OutputFormat;
use anyhow::{Context, Result};
use jogak_core::{Lexicon, SegmenterConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Segmentation thresholds
    #[serde(default)]
    pub segmentation: SegmenterConfig,

    /// Vocabulary selection
    #[serde(default)]
    pub lexicon: LexiconConfig,

    /// Input discovery and parallelism
    #[serde(default)]
    pub batch: BatchConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Lexicon selection
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct LexiconConfig {
    /// Custom lexicon file; the embedded Korean RFP lexicon when unset
    pub path: Option<PathBuf>,
}

/// Batch-related configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Glob applied inside directory inputs
    pub input_pattern: String,

    /// Suffix replacing `_parsed` on output file names
    pub output_suffix: String,

    /// Number of worker threads (0 = auto)
    pub worker_threads: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_pattern: "*_parsed.json".to_string(),
            output_suffix: "_clean.jsonl".to_string(),
            worker_threads: 0,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,
}

impl CliConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| CliError::ConfigError(e.message().to_string()))?;
        config.segmentation.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("Invalid config: {}", path.display()))
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolve the lexicon, preferring `override_path` over the configured one
    pub fn lexicon(&self, override_path: Option<&Path>) -> Result<Lexicon> {
        match override_path.or(self.lexicon.path.as_deref()) {
            Some(path) => Lexicon::from_path(path)
                .with_context(|| format!("Failed to load lexicon: {}", path.display())),
            None => Ok(Lexicon::korean_rfp().clone()),
        }
    }

    /// Worker threads to use; 0 means one per logical CPU
    pub fn worker_threads(&self) -> usize {
        match self.batch.worker_threads {
            0 => num_cpus::get(),
            n => n,
        }
    }

    /// Commented template with every default spelled out
    pub fn template() -> String {
        let segmentation = SegmenterConfig::default();
        let batch = BatchConfig::default();
        format!(
            r#"# jogak batch configuration

[segmentation]
# Buffered characters that force a flush
hard_ceiling_chars = {hard}
# Flushes shorter than this merge into the previous chunk
min_chunk_chars = {min_chunk}
# Target size for pieces of oversized chunks
soft_ceiling_chars = {soft}
# Table-of-contents detection
toc_dot_ratio_threshold = {dot:?}
toc_digit_ratio_threshold = {digit:?}
long_line_chars = {long_line}
min_long_lines = {long_lines}
# Cleaned text shorter than this is dropped
min_clean_text_chars = {min_clean}
require_normative_marker = {normative}
column_delimiter = "{delimiter}"
# Defer overflow flushes until a table run ends
keep_tables_intact = {tables}

[lexicon]
# Custom vocabulary (see `jogak generate-config --kind lexicon`)
# path = "lexicons/custom.toml"

[batch]
input_pattern = "{pattern}"
output_suffix = "{suffix}"
# 0 = one worker per CPU
worker_threads = {threads}

[output]
# record, flat or markdown
format = "record"
"#,
            hard = segmentation.hard_ceiling_chars,
            min_chunk = segmentation.min_chunk_chars,
            soft = segmentation.soft_ceiling_chars,
            dot = segmentation.toc_dot_ratio_threshold,
            digit = segmentation.toc_digit_ratio_threshold,
            long_line = segmentation.long_line_chars,
            long_lines = segmentation.min_long_lines,
            min_clean = segmentation.min_clean_text_chars,
            normative = segmentation.require_normative_marker,
            delimiter = segmentation.column_delimiter,
            tables = segmentation.keep_tables_intact,
            pattern = batch.input_pattern,
            suffix = batch.output_suffix,
            threads = batch.worker_threads,
        )
    }
}
