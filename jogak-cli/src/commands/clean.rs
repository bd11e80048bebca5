//! Clean command implementation
//!
//! Second cleaning pass over finished chunk files: every chunk goes back
//! through the cleaner with the stricter post-clean minimum length.

use super::init_logging;
use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::{resolve_patterns, FileReader};
use crate::output::create_formatter;
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use jogak_core::{CleaningStage, SegmenterConfig, TextCleaner};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Suffix appended to cleaned file stems
pub const CLEAN_SUFFIX: &str = "_clean.jsonl";

/// Arguments for the clean command
#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Chunk files (record or flat JSON Lines), patterns or directories
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Directory receiving the cleaned files
    #[arg(short, long, value_name = "DIR", required = true)]
    pub output: PathBuf,

    /// Minimum cleaned text length (default 200)
    #[arg(long, value_name = "CHARS")]
    pub min_chars: Option<usize>,

    /// Configuration file (jogak.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Custom lexicon file
    #[arg(short, long, value_name = "FILE")]
    pub lexicon: Option<PathBuf>,

    /// Suppress progress and per-file output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Outcome for one cleaned file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub kept: usize,
    pub removed: usize,
}

impl CleanArgs {
    /// Execute the clean command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);
        log::debug!("Arguments: {:?}", self);

        let reports = self.run()?;

        if !self.quiet {
            for report in &reports {
                println!(
                    "{} -> {}: kept={}, removed={}",
                    report.input.display(),
                    report.output.display(),
                    report.kept,
                    report.removed
                );
            }
        }
        Ok(())
    }

    /// Clean every input file and return one report per cleaned file
    ///
    /// A file that cannot be read or written is logged and skipped; the run
    /// fails only when every file fails.
    pub fn run(&self) -> Result<Vec<CleanReport>> {
        let config = CliConfig::load(self.config.as_deref())?;
        let lexicon = config.lexicon(self.lexicon.as_deref())?;

        let settings = SegmenterConfig {
            min_clean_text_chars: self
                .min_chars
                .unwrap_or_else(|| CleaningStage::PostClean.min_clean_text_chars()),
            ..config.segmentation
        };
        settings.validate().context("Invalid cleaning settings")?;
        let cleaner = TextCleaner::new(&settings, &lexicon);

        let files = resolve_patterns(&self.input, "*.jsonl")?;
        fs::create_dir_all(&self.output).with_context(|| {
            format!("Failed to create output directory: {}", self.output.display())
        })?;

        let mut progress = ProgressReporter::new(self.quiet);
        progress.init(files.len() as u64, "files");

        let mut reports = Vec::with_capacity(files.len());
        let mut failed = 0;
        for path in &files {
            match clean_file(path, &self.output, &cleaner) {
                Ok(report) => reports.push(report),
                Err(err) => {
                    log::error!("{}: {:#}", path.display(), err);
                    failed += 1;
                }
            }
            progress.item_completed(&path.display().to_string());
        }
        progress.finish();

        if failed > 0 && reports.is_empty() {
            return Err(CliError::BatchFailed {
                failed,
                total: files.len(),
            }
            .into());
        }
        if failed > 0 {
            log::warn!("{} of {} files failed", failed, files.len());
        }

        Ok(reports)
    }
}

/// Re-clean one chunk file into `output_dir`, keeping its format
pub fn clean_file(path: &Path, output_dir: &Path, cleaner: &TextCleaner) -> Result<CleanReport> {
    let file = FileReader::read_chunks(path)?;
    let total = file.chunks.len();

    let kept: Vec<_> = file
        .chunks
        .into_iter()
        .filter_map(|mut chunk| match cleaner.clean(&chunk.text) {
            Ok(text) => {
                chunk.text = text;
                Some(chunk)
            }
            Err(reason) => {
                log::debug!("{}: removed {} ({})", path.display(), chunk.chunk_id, reason);
                None
            }
        })
        .collect();

    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    let target = output_dir.join(format!("{stem}{CLEAN_SUFFIX}"));

    let writer = File::create(&target)
        .with_context(|| format!("Failed to create output file: {}", target.display()))?;
    let mut formatter = create_formatter(file.format, BufWriter::new(writer));
    for chunk in &kept {
        formatter.format_chunk(chunk)?;
    }
    formatter.finish()?;

    log::info!("{}: kept {} of {} chunks", path.display(), kept.len(), total);

    Ok(CleanReport {
        input: path.to_path_buf(),
        output: target,
        kept: kept.len(),
        removed: total - kept.len(),
    })
}
