//! Chunk command implementation

use super::init_logging;
use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::{resolve_patterns, FileReader};
use crate::output::{create_formatter, OutputFormat};
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use jogak_core::document::PARSED_SUFFIX;
use jogak_core::{Chunk, SegmentationStats, Segmenter};
use rayon::prelude::*;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

/// Arguments for the chunk command
#[derive(Debug, Args)]
pub struct ChunkArgs {
    /// Parser output files, glob patterns or directories
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Directory receiving one chunk file per document
    #[arg(
        short,
        long,
        value_name = "DIR",
        required_unless_present = "stdout",
        conflicts_with = "stdout"
    )]
    pub output: Option<PathBuf>,

    /// Write every document's chunks to standard output instead
    #[arg(long)]
    pub stdout: bool,

    /// Output format (defaults to the configured format)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Configuration file (jogak.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Custom lexicon file
    #[arg(short, long, value_name = "FILE")]
    pub lexicon: Option<PathBuf>,

    /// Worker threads (0 = one per CPU)
    #[arg(short = 'j', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Suppress progress and summary output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Totals over one batch
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub documents: usize,
    pub chunks: usize,
    pub failed: usize,
}

impl BatchSummary {
    /// Whether the batch had documents and every one of them failed
    pub fn all_failed(&self) -> bool {
        self.documents > 0 && self.failed == self.documents
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chunked {} documents into {} chunks ({} failed)",
            self.documents, self.chunks, self.failed
        )
    }
}

struct Processed {
    stats: SegmentationStats,
    /// Chunks held back for stdout; empty once written to a file
    chunks: Vec<Chunk>,
}

impl ChunkArgs {
    /// Execute the chunk command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);
        log::debug!("Arguments: {:?}", self);

        let summary = self.run()?;

        if !self.quiet {
            if self.stdout {
                eprintln!("{summary}");
            } else {
                println!("{summary}");
            }
        }

        if summary.all_failed() {
            return Err(CliError::BatchFailed {
                failed: summary.failed,
                total: summary.documents,
            }
            .into());
        }
        Ok(())
    }

    /// Chunk every input document and return the batch totals
    pub fn run(&self) -> Result<BatchSummary> {
        let mut config = CliConfig::load(self.config.as_deref())?;
        if let Some(threads) = self.threads {
            config.batch.worker_threads = threads;
        }
        let format = self.format.unwrap_or(config.output.format);

        let lexicon = config.lexicon(self.lexicon.as_deref())?;
        let segmenter = Segmenter::with_lexicon(config.segmentation.clone(), lexicon)
            .context("Invalid segmentation settings")?;

        let files = resolve_patterns(&self.input, &config.batch.input_pattern)?;
        if let Some(dir) = &self.output {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
        }

        let threads = config.worker_threads();
        log::info!("Chunking {} documents on {} threads", files.len(), threads);

        let mut progress = ProgressReporter::new(self.quiet);
        progress.init(files.len() as u64, "documents");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("Failed to start worker pool")?;

        let outcomes: Vec<(&PathBuf, Result<Processed>)> = pool.install(|| {
            files
                .par_iter()
                .map(|path| {
                    let result = self.process_document(path, &segmenter, format, &config);
                    progress.item_completed(&display_name(path));
                    (path, result)
                })
                .collect()
        });
        progress.finish();

        let mut summary = BatchSummary {
            documents: files.len(),
            ..BatchSummary::default()
        };
        let mut stdout_formatter = self
            .stdout
            .then(|| create_formatter(format, BufWriter::new(io::stdout())));

        for (path, outcome) in outcomes {
            match outcome {
                Ok(processed) => {
                    summary.chunks += processed.stats.chunks;
                    if let Some(formatter) = stdout_formatter.as_mut() {
                        for chunk in &processed.chunks {
                            formatter.format_chunk(chunk)?;
                        }
                    }
                }
                Err(err) => {
                    summary.failed += 1;
                    log::error!("{}: {:#}", path.display(), err);
                }
            }
        }

        if let Some(formatter) = stdout_formatter.as_mut() {
            formatter.finish()?;
        }

        Ok(summary)
    }

    fn process_document(
        &self,
        path: &Path,
        segmenter: &Segmenter,
        format: OutputFormat,
        config: &CliConfig,
    ) -> Result<Processed> {
        let document = FileReader::read_document(path)?;
        match document.page_range() {
            Some((first, last)) => log::debug!(
                "{}: {} pages ({}-{}), {} bytes",
                path.display(),
                document.pages().len(),
                first,
                last,
                FileReader::file_size(path).unwrap_or_default()
            ),
            None => log::warn!("{}: document has no pages", path.display()),
        }
        let output = segmenter.segment(&document);

        let Some(dir) = &self.output else {
            return Ok(Processed {
                stats: output.stats,
                chunks: output.chunks,
            });
        };

        let target = dir.join(output_file_name(path, &config.batch.output_suffix, format));
        write_chunks(&target, format, &output.chunks)?;
        log::info!(
            "{} -> {} ({} chunks in {:?})",
            path.display(),
            target.display(),
            output.stats.chunks,
            output.duration
        );

        Ok(Processed {
            stats: output.stats,
            chunks: Vec::new(),
        })
    }
}

/// Output file name for a parser output file
///
/// `RFP_2024_parsed.json` becomes `RFP_2024_clean.jsonl`; markdown output
/// uses the `.md` extension instead.
pub fn output_file_name(input: &Path, suffix: &str, format: OutputFormat) -> String {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    let name = format!("{}{}", stem.replace(PARSED_SUFFIX, ""), suffix);

    match format {
        OutputFormat::Markdown => Path::new(&name).with_extension("md").to_string_lossy().into_owned(),
        _ => name,
    }
}

/// Write chunks to `target` in `format`
pub fn write_chunks(target: &Path, format: OutputFormat, chunks: &[Chunk]) -> Result<()> {
    let file = File::create(target)
        .with_context(|| format!("Failed to create output file: {}", target.display()))?;

    let mut formatter = create_formatter(format, BufWriter::new(file));
    for chunk in chunks {
        formatter.format_chunk(chunk)?;
    }
    formatter
        .finish()
        .with_context(|| format!("Failed to write {}", target.display()))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
