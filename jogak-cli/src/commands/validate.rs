//! Validate command implementation

use crate::config::CliConfig;
use crate::error::CliError;
use anyhow::{Context, Result};
use clap::Args;
use jogak_core::Lexicon;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Lexicon or jogak.toml file to validate
    #[arg(short = 'c', long, value_name = "FILE", required = true)]
    pub config: PathBuf,
}

/// What a validated file turned out to be
#[derive(Debug)]
pub enum Validated {
    Lexicon(Lexicon),
    Config(CliConfig),
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating configuration: {}", self.config.display());

        match self.check() {
            Ok(Validated::Lexicon(lexicon)) => {
                println!("✓ Lexicon is valid!");
                println!("  Lexicon code: {}", lexicon.code());
                println!("  Lexicon name: {}", lexicon.name());
                Ok(())
            }
            Ok(Validated::Config(config)) => {
                println!("✓ Configuration is valid!");
                println!(
                    "  Ceilings: hard {}, soft {}, merge below {}",
                    config.segmentation.hard_ceiling_chars,
                    config.segmentation.soft_ceiling_chars,
                    config.segmentation.min_chunk_chars
                );
                println!("  Output format: {:?}", config.output.format);
                Ok(())
            }
            Err(e) => {
                println!("✗ Configuration is invalid!");
                println!("  Error: {e:#}");
                Err(anyhow::anyhow!("Validation failed: {:#}", e))
            }
        }
    }

    /// Parse the file as a lexicon when it has a `[metadata]` table,
    /// otherwise as `jogak.toml`
    pub fn check(&self) -> Result<Validated> {
        let text = std::fs::read_to_string(&self.config)
            .with_context(|| format!("Failed to read {}", self.config.display()))?;
        let table: toml::Table =
            toml::from_str(&text).map_err(|e| CliError::ConfigError(e.message().to_string()))?;

        if table.contains_key("metadata") {
            return Ok(Validated::Lexicon(Lexicon::from_toml_str(&text)?));
        }

        let config = CliConfig::from_toml_str(&text)?;
        if config.lexicon.path.is_some() {
            config.lexicon(None)?;
        }
        Ok(Validated::Config(config))
    }
}
