//! Generate config command implementation

use crate::config::CliConfig;
use anyhow::{Context, Result};
use clap::Args;
use jogak_core::Lexicon;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,

    /// Template to write
    #[arg(short, long, value_enum, default_value = "config")]
    pub kind: TemplateKind,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Available templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TemplateKind {
    /// Batch configuration (jogak.toml)
    Config,
    /// Copy of the built-in Korean RFP lexicon
    Lexicon,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        use std::fs;

        if self.output.exists() && !self.force {
            anyhow::bail!(
                "{} already exists (use --force to overwrite)",
                self.output.display()
            );
        }

        println!("Generating {:?} template...", self.kind);
        println!("  Output file: {}", self.output.display());

        fs::write(&self.output, self.template())
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit the file to fit your documents");
        println!("2. Validate it:");
        println!("   jogak validate -c {}", self.output.display());
        println!("3. Use it for chunking:");
        match self.kind {
            TemplateKind::Config => println!(
                "   jogak chunk -i parsed/ -o chunks/ -c {}",
                self.output.display()
            ),
            TemplateKind::Lexicon => println!(
                "   jogak chunk -i parsed/ -o chunks/ --lexicon {}",
                self.output.display()
            ),
        }

        Ok(())
    }

    /// Template content for the selected kind
    fn template(&self) -> String {
        match self.kind {
            TemplateKind::Config => CliConfig::template(),
            TemplateKind::Lexicon => Lexicon::korean_rfp_toml().to_string(),
        }
    }
}
