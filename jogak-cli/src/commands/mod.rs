//! CLI command implementations

use clap::Subcommand;

pub mod chunk;
pub mod clean;
pub mod generate_config;
pub mod inspect;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Segment parser output into chunk files
    Chunk(chunk::ChunkArgs),

    /// Re-clean existing chunk files with the stricter post-clean gate
    Clean(clean::CleanArgs),

    /// Summarize a chunk file or show one chunk
    Inspect(inspect::InspectArgs),

    /// Validate a lexicon or jogak.toml file
    Validate(validate::ValidateArgs),

    /// Generate a commented configuration template
    GenerateConfig(generate_config::GenerateConfigArgs),
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Chunk(args) => args.execute(),
            Commands::Clean(args) => args.execute(),
            Commands::Inspect(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
        }
    }
}

/// Initialize logging from the `-v` count; `RUST_LOG` takes precedence
pub fn init_logging(verbose: u8, quiet: bool) {
    let log_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };

    // A logger may already be installed when commands run in-process
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_commands_debug_format() {
        let chunk_cmd = Commands::Chunk(chunk::ChunkArgs {
            input: vec!["parsed/".to_string()],
            output: Some(PathBuf::from("chunks")),
            stdout: false,
            format: None,
            config: None,
            lexicon: None,
            threads: None,
            quiet: false,
            verbose: 0,
        });

        let debug_str = format!("{:?}", chunk_cmd);
        assert!(debug_str.contains("Chunk"));
        assert!(debug_str.contains("parsed/"));

        let validate_cmd = Commands::Validate(validate::ValidateArgs {
            config: PathBuf::from("jogak.toml"),
        });
        assert!(format!("{:?}", validate_cmd).contains("jogak.toml"));
    }

    #[test]
    fn test_init_logging_repeatable() {
        init_logging(0, false);
        init_logging(3, true);
    }
}
