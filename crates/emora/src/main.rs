// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Emora - An emotionally aware conversational companion.
//!
//! This is the binary entry point. It inspects and manages the locally
//! persisted conversation state and memory store.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod recall;
mod state;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use emora_config::EmoraConfig;
use emora_core::EmoraError;

/// Emora - An emotionally aware conversational companion.
#[derive(Parser, Debug)]
#[command(name = "emora", version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of the XDG lookup.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the persisted conversation state.
    State {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Clear the conversation state and its snapshot. Memories are kept.
    Reset,
    /// Summarize how often an emotion has come up before.
    Recall {
        /// Emotion label, e.g. "sadness".
        emotion: String,
        /// Maximum number of matching memories to count.
        #[arg(long, default_value_t = 3)]
        top_k: usize,
    },
    /// Validate configuration and print the resolved values.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => emora_config::load_and_validate_path(path),
        None => emora_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            emora_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);
    emora_agent::metrics::register_metrics();

    if let Err(e) = run(cli.command, &config).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Option<Commands>, config: &EmoraConfig) -> Result<(), EmoraError> {
    match command {
        Some(Commands::State { json }) => state::run_state(config, json).await,
        Some(Commands::Reset) => state::run_reset(config).await,
        Some(Commands::Recall { emotion, top_k }) => {
            let summary = recall::recall_summary(config, &emotion, top_k).await?;
            println!("{summary}");
            Ok(())
        }
        Some(Commands::Config) => {
            let rendered = toml::to_string_pretty(config)
                .map_err(|e| EmoraError::Internal(format!("failed to render config: {e}")))?;
            print!("{rendered}");
            Ok(())
        }
        None => {
            println!("emora: use --help for available commands");
            Ok(())
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so command output stays machine-readable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("emora={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = emora_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.agent.name, "emora");
    }

    #[test]
    fn parses_recall_with_top_k() {
        let cli = Cli::try_parse_from(["emora", "recall", "sadness", "--top-k", "5"]).unwrap();
        match cli.command {
            Some(Commands::Recall { emotion, top_k }) => {
                assert_eq!(emotion, "sadness");
                assert_eq!(top_k, 5);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["emora", "state", "--json", "--config", "custom.toml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(cli.command, Some(Commands::State { json: true })));
    }

    #[test]
    fn recall_requires_an_emotion() {
        assert!(Cli::try_parse_from(["emora", "recall"]).is_err());
    }
}
