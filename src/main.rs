use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::EnvFilter;

use waav_nodes::{
    DeepgramSpeakerNode, DeepgramTranscriberNode, NodeItem, NodeResult, NodesConfig,
    SpeakerParameters, TranscriberParameters,
    nodes::{DirectoryBinarySink, FixedParameters},
};

/// WaaV Nodes - Deepgram transcription and speech synthesis over item batches
#[derive(Parser, Debug)]
#[command(name = "waav-nodes")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Record failed items as error items instead of aborting the batch
    #[arg(long = "continue-on-fail", global = true)]
    continue_on_fail: bool,

    /// Node to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Node parameters (YAML or JSON)
    #[arg(short = 'p', long = "params", value_name = "FILE")]
    params: PathBuf,

    /// Input items (JSON array)
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input: PathBuf,

    /// Output file path (prints to stdout if not specified)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transcribe audio with the Deepgram transcriber node
    Transcribe {
        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Synthesize speech with the Deepgram speaker node
    Speak {
        #[command(flatten)]
        batch: BatchArgs,

        /// Read the text to speak from this JSON field of each item
        #[arg(long = "text-field", value_name = "NAME")]
        text_field: Option<String>,

        /// Write audio files here instead of inlining them in the output
        #[arg(long = "binary-dir", value_name = "DIR")]
        binary_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout carries only the output items
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // Initialize crypto provider for TLS connections
    // This must be done before any TLS connections are attempted
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install default crypto provider"))?;

    let cli = Cli::parse();

    // Load configuration from file or environment
    let mut config = if let Some(config_path) = &cli.config {
        info!("Loading configuration from {}", config_path.display());
        NodesConfig::from_file(config_path).map_err(|e| anyhow!(e.to_string()))?
    } else {
        NodesConfig::from_env().map_err(|e| anyhow!(e.to_string()))?
    };
    if cli.continue_on_fail {
        config.continue_on_fail = true;
    }

    let (output_items, output_path) = match cli.command {
        Commands::Transcribe { batch } => {
            let params: TranscriberParameters = read_params(&batch.params)?;
            let items = read_items(&batch.input)?;

            let node = DeepgramTranscriberNode::from_config(&config, FixedParameters(params))?;
            (node.execute(&items).await?, batch.output)
        }
        Commands::Speak {
            batch,
            text_field,
            binary_dir,
        } => {
            let params: SpeakerParameters = read_params(&batch.params)?;
            let items = read_items(&batch.input)?;

            let mut node = match text_field {
                Some(field) => DeepgramSpeakerNode::from_config(
                    &config,
                    move |_: usize, item: &NodeItem| -> NodeResult<SpeakerParameters> {
                        Ok(params.with_text_from_field(item, &field))
                    },
                )?,
                None => DeepgramSpeakerNode::from_config(&config, FixedParameters(params))?,
            };
            if let Some(dir) = binary_dir {
                node = node.with_sink(Arc::new(DirectoryBinarySink::new(dir)));
            }

            (node.execute(&items).await?, batch.output)
        }
    };

    let failed = output_items.iter().filter(|item| item.is_error()).count();
    info!(items = output_items.len(), failed, "Batch finished");

    let rendered = serde_json::to_string_pretty(&output_items)?;
    match output_path {
        Some(path) => fs::write(&path, rendered)
            .with_context(|| format!("Failed to write to {}", path.display()))?,
        None => println!("{rendered}"),
    }

    Ok(())
}

fn read_params<P: DeserializeOwned>(path: &Path) -> anyhow::Result<P> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameters file {}", path.display()))?;
    serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse parameters file {}", path.display()))
}

fn read_items(path: &Path) -> anyhow::Result<Vec<NodeItem>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse input items from {}", path.display()))
}
