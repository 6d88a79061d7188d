use clap::{Parser, Subcommand, builder::styling};
use eyre::{Context, Result};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use wikipedia_extractor::cli;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Wikipedia Extractor: sample articles from Hugging Face and upload them to Azure Blob Storage
#[derive(Parser)]
#[command(name = "wikex", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source configuration from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save the leading articles of the dataset to an NDJSON file
    Sample {
        /// Number of articles (default: WIKIPEDIA_SAMPLE_SIZE)
        #[arg(short, long)]
        size: Option<usize>,

        /// The NDJSON file to write
        #[arg(short, long, default_value = "sample.ndjson")]
        output: PathBuf,
    },

    /// Save article metadata (id, title, url, timestamp, categories) to an NDJSON file
    Metadata {
        /// Number of articles (default: WIKIPEDIA_SAMPLE_SIZE)
        #[arg(short, long)]
        size: Option<usize>,

        /// The NDJSON file to write
        #[arg(short, long, default_value = "metadata.ndjson")]
        output: PathBuf,
    },

    /// Upload articles to Azure Blob Storage, one JSON blob each
    Upload {
        /// Number of articles (default: WIKIPEDIA_SAMPLE_SIZE, or the whole input file)
        #[arg(short, long)]
        size: Option<usize>,

        /// Destination container (default: AZURE_STORAGE_CONTAINER_NAME)
        #[arg(short, long)]
        container: Option<String>,

        /// Upload the articles of an NDJSON file instead of a fresh sample
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dotenv = dotenvy::from_filename(&cli.env);

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    match dotenv {
        Ok(path) => log::debug!("Sourced {}", path.display()),
        Err(e) if e.not_found() => log::debug!("No {} file, using process environment", cli.env),
        Err(e) => return Err(e).with_context(|| format!("Failed to source {}", cli.env)),
    }

    let extractor = cli::load_extractor()?;

    match cli.command {
        Commands::Sample { size, output } => {
            let count = cli::write_sample(&extractor, size, &output).await?;
            log::info!(
                "✓ Wrote {} article(s) to {}",
                count,
                output.display().bright_black()
            );
        }
        Commands::Metadata { size, output } => {
            let count = cli::write_metadata(&extractor, size, &output).await?;
            log::info!(
                "✓ Wrote metadata for {} article(s) to {}",
                count,
                output.display().bright_black()
            );
        }
        Commands::Upload {
            size,
            container,
            input,
        } => {
            let destination = container
                .clone()
                .unwrap_or_else(|| extractor.config().container_name.clone());
            let count = match input {
                Some(input) => cli::upload_file(&extractor, &input, size, container).await?,
                None => cli::upload_sample(&extractor, size, container).await?,
            };
            log::info!(
                "✓ Uploaded {} article(s) to container {}",
                count,
                destination.cyan()
            );
        }
    }

    Ok(())
}
