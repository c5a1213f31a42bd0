//! jatsgen CLI - generate JATS XML from article records.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use jatsgen::config::{LoadError, load_config};
use jatsgen::{Article, Config, ReadError, build_xml, build_xml_to_disk, key, read_articles};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Configuration file read when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "jatsgen.toml";

#[derive(Parser)]
#[command(name = "jatsgen")]
#[command(author, version, about = "Generate JATS XML from article records", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Configuration section overriding the top-level defaults
    #[arg(short, long, global = true)]
    section: Option<String>,

    /// Leave out the provenance comment
    #[arg(long, global = true)]
    no_comment: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build documents and write them to the output directory
    Generate {
        /// Article record files (JSON, one record or an array)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory, overriding `target_output_dir`
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Build one document and print it to stdout
    Render {
        /// Article record file (JSON)
        input: PathBuf,

        /// Indent the output
        #[arg(short, long)]
        pretty: bool,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Build(#[from] jatsgen::BuildError),
    #[error(transparent)]
    Emit(#[from] jatsgen::EmitError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("{0} holds no article record")]
    NoRecord(PathBuf),
    #[error("{0} does not have enough components to build a document")]
    Insufficient(PathBuf),
    #[error("{failed} of {total} documents could not be written")]
    Failed { failed: usize, total: usize },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let mut config = load_config(&cli.config, cli.section.as_deref())?;
    let add_comment = !cli.no_comment;

    match cli.command {
        Commands::Generate { inputs, output_dir } => {
            if let Some(dir) = output_dir {
                config.set(key::TARGET_OUTPUT_DIR, dir.to_string_lossy().into_owned());
            }
            generate(&inputs, &config, add_comment)
        }
        Commands::Render { input, pretty } => render(&input, &config, add_comment, pretty),
    }
}

fn generate(inputs: &[PathBuf], config: &Config, add_comment: bool) -> Result<(), CliError> {
    let mut total = 0;
    let mut failed = 0;
    for input in inputs {
        let articles = match read_articles(input) {
            Ok(articles) => articles,
            Err(e) => {
                error!(input = %input.display(), error = %e, "could not read article records");
                failed += 1;
                total += 1;
                continue;
            }
        };
        for article in &articles {
            total += 1;
            if !build_xml_to_disk(article, config, add_comment) {
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(CliError::Failed { failed, total });
    }
    Ok(())
}

fn render(input: &Path, config: &Config, add_comment: bool, pretty: bool) -> Result<(), CliError> {
    let article = first_article(input)?;
    let xml = build_xml(&article, config, add_comment)?
        .ok_or_else(|| CliError::Insufficient(input.to_path_buf()))?;
    let bytes = xml.output_xml(pretty)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(&bytes)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

fn first_article(input: &Path) -> Result<Article, CliError> {
    read_articles(input)?
        .into_iter()
        .next()
        .ok_or_else(|| CliError::NoRecord(input.to_path_buf()))
}
