//! Publink CLI
//!
//! Uploads files to an S3-compatible bucket and prints a public link for
//! each one. Transfer mechanics are delegated to the AWS SDK; this binary
//! only handles arguments, configuration and output.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use tracing::info;

use publink::{Settings, StorageClient};

#[derive(Debug)]
struct CliArgs {
    files: Vec<PathBuf>,
    name: Option<String>,
    content_type: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber for structured logging. Logs go to
    // stderr so stdout stays a clean list of links.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("publink=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return Ok(());
    }

    let cli = parse_args(&args)?;

    // Load configuration
    let settings = Settings::load().context("failed to load configuration")?;
    let client = StorageClient::new(settings.storage);

    info!(
        "publink v{} uploading {} file(s)",
        env!("CARGO_PKG_VERSION"),
        cli.files.len()
    );

    for file in &cli.files {
        let name = match &cli.name {
            Some(name) => name.clone(),
            None => file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .with_context(|| format!("no file name in path {}", file.display()))?,
        };

        let content_type = match &cli.content_type {
            Some(ct) => ct.clone(),
            None => mime_guess::from_path(file)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        };

        let link = client
            .upload_file(&name, &content_type, file)
            .await
            .with_context(|| format!("failed to upload {}", file.display()))?;

        println!("{link}");
    }

    Ok(())
}

fn parse_args(args: &[String]) -> anyhow::Result<CliArgs> {
    let mut files = Vec::new();
    let mut name = None;
    let mut content_type = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--name" => {
                name = Some(iter.next().context("--name requires a value")?.clone());
            }
            "--content-type" => {
                content_type = Some(
                    iter.next()
                        .context("--content-type requires a value")?
                        .clone(),
                );
            }
            flag if flag.starts_with('-') => {
                bail!("unknown option: {flag}");
            }
            file => files.push(PathBuf::from(file)),
        }
    }

    if files.is_empty() {
        bail!("no files to upload; see --help");
    }
    if name.is_some() && files.len() > 1 {
        bail!("--name only applies to a single file");
    }

    Ok(CliArgs {
        files,
        name,
        content_type,
    })
}

fn print_usage() {
    println!(
        "publink {}

Upload files to an S3-compatible bucket and print a public link per file.

Usage: publink [OPTIONS] <FILE>...

Options:
  --name <NAME>          Object name to upload under (single file only)
  --content-type <TYPE>  Content type to send instead of guessing it from
                         the file extension
  -h, --help             Print this help

Configuration is read from config/default.toml, config/local.toml and
PUBLINK_-prefixed environment variables (PUBLINK_STORAGE__BUCKET, ...).",
        env!("CARGO_PKG_VERSION")
    );
}
