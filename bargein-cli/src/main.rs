//! `bargein`: run the onset detector over a recorded call.
//!
//! ```text
//! bargein --input call.ulaw
//! bargein --input call.wav --json > frames.jsonl
//! bargein --input leg.raw --encoding pcm16 --sample-rate 16000 --window 40
//! ```

mod scan;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use bargein_core::{Detector, DetectorConfig, Encoding};
use tracing::{error, info};

const USAGE: &str = "Usage: bargein --input <file> [--config <detector.json>] \\
  [--encoding mulaw|pcm16] [--sample-rate <hz>] [--window <frames>] [--json]

Raw inputs are read as headerless samples in the configured encoding.
Files ending in .wav must be 16-bit integer PCM; rate and encoding come from the header.";

#[derive(Debug, Default, PartialEq)]
struct Args {
    input: PathBuf,
    config: Option<PathBuf>,
    encoding: Option<Encoding>,
    sample_rate: Option<u32>,
    window: Option<usize>,
    json: bool,
}

/// Parse CLI arguments. `Ok(None)` means `--help` was requested.
fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Option<Args>> {
    let mut parsed = Args::default();
    let mut input: Option<PathBuf> = None;

    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        let mut value = |name: &str| {
            it.next()
                .with_context(|| format!("missing value for {name}"))
        };
        match arg.as_str() {
            "--input" | "-i" => input = Some(PathBuf::from(value("--input")?)),
            "--config" => parsed.config = Some(PathBuf::from(value("--config")?)),
            "--encoding" => parsed.encoding = Some(value("--encoding")?.parse()?),
            "--sample-rate" => {
                parsed.sample_rate = Some(
                    value("--sample-rate")?
                        .parse()
                        .context("invalid value for --sample-rate")?,
                )
            }
            "--window" => {
                parsed.window = Some(
                    value("--window")?
                        .parse()
                        .context("invalid value for --window")?,
                )
            }
            "--json" => parsed.json = true,
            "--help" | "-h" => return Ok(None),
            other => bail!("unknown argument: {other}"),
        }
    }

    parsed.input = input.context("missing required --input")?;
    Ok(Some(parsed))
}

/// Config file (if any) first, then flag overrides.
fn resolve_config(args: &Args) -> Result<DetectorConfig> {
    let mut config = match &args.config {
        Some(path) => DetectorConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DetectorConfig::default(),
    };
    if let Some(encoding) = args.encoding {
        config.encoding = encoding;
    }
    if let Some(rate) = args.sample_rate {
        config.sample_rate = rate;
    }
    if let Some(window) = args.window {
        config.window_frames = window;
    }
    Ok(config)
}

fn run(args: Args) -> Result<()> {
    let mut config = resolve_config(&args)?;
    let audio = scan::read_input(&args.input, &mut config)?;

    let mut detector = Detector::new(config).context("failed to create detector")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = scan::scan(&mut detector, &audio, args.json, &mut out)?;
    out.flush()?;

    info!(
        frames = summary.frames,
        onsets = summary.onsets.len(),
        skipped_bytes = summary.skipped_bytes,
        "scan complete"
    );
    detector.close();
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bargein=info")),
        )
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(Some(args)) => args,
        Ok(None) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{e:#}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
