use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};

use blockzip_core::compression::GzipCodec;
use blockzip_core::constants::{DEFAULT_BLOCK_SIZE, DEFAULT_LEVEL_GZIP};
use blockzip_core::stream::{
    compress_stream, decompress_stream, InputSource, MemoryGateConfig, OutputSink,
    ParallelismProfile, PipelineConfig,
};

mod diagnostics;

use diagnostics::{describe, CliError, FileRole, INVALID_COMMAND, MISSING_ARGUMENTS};

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Command {
    /// Slice the source into blocks and compress them in parallel
    Compress,
    /// Restore a file produced by `compress`
    Decompress,
}

#[derive(Debug, Parser)]
#[command(
    name = "blockzip",
    about = "Parallel block gzip: compress or decompress a file using all cores",
    version
)]
struct Args {
    /// compress | decompress (case-insensitive)
    #[arg(value_enum, ignore_case = true)]
    command: Command,
    /// File to read
    source: PathBuf,
    /// File to create or overwrite
    destination: PathBuf,
    /// Positional arguments past the destination are accepted and ignored
    #[arg(hide = true)]
    extra: Vec<String>,
    /// Raw bytes per block when compressing
    #[arg(short, long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,
    /// Transform workers (default: available cores minus two, at least one)
    #[arg(short, long)]
    workers: Option<usize>,
    /// Gzip level, 0 (store) to 9 (best)
    #[arg(short, long, default_value_t = DEFAULT_LEVEL_GZIP)]
    level: u32,
    /// Free memory required before another block is admitted, in MiB
    #[arg(long)]
    memory_reservation_mb: Option<u64>,
    /// Pause between memory probes while stalled, in milliseconds
    #[arg(long)]
    retry_interval_ms: Option<u64>,
    /// Print run statistics as JSON to stderr
    #[arg(long)]
    stats: bool,
    /// Log pipeline progress
    #[arg(short, long)]
    verbose: bool,
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn pipeline_config(args: &Args) -> anyhow::Result<PipelineConfig> {
    let parallelism = match args.workers {
        Some(n) => ParallelismProfile::fixed(n)?,
        None => ParallelismProfile::dynamic(),
    };

    let mut memory = MemoryGateConfig::default();
    if let Some(mb) = args.memory_reservation_mb {
        memory.reservation = mb.saturating_mul(1024 * 1024);
    }
    if let Some(ms) = args.retry_interval_ms {
        memory.retry_interval = Duration::from_millis(ms);
    }

    Ok(PipelineConfig::new()
        .with_block_size(args.block_size)
        .with_codec(Arc::new(GzipCodec::new(args.level)?))
        .with_parallelism(parallelism)
        .with_memory_gate(memory))
}

fn open_source(path: &Path) -> Result<File, CliError> {
    let open_err = |source| CliError::Open { role: FileRole::Source, path: path.to_path_buf(), source };
    let meta = fs::metadata(path).map_err(open_err)?;
    if !meta.is_file() {
        return Err(CliError::NotAFile { role: FileRole::Source, path: path.to_path_buf() });
    }
    File::open(path).map_err(open_err)
}

fn create_destination(path: &Path) -> Result<File, CliError> {
    if let Ok(meta) = fs::metadata(path) {
        if !meta.is_file() {
            return Err(CliError::NotAFile { role: FileRole::Destination, path: path.to_path_buf() });
        }
    }
    File::create(path).map_err(|source| CliError::Open {
        role: FileRole::Destination,
        path: path.to_path_buf(),
        source,
    })
}

// ── Run ────────────────────────────────────────────────────────────────────

fn run(args: &Args) -> anyhow::Result<()> {
    let config = pipeline_config(args)?;
    debug!("{:?}", config);
    if !args.extra.is_empty() {
        warn!("ignoring extra arguments: {:?}", args.extra);
    }

    // Source first: a missing source must not leave an empty destination behind.
    let source = open_source(&args.source)?;
    let destination = create_destination(&args.destination)?;

    let input = InputSource::Reader(Box::new(source));
    let output = OutputSink::Writer(Box::new(BufWriter::new(destination)));

    let snapshot = match args.command {
        Command::Compress => compress_stream(input, output, &config)?,
        Command::Decompress => decompress_stream(input, output, &config)?,
    };

    info!(
        "{:?}: {} blocks, {} -> {} bytes in {:.3}s",
        args.command,
        snapshot.blocks_written,
        snapshot.bytes_in,
        snapshot.bytes_out,
        snapshot.elapsed.as_secs_f64()
    );
    if args.stats {
        let json = serde_json::to_string_pretty(&snapshot).context("serializing run statistics")?;
        eprintln!("{json}");
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = e.print();
                    ExitCode::SUCCESS
                }
                ErrorKind::MissingRequiredArgument => {
                    eprintln!("{MISSING_ARGUMENTS}");
                    ExitCode::FAILURE
                }
                // `command` is the only argument with a fixed set of values
                ErrorKind::InvalidValue => {
                    eprintln!("{INVALID_COMMAND}");
                    ExitCode::FAILURE
                }
                _ => {
                    let _ = e.print();
                    ExitCode::FAILURE
                }
            };
        }
    };

    let default_filter = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!("{err:?}");
            eprintln!("{}", describe(&err));
            ExitCode::FAILURE
        }
    }
}
