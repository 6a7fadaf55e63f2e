// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use crate::app_config::Config;
use crate::media_probe::FfprobeProbe;
use crate::media_streamer::{ChunkStream, ServePlan};
use crate::subtitle_engine::SubtitleEngine;

mod app_config;
mod encoding_detector;
mod errors;
mod file_utils;
mod library_catalog;
mod media_probe;
mod media_streamer;
mod subtitle_codec;
mod subtitle_document;
mod subtitle_engine;
mod timecode;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Shift subtitle timings by a millisecond offset
    Shift {
        /// Subtitle file to shift (.srt or .vtt)
        input: PathBuf,

        /// Offset in milliseconds (negative shifts clamp at zero)
        #[arg(allow_hyphen_values = true)]
        offset_ms: i64,

        /// Output file (defaults to <stem>_shifted.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a subtitle file between SRT and WebVTT
    Convert {
        /// Subtitle file to convert
        input: PathBuf,

        /// Target format (srt or vtt)
        format: String,

        /// Output file (defaults to <stem>.<target ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate subtitle synchronization against a media file
    Sync {
        /// Subtitle file to check
        subtitle: PathBuf,

        /// Media file probed for its true duration
        media: PathBuf,

        /// Allowed relative difference (overrides configuration)
        #[arg(short, long)]
        tolerance: Option<f64>,
    },

    /// Preview the byte-range plan for a file and Range header
    Range {
        /// File that would be served
        file: PathBuf,

        /// Range header value, e.g. "bytes=200-499"
        header: Option<String>,

        /// Also stream the planned bytes to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions for substream
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// substream - subtitle timing and media delivery toolbox
///
/// Parses, shifts and converts SRT/WebVTT subtitles, validates their
/// synchronization against media files, and previews byte-range serving
/// plans.
#[derive(Parser, Debug)]
#[command(name = "substream")]
#[command(version = "1.0.0")]
#[command(about = "Subtitle timing and media delivery toolbox")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default; the level is
    // raised or lowered again after the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "substream", &mut std::io::stdout());
        return Ok(());
    }

    let config = Config::from_file(&cli.config_path)?;
    let level = cli
        .log_level
        .map(app_config::LogLevel::from)
        .unwrap_or(config.log_level);
    log::set_max_level(level.to_level_filter());

    let engine = SubtitleEngine::with_config(&config);

    match cli.command {
        Commands::Shift {
            input,
            offset_ms,
            output,
        } => {
            let written = engine.shift_file(&input, offset_ms, output.as_deref())?;
            info!("Shifted {:?} by {} ms -> {:?}", input, offset_ms, written);
        }
        Commands::Convert {
            input,
            format,
            output,
        } => {
            let written = engine.convert_file(&input, &format, output.as_deref())?;
            info!("Converted {:?} -> {:?}", input, written);
        }
        Commands::Sync {
            subtitle,
            media,
            tolerance,
        } => {
            let engine = match tolerance {
                Some(t) => engine.with_sync_tolerance(t),
                None => engine,
            };
            let document = engine.parse(&subtitle, None)?;
            let probe = FfprobeProbe::new();
            let in_sync = engine
                .validate_sync_with_probe(&probe, &document, &media)
                .await?;
            if in_sync {
                println!("in sync ({} entries, span {} ms)", document.len(), document.span_ms());
            } else {
                println!("out of sync (span {} ms)", document.span_ms());
                std::process::exit(1);
            }
        }
        Commands::Range { file, header, output } => {
            let size = std::fs::metadata(&file)?.len();
            let plan = ServePlan::from_range_header(header.as_deref(), size)?;
            println!("status: {}", plan.status());
            println!("content-length: {}", plan.content_length());
            if let Some(content_range) = plan.content_range() {
                println!("content-range: {}", content_range);
            }

            if let Some(output) = output {
                let stream = ChunkStream::open_with_config(&file, &plan, &config)?;
                let mut out = std::fs::File::create(&output)?;
                let mut written = 0u64;
                for chunk in stream {
                    let chunk = chunk?;
                    out.write_all(&chunk)?;
                    written += chunk.len() as u64;
                }
                info!("Wrote {} bytes to {:?}", written, output);
            }
        }
        Commands::Completions { .. } => {
            return Err(anyhow!("unreachable: completions handled above"));
        }
    }

    Ok(())
}
