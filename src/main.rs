use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use luhn_guard_filter::governance::filter_lines;
use luhn_guard_filter::{FilterConfig, LuhnScanner, StreamPump};

#[derive(Parser)]
#[command(name = "luhn-guard")]
#[command(about = "Mask Luhn-valid card numbers in a byte stream (stdin to stdout)", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(long, env = "LUHN_GUARD_CONFIG")]
    config: Option<PathBuf>,

    /// Working buffer size in bytes (default from config: 32768)
    #[arg(long)]
    buffer_size: Option<usize>,

    /// Character written in place of each masked digit
    #[arg(long)]
    mask: Option<char>,

    /// Fewest digits in a maskable run
    #[arg(long)]
    min_digits: Option<usize>,

    /// Most digits in a maskable run
    #[arg(long)]
    max_digits: Option<usize>,

    /// Filter whole lines instead of using the fixed buffer
    #[arg(long)]
    lines: bool,

    /// Do not emit the end-of-stream audit line
    #[arg(long, short)]
    quiet: bool,
}

impl Cli {
    fn load_config(&self) -> Result<FilterConfig> {
        let mut config = match &self.config {
            Some(path) => FilterConfig::from_file(path)?,
            None => FilterConfig::default(),
        };

        if let Some(size) = self.buffer_size {
            config.buffer_capacity = size;
        }
        if let Some(mask) = self.mask {
            config.mask = mask;
        }
        if let Some(min) = self.min_digits {
            config.min_digits = min;
        }
        if let Some(max) = self.max_digits {
            config.max_digits = max;
        }
        if self.quiet {
            config.log_redactions = false;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Stderr log level when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "warn";

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the filtered stream
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config().context("invalid configuration")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut sink = BufWriter::new(stdout.lock());

    if cli.lines {
        let scanner = LuhnScanner::from_config(&config);
        let lines = filter_lines(stdin.lock(), &mut sink, &scanner)
            .context("error filtering stdin")?;
        info!("filtered {} lines", lines);
        return Ok(());
    }

    let mut pump = StreamPump::new(&config);
    pump.run(stdin.lock(), &mut sink)
        .context("error filtering stdin")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_filter_hides_audit_line() {
        // The end-of-stream audit line is logged at info
        assert_eq!(DEFAULT_LOG_FILTER, "warn");
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "luhn-guard",
            "--buffer-size",
            "128",
            "--mask",
            "*",
            "--quiet",
        ])
        .unwrap();
        let config = cli.load_config().unwrap();

        assert_eq!(config.buffer_capacity, 128);
        assert_eq!(config.mask_byte(), b'*');
        assert!(!config.log_redactions);
        assert_eq!(config.min_digits, 14);
    }

    #[test]
    fn test_invalid_flags_rejected() {
        let cli = Cli::try_parse_from(["luhn-guard", "--mask", "7"]).unwrap();
        assert!(cli.load_config().is_err());
    }
}
