//! Triplet frequency report for a text file.
//!
//! Reads a `.txt` file, keeps only its letters, and prints the most frequent
//! triplets (three consecutive letters of a word) as one comma-joined line,
//! followed by the elapsed time. The elapsed line is printed even when the
//! run fails.
//!
//! ## Usage
//!
//! ```bash
//! # Ten most frequent triplets
//! ./target/release/tristat /path/to/book.txt
//!
//! # Twenty, with a scheduling-independent order for ties
//! ./target/release/tristat /path/to/book.txt --top 20 --deterministic
//!
//! # Pin the pool size and show run statistics
//! ./target/release/tristat /path/to/book.txt --threads 4 --stats
//! ```
//!
//! Diagnostics go to stderr and follow `RUST_LOG` (default `warn`).

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tristat_core::analyzer::normalizer::{NormalizerConfig, TextNormalizer};
use tristat_core::{AnalysisStats, AnalyzerConfig, TieBreak, TripletAnalyzer};

/// Most frequent letter triplets of a text file
#[derive(Parser, Debug)]
#[command(name = "tristat", version)]
struct Args {
    /// Path to a .txt file
    path: PathBuf,

    /// Number of triplets to print
    #[arg(long, short = 'n', default_value_t = 10)]
    top: usize,

    /// Worker threads (defaults to the number of logical CPUs)
    #[arg(long, short = 't')]
    threads: Option<usize>,

    /// Words handed to a worker per queue pop
    #[arg(long, default_value_t = 256)]
    chunk_size: usize,

    /// Order equal counts alphabetically instead of by first occurrence
    #[arg(long)]
    deterministic: bool,

    /// Fold Latin diacritics ("café" counts as "cafe")
    #[arg(long)]
    strip_diacritics: bool,

    /// Print run statistics after the result
    #[arg(long)]
    stats: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    let stdout = io::stdout();
    run_timed(&args, &mut stdout.lock())
}

/// Runs the report and prints the elapsed line whether or not it succeeded.
fn run_timed(args: &Args, out: &mut impl Write) -> Result<()> {
    let started = Instant::now();
    let result = run(args, out);
    writeln!(out, "Elapsed: {} ms", started.elapsed().as_millis())?;

    let stats = result?;
    if args.stats {
        writeln!(out, "{stats}, mean {:.2} per triplet", stats.mean_count())?;
    }
    Ok(())
}

fn run(args: &Args, out: &mut impl Write) -> Result<AnalysisStats> {
    check_path(&args.path)?;
    let text = fs::read_to_string(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;

    let mut config = AnalyzerConfig {
        chunk_size: args.chunk_size,
        top_n: args.top,
        tie_break: if args.deterministic {
            TieBreak::Lexicographic
        } else {
            TieBreak::FirstInserted
        },
        ..AnalyzerConfig::default()
    };
    if let Some(threads) = args.threads {
        config = config.with_threads(threads);
    }

    let normalizer = TextNormalizer::new(NormalizerConfig {
        strip_diacritics: args.strip_diacritics,
    });
    let normalized = normalizer.normalize(&text);

    let analysis = TripletAnalyzer::new(config)
        .context("invalid analyzer settings")?
        .analyze(&normalized)
        .context("triplet analysis failed")?;

    let line = analysis.render();
    if !line.is_empty() {
        writeln!(out, "{line}")?;
    }
    Ok(*analysis.stats())
}

fn check_path(path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("cannot find file {}", path.display());
    }
    if path.extension().and_then(|ext| ext.to_str()) != Some("txt") {
        bail!("{} is not a text file (expected .txt)", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn args(path: PathBuf) -> Args {
        Args::parse_from([OsStr::new("tristat"), path.as_os_str()])
    }

    fn scratch(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("tristat-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn elapsed_printed_on_missing_file() {
        let mut out = Vec::new();
        let err = run_timed(&args(PathBuf::from("/no/such/book.txt")), &mut out).unwrap_err();

        assert!(err.to_string().contains("cannot find file"));
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with("Elapsed: "), "{printed}");
    }

    #[test]
    fn rejects_non_txt_extension() {
        let path = scratch("book.md", "abc abc");
        let err = check_path(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(err.to_string().contains("expected .txt"));
    }

    #[test]
    fn prints_result_then_elapsed() {
        let path = scratch("report.txt", "Abcabc, AAAA!");
        let mut cli = args(path.clone());
        cli.deterministic = true;
        cli.stats = true;

        let mut out = Vec::new();
        let result = run_timed(&cli, &mut out);
        fs::remove_file(&path).unwrap();
        result.unwrap();

        let printed = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = printed.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "aaa,abc,bca,cab");
        assert!(lines[1].starts_with("Elapsed: "));
        assert!(lines[2].ends_with("mean 1.50 per triplet"), "{}", lines[2]);
    }
}
