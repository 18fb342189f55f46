use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process;

use fos::BuildConfig;

const DEFAULT_KMER_LENGTH: u32 = 31;

/// Report filenames looked for when the multiqc argument is a directory
const MULTIQC_TEXT_NAME: &str = "multiqc_fastqc.txt";
const MULTIQC_JSON_NAME: &str = "multiqc_data.json";

/// Locate the multiqc report: the argument may name the report file itself
/// or a directory searched for the known report filenames, text before JSON.
fn find_report_file(search: &Path) -> Result<PathBuf> {
    if search.is_file() {
        return Ok(search.to_path_buf());
    }
    if !search.is_dir() {
        return Err(anyhow::anyhow!("directory '{}' not found", search.display()));
    }
    for name in [MULTIQC_TEXT_NAME, MULTIQC_JSON_NAME] {
        if let Some(found) = find_file_in_tree(search, name)? {
            return Ok(found);
        }
    }
    Err(anyhow::anyhow!(
        "no {} or {} found under {}",
        MULTIQC_TEXT_NAME,
        MULTIQC_JSON_NAME,
        search.display()
    ))
}

/// Depth-first search for `name`, visiting subdirectories in sorted order
fn find_file_in_tree(dir: &Path, name: &str) -> Result<Option<PathBuf>> {
    let candidate = dir.join(name);
    if candidate.is_file() {
        return Ok(Some(candidate));
    }

    let mut subdirs = Vec::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;
    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to read directory entry in {}", dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        }
    }
    subdirs.sort();

    for subdir in subdirs {
        if let Some(found) = find_file_in_tree(&subdir, name)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Build the ordered sample listing used to normalise Reindeer query counts",
    long_about = None,
    arg_required_else_help = true
)]
struct Cli {
    /// fof_unitigs.txt file built to launch Reindeer --index
    fof: PathBuf,

    /// Directory of multiqc results (or a multiqc report file); adds the
    /// k-mer counts needed to normalise Reindeer query output
    multiqc_dir: Option<PathBuf>,

    /// K-mer length
    #[arg(
        short = 'k',
        long = "kmer-len",
        default_value_t = DEFAULT_KMER_LENGTH,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    kmer_len: u32,

    /// Output file (- for stdout)
    #[arg(short = 'o', long = "output", default_value = "-")]
    output: String,

    /// Directory of bcalm log files to scrape for 'kmers found' counts
    #[arg(long = "bcalm-logs", conflicts_with = "multiqc_dir")]
    bcalm_logs: Option<PathBuf>,

    /// Filename prefix of bcalm log files
    #[arg(long = "log-prefix", default_value = "")]
    log_prefix: String,

    /// Filename suffix of bcalm log files
    #[arg(long = "log-suffix", default_value = fos::DEFAULT_LOG_SUFFIX)]
    log_suffix: String,

    /// Suppress the version banner and totals
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{} {:#}", "Error:".red(), err);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let report_path = match &cli.multiqc_dir {
        Some(search) => Some(find_report_file(search)?),
        None => None,
    };

    let config = BuildConfig {
        fof_path: cli.fof,
        report_path,
        bcalm_log_dir: cli.bcalm_logs,
        log_prefix: cli.log_prefix,
        log_suffix: cli.log_suffix,
        kmer_length: cli.kmer_len,
        output_path: if cli.output == "-" {
            None
        } else {
            Some(PathBuf::from(&cli.output))
        },
        quiet: cli.quiet,
    };

    config.execute().context("Failed to build sample listing")
}
