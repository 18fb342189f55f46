use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use crate::bcalm::{kmers_found_in_logs, BcalmLookup};
use crate::counts::{estimate_sample_kmers, SampleCount, Totals};
use crate::fof::read_sample_names;
use crate::multiqc::load_report;

/// Configuration for one listing build
pub struct BuildConfig {
    pub fof_path: PathBuf,
    pub report_path: Option<PathBuf>, // resolved multiqc report file
    pub bcalm_log_dir: Option<PathBuf>,
    pub log_prefix: String,
    pub log_suffix: String,
    pub kmer_length: u32,
    pub output_path: Option<PathBuf>,
    pub quiet: bool,
}

impl BuildConfig {
    pub fn execute(&self) -> Result<()> {
        run_build(self)
    }
}

/// Ordered output lines, plus totals when a multiqc report supplied them.
struct Listing {
    lines: Vec<String>,
    totals: Option<Totals>,
}

fn tab_separated(counts: &[SampleCount]) -> Vec<String> {
    counts
        .iter()
        .map(|count| format!("{}\t{}", count.sample, count.kmers))
        .collect()
}

fn compose_listing(config: &BuildConfig) -> Result<Listing> {
    let samples = read_sample_names(&config.fof_path)?;

    if let Some(report_path) = &config.report_path {
        let records = load_report(report_path)?;
        let (counts, totals) = estimate_sample_kmers(&samples, &records, config.kmer_length)?;
        return Ok(Listing {
            lines: tab_separated(&counts),
            totals: Some(totals),
        });
    }

    if let Some(log_dir) = &config.bcalm_log_dir {
        match kmers_found_in_logs(log_dir, &samples, &config.log_prefix, &config.log_suffix)? {
            BcalmLookup::Counts(counts) => {
                return Ok(Listing {
                    lines: tab_separated(&counts),
                    totals: None,
                });
            }
            BcalmLookup::Incomplete(reason) => {
                eprintln!(
                    "{}",
                    format!("Warning: {reason}; kmers found will not be reported.").yellow()
                );
            }
        }
    }

    Ok(Listing {
        lines: samples,
        totals: None,
    })
}

pub fn run_build(config: &BuildConfig) -> Result<()> {
    if !config.quiet {
        let mode = if config.report_path.is_some() {
            "multiqc"
        } else if config.bcalm_log_dir.is_some() {
            "bcalm"
        } else {
            "listing"
        };
        eprintln!(
            "Fos v{}; mode: {}; k: {}",
            env!("CARGO_PKG_VERSION"),
            mode,
            config.kmer_length
        );
    }

    let listing = compose_listing(config)?;

    // The destination is opened only once matching has succeeded for every
    // sample; a failed run must not leave a partial or empty listing behind.
    let mut writer: Box<dyn Write> = if let Some(path) = &config.output_path {
        Box::new(BufWriter::new(File::create(path)?))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };
    for line in &listing.lines {
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;

    if !config.quiet
        && let Some(totals) = listing.totals
    {
        eprintln!(
            "{}",
            format!(
                "\nExtra info\n----------\n  Total reads: {}\n  Total kmers: {}.",
                totals.reads, totals.kmers
            )
            .green()
        );
    }

    Ok(())
}
