use std::fs;
use std::path::Path;

use crate::counts::SampleCount;
use crate::error::FosError;

/// Default name pattern of per-sample bcalm logs: `<sample>_bcalm.log`.
pub const DEFAULT_LOG_SUFFIX: &str = "_bcalm.log";

/// Marker of the log line carrying the count; the count itself is the
/// seventh whitespace-separated token of that line.
const KMERS_FOUND_MARKER: &str = "kmers found";
const KMERS_FOUND_TOKEN: usize = 6;

/// Outcome of a bcalm log scan. Annotation is all-or-nothing: any
/// inconsistency abandons it in favour of the bare sample listing, with the
/// reason surfaced as a warning by the caller.
#[derive(Debug)]
pub enum BcalmLookup {
    Counts(Vec<SampleCount>),
    Incomplete(String),
}

/// Scrape `kmers found` figures from per-sample logs named
/// `<prefix><sample><suffix>` under `log_dir`. The directory itself must
/// exist; everything below that degrades softly to `Incomplete`.
pub fn kmers_found_in_logs(
    log_dir: &Path,
    samples: &[String],
    prefix: &str,
    suffix: &str,
) -> Result<BcalmLookup, FosError> {
    if !log_dir.is_dir() {
        return Err(FosError::InputNotFound(log_dir.to_path_buf()));
    }

    let log_files = fs::read_dir(log_dir)?
        .filter_map(|entry| entry.ok())
        .count();
    if log_files < samples.len() {
        return Ok(BcalmLookup::Incomplete(format!(
            "{} log files for {} samples",
            log_files,
            samples.len()
        )));
    }

    let mut counts = Vec::with_capacity(samples.len());
    for sample in samples {
        let log_path = log_dir.join(format!("{prefix}{sample}{suffix}"));
        let Ok(content) = fs::read_to_string(&log_path) else {
            return Ok(BcalmLookup::Incomplete(format!(
                "file {} not found",
                log_path.display()
            )));
        };
        match kmers_found(&content) {
            Some(kmers) => counts.push(SampleCount {
                sample: sample.clone(),
                kmers,
            }),
            None => {
                return Ok(BcalmLookup::Incomplete(format!(
                    "no usable '{}' count in {}",
                    KMERS_FOUND_MARKER,
                    log_path.display()
                )));
            }
        }
    }
    Ok(BcalmLookup::Counts(counts))
}

/// Pull the count out of a log's contents: the first line containing the
/// marker, split on whitespace, token seven.
fn kmers_found(content: &str) -> Option<i64> {
    let line = content
        .lines()
        .find(|line| line.contains(KMERS_FOUND_MARKER))?;
    line.split_whitespace()
        .nth(KMERS_FOUND_TOKEN)?
        .parse()
        .ok()
}
