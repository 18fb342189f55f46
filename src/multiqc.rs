use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::FosError;

/// Column holding the sample name in tab-delimited multiqc tables.
pub const SAMPLE_COLUMN: &str = "Sample";

/// Recognised names for the average read length column, tried in order.
/// multiqc_fastqc.txt uses the first form, multiqc_general_stats.txt the
/// second.
pub const AVG_LENGTH_COLUMNS: [&str; 2] = [
    "avg_sequence_length",
    "FastQC_mqc-generalstats-fastqc-avg_sequence_length",
];

/// Recognised names for the read count column, tried in order.
pub const READ_COUNT_COLUMNS: [&str; 2] = [
    "FastQC_mqc-generalstats-fastqc-total_sequences",
    "Total Sequences",
];

/// Keys of multiqc_data.json general stats entries. Unlike the text tables,
/// the JSON encoding has never renamed them, so no synonym lookup happens.
const JSON_AVG_LENGTH_KEY: &str = "avg_sequence_length";
const JSON_READ_COUNT_KEY: &str = "total_sequences";

/// One per-fastq entry of a multiqc report: identifier plus the two stats
/// needed for k-mer estimation. Paired-end runs carry `_1`/`_2` identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiqcRecord {
    pub sample: String,
    pub avg_length: f64,
    pub read_count: f64,
}

/// Load a multiqc report of either encoding into a flat record list.
/// `.json` files (any case) take the JSON path; anything else is read as a
/// tab-delimited table with a header row.
pub fn load_report(path: &Path) -> Result<Vec<MultiqcRecord>, FosError> {
    if !path.is_file() {
        return Err(FosError::InputNotFound(path.to_path_buf()));
    }
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        load_json_report(path)
    } else {
        load_text_report(path)
    }
}

/// Positions of the needed columns in a text report header.
#[derive(Debug, Clone, Copy)]
struct ColumnIndexes {
    sample: usize,
    avg_length: usize,
    read_count: usize,
}

/// Resolve the sample, average-length and read-count columns of a header
/// row. The sample column has exactly one accepted name; the other two try
/// their synonyms in priority order, first present wins.
fn resolve_columns(header: &str) -> Result<ColumnIndexes, FosError> {
    let cells: Vec<&str> = header.trim().split('\t').collect();
    let sample = cells
        .iter()
        .position(|cell| *cell == SAMPLE_COLUMN)
        .ok_or(FosError::MissingField("sample"))?;
    let avg_length = AVG_LENGTH_COLUMNS
        .iter()
        .find_map(|name| cells.iter().position(|cell| cell == name))
        .ok_or(FosError::MissingField("average sequence length"))?;
    let read_count = READ_COUNT_COLUMNS
        .iter()
        .find_map(|name| cells.iter().position(|cell| cell == name))
        .ok_or(FosError::MissingField("read count"))?;
    Ok(ColumnIndexes {
        sample,
        avg_length,
        read_count,
    })
}

fn load_text_report(path: &Path) -> Result<Vec<MultiqcRecord>, FosError> {
    let content = fs::read_to_string(path)?;
    let mut lines = content.lines();
    let header = lines.next().unwrap_or("");
    let columns = resolve_columns(header)?;

    let mut records = Vec::new();
    for (idx, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split('\t').collect();
        let line_no = idx + 2; // the header is line 1
        records.push(MultiqcRecord {
            sample: cell(&cells, columns.sample, line_no)?.to_string(),
            avg_length: numeric_cell(&cells, columns.avg_length, line_no)?,
            read_count: numeric_cell(&cells, columns.read_count, line_no)?,
        });
    }
    Ok(records)
}

fn cell<'a>(cells: &[&'a str], index: usize, line: usize) -> Result<&'a str, FosError> {
    cells
        .get(index)
        .copied()
        .ok_or_else(|| FosError::MalformedReport {
            line,
            reason: format!("missing field {}", index + 1),
        })
}

fn numeric_cell(cells: &[&str], index: usize, line: usize) -> Result<f64, FosError> {
    let raw = cell(cells, index, line)?.trim();
    raw.parse().map_err(|_| FosError::MalformedReport {
        line,
        reason: format!("invalid number {raw:?}"),
    })
}

#[derive(Deserialize)]
struct GeneralStats {
    report_general_stats_data: Vec<Map<String, Value>>,
}

/// Flatten the general stats arrays of a multiqc_data.json document.
/// Entries contributed by modules other than FastQC lack the two stats keys
/// and are skipped. Objects are visited in array order, entries in key order,
/// so a `_1` entry is always seen after its bare counterpart.
fn load_json_report(path: &Path) -> Result<Vec<MultiqcRecord>, FosError> {
    let file = File::open(path)?;
    let stats: GeneralStats = serde_json::from_reader(BufReader::new(file))?;

    let mut records = Vec::new();
    for entry in &stats.report_general_stats_data {
        for (fastq, infos) in entry {
            let (Some(avg_length), Some(read_count)) = (
                stat_value(infos, JSON_AVG_LENGTH_KEY),
                stat_value(infos, JSON_READ_COUNT_KEY),
            ) else {
                continue;
            };
            records.push(MultiqcRecord {
                sample: fastq.clone(),
                avg_length,
                read_count,
            });
        }
    }
    Ok(records)
}

fn stat_value(infos: &Value, key: &str) -> Option<f64> {
    infos.get(key).and_then(Value::as_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_resolve_fastqc_header() {
        let columns =
            resolve_columns("Sample\tFilename\tavg_sequence_length\tTotal Sequences").unwrap();
        assert_eq!(columns.sample, 0);
        assert_eq!(columns.avg_length, 2);
        assert_eq!(columns.read_count, 3);
    }

    #[test]
    fn test_resolve_general_stats_header() {
        let header = "Sample\tFastQC_mqc-generalstats-fastqc-total_sequences\tFastQC_mqc-generalstats-fastqc-avg_sequence_length";
        let columns = resolve_columns(header).unwrap();
        assert_eq!(columns.sample, 0);
        assert_eq!(columns.avg_length, 2);
        assert_eq!(columns.read_count, 1);
    }

    #[test]
    fn test_first_synonym_wins() {
        let header = "Sample\tFastQC_mqc-generalstats-fastqc-avg_sequence_length\tavg_sequence_length\tTotal Sequences";
        let columns = resolve_columns(header).unwrap();
        assert_eq!(columns.avg_length, 2);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let err = resolve_columns("Sample\tTotal Sequences").unwrap_err();
        assert!(matches!(
            err,
            FosError::MissingField("average sequence length")
        ));
    }

    #[test]
    fn test_load_text_report() {
        let mut report = tempfile::NamedTempFile::new().unwrap();
        write!(
            report,
            "Sample\tavg_sequence_length\tTotal Sequences\n\
             sample_a\t150.0\t1000\n\
             \n\
             sample_b_1\t100.7\t2000.0\n"
        )
        .unwrap();
        let records = load_report(report.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sample, "sample_a");
        assert_eq!(records[0].avg_length, 150.0);
        assert_eq!(records[1].sample, "sample_b_1");
        assert_eq!(records[1].avg_length, 100.7);
        assert_eq!(records[1].read_count, 2000.0);
    }

    #[test]
    fn test_unparseable_record_is_malformed() {
        let mut report = tempfile::NamedTempFile::new().unwrap();
        write!(
            report,
            "Sample\tavg_sequence_length\tTotal Sequences\nsample_a\tnot-a-number\t1000\n"
        )
        .unwrap();
        let err = load_report(report.path()).unwrap_err();
        assert!(matches!(err, FosError::MalformedReport { line: 2, .. }));
    }

    #[test]
    fn test_load_json_report_skips_foreign_modules() {
        let mut report = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .unwrap();
        write!(
            report,
            r#"{{"report_general_stats_data": [
                {{"sample_a": {{"avg_sequence_length": 150.5, "total_sequences": 1000, "percent_gc": 47.0}},
                  "sample_b_1": {{"avg_sequence_length": 100, "total_sequences": 2000}}}},
                {{"sample_a": {{"percent_duplicates": 12.5}}}}
            ]}}"#
        )
        .unwrap();
        let records = load_report(report.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sample, "sample_a");
        assert_eq!(records[0].avg_length, 150.5);
        assert_eq!(records[1].sample, "sample_b_1");
        assert_eq!(records[1].read_count, 2000.0);
    }

    #[test]
    fn test_json_extension_any_case() {
        let mut report = tempfile::Builder::new()
            .suffix(".JSON")
            .tempfile()
            .unwrap();
        write!(report, r#"{{"report_general_stats_data": []}}"#).unwrap();
        assert!(load_report(report.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_report_file() {
        let err = load_report(Path::new("no/such/multiqc_fastqc.txt")).unwrap_err();
        assert!(matches!(err, FosError::InputNotFound(_)));
    }
}
