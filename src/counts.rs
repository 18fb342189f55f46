use crate::error::FosError;
use crate::multiqc::MultiqcRecord;

/// A sample name paired with its estimated k-mer count.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleCount {
    pub sample: String,
    pub kmers: i64,
}

/// Run-wide sums over every resolved sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub reads: i64,
    pub kmers: i64,
}

/// Estimate the k-mer count of every sample from multiqc records.
///
/// Records are scanned in order for each sample: a record named `<sample>`
/// counts as single-end, `<sample>_1` as paired-end with twice the k-mers,
/// and a later match overwrites an earlier one. Every match adds its read
/// count to the totals. A sample left at zero after the full scan fails the
/// whole run with `NoMatchingRecord`; partial listings are never produced.
pub fn estimate_sample_kmers(
    samples: &[String],
    records: &[MultiqcRecord],
    kmer_len: u32,
) -> Result<(Vec<SampleCount>, Totals), FosError> {
    let k = i64::from(kmer_len);
    let mut counts = Vec::with_capacity(samples.len());
    let mut totals = Totals::default();

    for sample in samples {
        let paired = format!("{sample}_1");
        let mut kmers: i64 = 0;
        for record in records {
            if record.sample == *sample {
                let read_len = truncate(record.avg_length);
                let read_num = truncate(record.read_count);
                kmers = (read_len - k + 1) * read_num;
                totals.reads += read_num;
            } else if record.sample == paired {
                let read_len = truncate(record.avg_length);
                let read_num = truncate(record.read_count);
                kmers = (read_len - k + 1) * read_num * 2; // paired-end: both mates contribute
                totals.reads += read_num;
            }
        }
        if kmers == 0 {
            return Err(FosError::NoMatchingRecord(sample.clone()));
        }
        totals.kmers += kmers;
        counts.push(SampleCount {
            sample: sample.clone(),
            kmers,
        });
    }
    Ok((counts, totals))
}

/// Report values may be serialised with decimal points; they are truncated
/// toward zero before entering the formula.
fn truncate(value: f64) -> i64 {
    value as i64
}
