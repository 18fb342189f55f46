//! # Fos
//!
//! Builds the ordered sample listing (`fos.txt`) for a Reindeer index.
//!
//! Fos derives one sample name per line of the `fof_unitigs.txt` listing used
//! to build the index, then pairs each with an estimated k-mer count taken
//! from multiqc read statistics or scraped from bcalm logs, producing the
//! table downstream tooling uses to normalise Reindeer query counts.
//!

pub mod bcalm;
pub mod build;
pub mod counts;
pub mod error;
pub mod fof;
pub mod multiqc;

// Re-export the main functionality
pub use bcalm::{kmers_found_in_logs, BcalmLookup, DEFAULT_LOG_SUFFIX};

pub use build::{run_build, BuildConfig};

pub use counts::{estimate_sample_kmers, SampleCount, Totals};

pub use error::FosError;

pub use fof::{derive_sample_name, read_sample_names, UNITIG_SUFFIX_WIDTH};

pub use multiqc::{
    load_report, MultiqcRecord, AVG_LENGTH_COLUMNS, READ_COUNT_COLUMNS, SAMPLE_COLUMN,
};
