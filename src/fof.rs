use std::fs;
use std::path::Path;

use crate::error::FosError;

/// Width of the fixed suffix stripped from each listing line's file name:
/// the `.unitigs.fa` extension bcalm gives unitig files, plus the line
/// terminator the reader keeps.
pub const UNITIG_SUFFIX_WIDTH: usize = 12;

/// Read a fof_unitigs.txt listing and derive one sample name per non-blank
/// line. File order is preserved: it fixes the output ordering downstream.
pub fn read_sample_names(path: &Path) -> Result<Vec<String>, FosError> {
    if !path.is_file() {
        return Err(FosError::InputNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let mut samples = Vec::new();
    for (idx, line) in content.split_inclusive('\n').enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        samples.push(derive_sample_name(line, idx + 1)?);
    }
    Ok(samples)
}

/// Derive a sample name from one raw listing line, terminator included:
/// the file-name portion minus the fixed-width unitig suffix and any
/// trailing whitespace. Pure; the strip is positional, not pattern-based.
pub fn derive_sample_name(raw_line: &str, line: usize) -> Result<String, FosError> {
    let base = Path::new(raw_line)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("");
    let Some(kept) = base.chars().count().checked_sub(UNITIG_SUFFIX_WIDTH) else {
        return Err(FosError::MalformedInput {
            line,
            path: raw_line.trim_end().to_string(),
        });
    };
    let name: String = base.chars().take(kept).collect();
    Ok(name.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_derive_sample_name() {
        let name = derive_sample_name("/data/unitigs/SRR123456.unitigs.fa\n", 1).unwrap();
        assert_eq!(name, "SRR123456");
    }

    #[test]
    fn test_derive_relative_path() {
        let name = derive_sample_name("unitigs/ERR1.unitigs.fa\n", 1).unwrap();
        assert_eq!(name, "ERR1");
    }

    #[test]
    fn test_derive_trims_trailing_whitespace() {
        // Whitespace between the name and the suffix survives the strip and
        // is trimmed afterwards.
        let name = derive_sample_name("/data/S1   .unitigs.fa\n", 1).unwrap();
        assert_eq!(name, "S1");
    }

    #[test]
    fn test_derive_without_terminator_drops_a_character() {
        // A final listing line without a newline loses one more character;
        // machine-written listings always carry the terminator.
        let name = derive_sample_name("/data/SRR123456.unitigs.fa", 1).unwrap();
        assert_eq!(name, "SRR12345");
    }

    #[test]
    fn test_short_base_name_is_malformed() {
        let err = derive_sample_name("/data/x.fa\n", 3).unwrap_err();
        assert!(matches!(err, FosError::MalformedInput { line: 3, .. }));
    }

    #[test]
    fn test_read_sample_names_keeps_order_and_skips_blanks() {
        let mut listing = tempfile::NamedTempFile::new().unwrap();
        write!(
            listing,
            "/data/sample_b.unitigs.fa\n\n/data/sample_a.unitigs.fa\n"
        )
        .unwrap();
        let samples = read_sample_names(listing.path()).unwrap();
        assert_eq!(samples, vec!["sample_b", "sample_a"]);
    }

    #[test]
    fn test_read_sample_names_missing_listing() {
        let err = read_sample_names(Path::new("no/such/listing.txt")).unwrap_err();
        assert!(matches!(err, FosError::InputNotFound(_)));
    }
}
