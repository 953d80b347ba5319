//! Reader for FASTA files using noodles.
//!
//! Supports both uncompressed and gzip/bgzip compressed files; compression
//! is detected from the `.gz` / `.bgz` extension.

use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles::fasta;

use crate::core::sequence::Sequence;
use crate::parsing::ParseError;
use crate::utils::validation::check_record_limit;

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Read every sequence from a FASTA file.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Noodles` if
/// parsing fails, `ParseError::InvalidFormat` if no sequences are found, or
/// `ParseError::TooManyRecords` if the limit is exceeded.
pub fn read_fasta_file(path: &Path) -> Result<Vec<Sequence>, ParseError> {
    let file = std::fs::File::open(path)?;
    if is_gzipped(path) {
        read_fasta(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        read_fasta(BufReader::new(file))
    }
}

/// Read every sequence from buffered FASTA text.
///
/// # Errors
///
/// Same as [`read_fasta_file`], minus file opening.
pub fn read_fasta<R: BufRead>(reader: R) -> Result<Vec<Sequence>, ParseError> {
    let mut fasta_reader = fasta::io::Reader::new(reader);
    let mut sequences = Vec::new();

    for result in fasta_reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        if check_record_limit(sequences.len()).is_some() {
            return Err(ParseError::TooManyRecords(sequences.len()));
        }

        let name = String::from_utf8_lossy(record.name()).to_string();
        sequences.push(Sequence::new(name, record.sequence().as_ref()));
    }

    if sequences.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No sequences found in FASTA file".to_string(),
        ));
    }

    Ok(sequences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_fasta_text() {
        let text = b">seq1 first\nacgt\nACGT\n>seq2\nMKV\n";
        let seqs = read_fasta(&text[..]).unwrap();
        assert_eq!(seqs.len(), 2);
        assert_eq!(seqs[0].name, "seq1");
        assert_eq!(seqs[0].residues(), b"ACGTACGT");
        assert_eq!(seqs[1].residues(), b"MKV");
    }

    #[test]
    fn test_read_gzipped_file() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let mut file = tempfile::Builder::new().suffix(".fa.gz").tempfile().unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b">chr\nGAATTC\n").unwrap();
        file.write_all(&encoder.finish().unwrap()).unwrap();
        file.flush().unwrap();

        let seqs = read_fasta_file(file.path()).unwrap();
        assert_eq!(seqs[0].residues(), b"GAATTC");
    }

    #[test]
    fn test_empty_file() {
        let file = NamedTempFile::new().unwrap();
        assert!(matches!(
            read_fasta_file(file.path()),
            Err(ParseError::InvalidFormat(_))
        ));
    }
}
