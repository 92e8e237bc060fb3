//! Drives a [`Scanner`] over a file of interleaved signed-byte I/Q
//! samples, chunk by chunk.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use phy::PhyFrontend;

use crate::error::ScanError;
use crate::fsm::{ScanStats, Scanner};

const READ_CHUNK_MAX: usize = 1 << 20;

/// Reads `path` in `chunk_size`-byte pieces, feeding each into
/// `scanner.work()`, until the file is exhausted.
pub fn run_scan_from_file<P: PhyFrontend>(
    scanner: &mut Scanner<P>,
    path: &Path,
    chunk_size: usize,
) -> Result<ScanStats, ScanError> {
    if chunk_size == 0 || chunk_size > READ_CHUNK_MAX {
        return Err(ScanError::InvalidChunkSize { got: chunk_size, max: READ_CHUNK_MAX });
    }

    let file = File::open(path).map_err(ScanError::Open)?;
    let mut reader = BufReader::new(file);

    let mut chunk = vec![0u8; chunk_size];
    let mut total = ScanStats::default();
    loop {
        let n = reader.read(&mut chunk).map_err(ScanError::Read)?;
        if n == 0 {
            break;
        }
        let samples: Vec<i8> = chunk[..n].iter().map(|&b| b as i8).collect();
        let stats = scanner.work(&samples);
        total.input_consumed += stats.input_consumed;
        total.cells_completed += stats.cells_completed;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::CellReporter;
    use phy::reference::ScriptedPhyFrontend;
    use std::io::Write;

    #[test]
    fn test_missing_file_returns_open_error() {
        let phy = ScriptedPhyFrontend::new();
        let mut scanner = Scanner::new(phy, CellReporter::new(Box::new(std::io::sink())));
        let err = run_scan_from_file(&mut scanner, Path::new("/nonexistent/does-not-exist.iq"), 4096)
            .expect_err("missing file must error");
        assert!(matches!(err, ScanError::Open(_)));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let phy = ScriptedPhyFrontend::new();
        let mut scanner = Scanner::new(phy, CellReporter::new(Box::new(std::io::sink())));
        let err = run_scan_from_file(&mut scanner, Path::new("/dev/null"), 0).expect_err("zero chunk size must error");
        assert!(matches!(err, ScanError::InvalidChunkSize { got: 0, .. }));
    }

    #[test]
    fn test_reads_full_file_across_chunk_boundaries() {
        let mut tmp = std::env::temp_dir();
        tmp.push(format!("scanner_run_test_{}.iq", std::process::id()));
        {
            let mut f = std::fs::File::create(&tmp).unwrap();
            f.write_all(&vec![1u8; 10_000]).unwrap();
        }

        let phy = ScriptedPhyFrontend::new();
        let mut scanner = Scanner::new(phy, CellReporter::new(Box::new(std::io::sink())));
        let stats = run_scan_from_file(&mut scanner, &tmp, 4096).unwrap();

        assert_eq!(stats.input_consumed, 10_000);
        let _ = std::fs::remove_file(&tmp);
    }
}
