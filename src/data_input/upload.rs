// src/data_input/upload.rs
//
// Uploaded content (stdin or an in-memory buffer) is staged in a temporary
// `.csv` file for the duration of parsing. The file is removed when the
// handle drops, whichever way parsing ends.

use log::{debug, warn};
use std::io::{self, Read, Write};
use tempfile::NamedTempFile;

use crate::data_input::accel_data::AccelSamples;
use crate::data_input::csv_loader::{load_with_layout, ColumnLayout};
use crate::error::{Result, ResultExt};

/// Copies `upload` into a temporary CSV file and loads it with the given layout.
pub fn load_uploaded<R: Read>(mut upload: R, layout: ColumnLayout) -> Result<AccelSamples> {
    let staged = stage_upload(&mut upload)?;
    debug!("Staged upload at {}", staged.path().display());
    let result = load_with_layout(staged.path(), layout);
    if let Err(e) = staged.close() {
        warn!("Failed to remove staged upload: {}", e);
    }
    result
}

fn stage_upload<R: Read>(upload: &mut R) -> Result<NamedTempFile> {
    let mut staged = tempfile::Builder::new()
        .prefix("accel_upload_")
        .suffix(".csv")
        .tempfile()
        .context("Creating temporary upload file")?;
    let bytes = io::copy(upload, &mut staged).context("Writing temporary upload file")?;
    staged.flush().context("Flushing temporary upload file")?;
    debug!("Copied {} uploaded bytes", bytes);
    Ok(staged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    #[test]
    fn test_upload_parses_like_a_file() {
        let content = "t,ax,ay,az\n0,1,2,3\n1,4,5,6\n";
        let samples = load_uploaded(content.as_bytes(), ColumnLayout::Inferred).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples.z, vec![3.0, 6.0]);
    }

    #[test]
    fn test_upload_errors_are_returned() {
        let err = load_uploaded("a,b,c\n1,2,3\n".as_bytes(), ColumnLayout::Inferred).unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedFormat { columns: 3 }));
    }

    #[test]
    fn test_staged_file_is_removed() {
        let mut source = "t,ax,ay,az\n0,1,2,3\n".as_bytes();
        let staged = stage_upload(&mut source).unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("csv"));
        drop(staged);
        assert!(!path.exists());
    }
}
