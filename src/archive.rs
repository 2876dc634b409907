//! Packaging rendered documents into a single zip archive.

use crate::error::ExportError;
use log::{debug, warn};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use zip::CompressionMethod;
use zip::result::ZipResult;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// One file inside the archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Writes `entries` to a new deflate-compressed zip at `path` and returns
/// the archive size in bytes. On failure the partially written file is
/// removed.
pub fn write_archive(path: &Path, entries: &[ArchiveEntry]) -> Result<u64, ExportError> {
    match write_entries(path, entries) {
        Ok(()) => {
            let size = fs::metadata(path)?.len();
            debug!("Wrote {} entries to {} ({} bytes)", entries.len(), path.display(), size);
            Ok(size)
        }
        Err(e) => {
            if path.exists()
                && let Err(remove_err) = fs::remove_file(path)
            {
                warn!("Could not remove partial archive {}: {}", path.display(), remove_err);
            }
            Err(ExportError::Archive(format!("{}: {}", path.display(), e)))
        }
    }
}

fn write_entries(path: &Path, entries: &[ArchiveEntry]) -> ZipResult<()> {
    let file = File::create(path)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for entry in entries {
        zip.start_file(entry.name.as_str(), options)?;
        zip.write_all(&entry.bytes)?;
    }
    let mut writer = zip.finish()?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn entry(name: &str, bytes: &[u8]) -> ArchiveEntry {
        ArchiveEntry {
            name: name.to_string(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn entries_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.zip");
        let size = write_archive(&path, &[entry("a.pdf", b"%PDF-a"), entry("b.pdf", b"%PDF-b")]).unwrap();
        assert!(size > 0);

        let mut archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
        let mut contents = String::new();
        archive.by_name("b.pdf").unwrap().read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "%PDF-b");
    }

    #[test]
    fn failed_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dup.zip");
        let err = write_archive(&path, &[entry("a.pdf", b"1"), entry("a.pdf", b"2")]).unwrap_err();
        assert!(matches!(err, ExportError::Archive(_)));
        assert!(!path.exists());
    }

    #[test]
    fn missing_directory_is_an_archive_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.zip");
        assert!(matches!(write_archive(&path, &[]), Err(ExportError::Archive(_))));
    }
}
