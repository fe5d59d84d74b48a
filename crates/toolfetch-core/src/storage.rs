//! Destination file lifecycle.
//!
//! Content is streamed into a uniquely named hidden temp file in the
//! destination's directory; on success it is synced and atomically renamed
//! over the destination (replacing any earlier file), otherwise it is removed.
//! A previous file at the destination is never touched by a failed fetch.
//!
//! Temp names start with `.`, which sanitized job filenames never do, and are
//! created exclusively, so a temp file cannot alias any job's destination.

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Prefix of in-progress files in the target directory.
pub const TEMP_PREFIX: &str = ".toolfetch-";
/// Suffix of in-progress files in the target directory.
pub const TEMP_SUFFIX: &str = ".part";

/// True for names `TempFile` creates. Used to check a directory is clean.
pub fn is_temp_name(name: &str) -> bool {
    name.starts_with(TEMP_PREFIX) && name.ends_with(TEMP_SUFFIX)
}

/// Sequential writer for one destination. The temp file is removed when
/// dropped without `finalize`.
pub struct TempFile {
    writer: BufWriter<NamedTempFile>,
    final_path: PathBuf,
    written: u64,
}

impl TempFile {
    /// Create a fresh temp file next to `final_path`.
    pub fn create(final_path: &Path) -> io::Result<Self> {
        let dir = match final_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let file = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(dir)?;
        Ok(TempFile {
            writer: BufWriter::new(file),
            final_path: final_path.to_path_buf(),
            written: 0,
        })
    }

    pub fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.writer.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn temp_path(&self) -> &Path {
        self.writer.get_ref().path()
    }

    /// Flush, fsync and rename the temp file over the final path. Returns bytes written.
    pub fn finalize(self) -> io::Result<u64> {
        let file = self.writer.into_inner().map_err(|e| e.into_error())?;
        file.as_file().sync_all()?;
        file.persist(&self.final_path).map_err(|e| e.error)?;
        Ok(self.written)
    }
}
