//! Output file handling.
//!
//! [`OutputFile`] creates (or truncates) the destination and buffers writes
//! into it, counting the bytes that pass through.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::RenderError;

/// A buffered, freshly truncated output file.
#[derive(Debug)]
pub struct OutputFile {
    path: PathBuf,
    writer: BufWriter<File>,
    written: u64,
}

impl OutputFile {
    /// Creates the file at `path`, truncating it if it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::OutputCreate`] if the file cannot be created
    /// (missing parent directory, permissions, path is a directory, ...).
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| RenderError::OutputCreate {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "created output file");
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes accepted so far. Some of them may still be buffered.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Flushes buffered bytes to disk and returns the total written.
    pub fn finish(mut self) -> Result<u64, RenderError> {
        self.writer
            .flush()
            .map_err(|source| RenderError::OutputFlush {
                path: self.path.clone(),
                source,
            })?;
        Ok(self.written)
    }
}

impl Write for OutputFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.writer.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
