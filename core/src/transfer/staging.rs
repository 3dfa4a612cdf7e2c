//! transfer/staging.rs
//! Receive into a hidden temp file, rename into place only on success.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::constants::PARTIAL_PREFIX;
use crate::utils::random_hex;

/// A file being written under `.partial-<hex>-<name>`.
///
/// Dropping it without [`StagedFile::commit`] deletes it, so a failed
/// transfer never leaves anything under a final name.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    committed: bool,
}

impl StagedFile {
    pub fn create(dir: &Path, name: &str) -> io::Result<Self> {
        let path = dir.join(format!("{}{}-{}", PARTIAL_PREFIX, random_hex(8), name));
        let file = OpenOptions::new().write(true).create_new(true).open(&path)?;
        debug!("staging {}", path.display());
        Ok(Self { path, writer: Some(BufWriter::new(file)), committed: false })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush, fsync and close the handle. Further writes fail.
    pub fn finish(&mut self) -> io::Result<()> {
        if let Some(writer) = self.writer.take() {
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        Ok(())
    }

    /// Move the staged file to `final_path`. An existing file there is replaced.
    pub fn commit(mut self, final_path: &Path) -> io::Result<PathBuf> {
        self.finish()?;
        fs::rename(&self.path, final_path)?;
        self.committed = true;
        Ok(final_path.to_path_buf())
    }
}

impl Write for StagedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.writer.as_mut() {
            Some(w) => w.write(buf),
            None => Err(io::Error::new(io::ErrorKind::Other, "staged file already finished")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        // Close before unlinking.
        self.writer.take();
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("discarded {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => debug!("could not discard {}: {}", self.path.display(), e),
        }
    }
}
