use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

/// Open a file for buffered reading
pub fn open_input(path: impl AsRef<Path>) -> io::Result<BufReader<File>> {
    Ok(BufReader::new(File::open(path)?))
}

/// Output file that only appears at its destination once committed.
/// Bytes go to a fresh temp file beside the destination; it is deleted
/// on every path that does not end in a successful `commit`.
pub struct ScopedOutput {
    dest: PathBuf,
    overwrite: bool,
    writer: BufWriter<NamedTempFile>,
}

impl ScopedOutput {
    pub fn create(dest: impl Into<PathBuf>, overwrite: bool) -> io::Result<Self> {
        let dest = dest.into();
        if dest.exists() && !overwrite {
            return Err(already_exists(&dest));
        }

        let dir = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(dir)?;
        debug!("Writing {:?} through {:?}", dest, temp.path());

        Ok(Self {
            dest,
            overwrite,
            writer: BufWriter::new(temp),
        })
    }

    pub fn writer(&mut self) -> &mut BufWriter<NamedTempFile> {
        &mut self.writer
    }

    /// Flush, sync and move the file into place
    pub fn commit(self) -> io::Result<PathBuf> {
        let temp = self.writer.into_inner().map_err(|e| e.into_error())?;
        temp.as_file().sync_all()?;

        let persisted = if self.overwrite {
            temp.persist(&self.dest)
        } else {
            temp.persist_noclobber(&self.dest)
        };
        persisted.map_err(|e| {
            if e.error.kind() == io::ErrorKind::AlreadyExists {
                already_exists(&self.dest)
            } else {
                e.error
            }
        })?;

        debug!("Committed {:?}", self.dest);
        Ok(self.dest)
    }
}

fn already_exists(dest: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("{} already exists", dest.display()),
    )
}
