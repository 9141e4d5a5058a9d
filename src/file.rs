//! File Operations
//!
//! Path handling and whole-file I/O for the pipeline.
//!
//! ## Output Discipline
//!
//! Outputs are never written in place. [`File::write_atomic`] writes to a
//! temporary file in the destination directory, syncs it, and renames it
//! over the target. A failure at any point removes the temporary, so the
//! target path holds either the complete new file or whatever was there
//! before, never a truncated container.
//!
//! ## Output Naming
//!
//! - encrypt: `report.pdf` → `report.pdf.swb`
//! - decrypt: `report.pdf.swb` → `report.pdf`
//! - decrypt without the extension: the name stored in the header, reduced
//!   to a bare basename and placed next to the input; otherwise `.out` is
//!   appended

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::{FALLBACK_EXTENSION, FILE_EXTENSION};
use crate::error::{Direction, Error, Result};
use crate::types::Mode;

/// A path the pipeline reads from or writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    path: PathBuf,
}

impl File {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Whether the name carries the container extension.
    ///
    /// Only a naming hint. Whether the bytes really are a container is
    /// decided by header parsing.
    #[inline]
    pub fn is_encrypted(&self) -> bool {
        self.path.as_os_str().to_string_lossy().ends_with(FILE_EXTENSION)
    }

    /// The final path component, if it is valid UTF-8.
    pub fn file_name(&self) -> Option<String> {
        self.path.file_name().and_then(|n| n.to_str()).map(str::to_owned)
    }

    /// Size on disk in bytes.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the file is missing, [`Error::Io`] otherwise.
    pub fn size(&self) -> Result<u64> {
        fs::metadata(&self.path).map(|m| m.len()).map_err(|e| self.read_error(e))
    }

    /// Confirms the path names an existing regular file.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if nothing exists at the path
    /// - [`Error::InvalidArgument`] if it is a directory
    /// - [`Error::Io`] if metadata cannot be read
    pub fn validate(&self) -> Result<()> {
        let meta = fs::metadata(&self.path).map_err(|e| self.read_error(e))?;
        if meta.is_dir() {
            return Err(Error::invalid_argument(format!("{} is a directory", self.path.display())));
        }

        Ok(())
    }

    /// Reads the entire file into memory.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the file is missing, [`Error::Io`] otherwise.
    pub fn read_all(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(|e| self.read_error(e))
    }

    /// Replaces the file's contents all at once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] with [`Direction::Write`]. The target is left
    /// untouched and the temporary file is removed.
    pub fn write_atomic(&self, data: &[u8]) -> Result<()> {
        let parent = self.path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
        let write_error = |e| Error::io(&self.path, Direction::Write, e);

        let mut temp = NamedTempFile::new_in(parent).map_err(write_error)?;
        temp.write_all(data).map_err(write_error)?;
        temp.as_file().sync_all().map_err(write_error)?;
        temp.persist(&self.path).map_err(|e| write_error(e.error))?;

        Ok(())
    }

    /// Default output location for `mode`.
    ///
    /// `stored_name` is the filename recorded in a container header and is
    /// only consulted when decrypting a file without the container extension.
    pub fn output_path(&self, mode: Mode, stored_name: Option<&str>) -> PathBuf {
        match mode {
            Mode::Encrypt => self.with_suffix(FILE_EXTENSION),
            Mode::Decrypt => {
                let stripped = self.path.file_name().and_then(|n| n.to_str()).and_then(|n| n.strip_suffix(FILE_EXTENSION)).filter(|stem| !stem.is_empty());
                if let Some(stem) = stripped {
                    return self.path.with_file_name(stem);
                }

                stored_name
                    .and_then(sanitize_filename)
                    .map(|name| self.path.with_file_name(name))
                    .filter(|candidate| *candidate != self.path)
                    .unwrap_or_else(|| self.with_suffix(FALLBACK_EXTENSION))
            }
        }
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(suffix);
        PathBuf::from(name)
    }

    fn read_error(&self, err: std::io::Error) -> Error {
        if err.kind() == ErrorKind::NotFound { Error::NotFound { path: self.path.clone() } } else { Error::io(&self.path, Direction::Read, err) }
    }
}

/// Reduces an untrusted stored filename to a bare basename.
///
/// Returns `None` when nothing safe is left.
pub fn sanitize_filename(name: &str) -> Option<&str> {
    let base = Path::new(name).file_name()?.to_str()?;
    if base.contains(['\\', '\0']) { None } else { Some(base) }
}
