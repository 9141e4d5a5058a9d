//! Error taxonomy shared by every stage of the container pipeline.
//!
//! Each failure surfaces as exactly one [`Error`] variant. Callers that only
//! care about the category (for example to pick a process exit code) use
//! [`Error::kind`].

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Which way bytes were flowing when an I/O error happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Read => "reading",
            Self::Write => "writing",
        })
    }
}

/// Coarse error category, stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Io,
    InvalidFormat,
    UnsupportedVersion,
    AuthenticationFailed,
    IntegrityMismatch,
    InvalidArgument,
    Primitive,
}

impl ErrorKind {
    /// Process exit code used by the command line front-end.
    #[inline]
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::NotFound => 2,
            Self::Io => 3,
            Self::InvalidFormat => 4,
            Self::UnsupportedVersion => 5,
            Self::AuthenticationFailed => 6,
            Self::IntegrityMismatch => 7,
            Self::InvalidArgument => 8,
            Self::Primitive => 9,
        }
    }
}

/// Reasons a container header or payload could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("bad magic bytes {found:02x?}")]
    BadMagic { found: [u8; 4] },

    #[error("truncated {field}: need {needed} bytes, {available} available")]
    Truncated { field: &'static str, needed: usize, available: usize },

    #[error("unrecognized {kind} identifier {id}")]
    UnrecognizedId { kind: &'static str, id: u8 },

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("payload is {actual} bytes but the header declares {expected}")]
    PayloadLength { expected: u64, actual: u64 },
}

impl FormatError {
    /// True when the input simply ended too early.
    #[inline]
    #[must_use]
    pub const fn is_truncation(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField { field, reason: reason.into() }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("input not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("i/o failure while {direction} {}", path.display())]
    Io {
        path: PathBuf,
        direction: Direction,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid container format: {0}")]
    InvalidFormat(#[from] FormatError),

    #[error("unsupported format version {major}.{minor} (this build reads up to {supported}.x)")]
    UnsupportedVersion { major: u8, minor: u8, supported: u8 },

    /// Deliberately says nothing about whether the password or the data was at fault.
    #[error("authentication failed: wrong password or corrupted file")]
    AuthenticationFailed,

    #[error("integrity check failed: header records {expected} bytes but {actual} were recovered")]
    IntegrityMismatch { expected: u64, actual: u64 },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{primitive} failure: {message}")]
    Primitive { primitive: &'static str, message: String },
}

impl Error {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Io { .. } => ErrorKind::Io,
            Self::InvalidFormat(_) => ErrorKind::InvalidFormat,
            Self::UnsupportedVersion { .. } => ErrorKind::UnsupportedVersion,
            Self::AuthenticationFailed => ErrorKind::AuthenticationFailed,
            Self::IntegrityMismatch { .. } => ErrorKind::IntegrityMismatch,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Primitive { .. } => ErrorKind::Primitive,
        }
    }

    pub(crate) fn io(path: &Path, direction: Direction, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), direction, source }
    }

    pub(crate) fn primitive(primitive: &'static str, message: impl Display) -> Self {
        Self::Primitive { primitive, message: message.to_string() }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
