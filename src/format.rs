//! Format negotiation: in-process enums to and from on-wire identifiers.
//!
//! The tables below are append-only. An identifier, once published, keeps
//! its meaning forever; new algorithms get new numbers. Id 0 is never given
//! to a cipher or a KDF so an all-zero header can never look valid.
//!
//! | kind        | id | value              |
//! |-------------|----|--------------------|
//! | algorithm   | 1  | AES-256-GCM        |
//! | algorithm   | 2  | ChaCha20-Poly1305  |
//! | algorithm   | 3  | XChaCha20-Poly1305 |
//! | kdf         | 1  | Argon2id           |
//! | kdf         | 2  | Argon2i            |
//! | compression | 0  | none               |
//! | compression | 1  | zstd               |

use crate::cipher::{Algorithm, Kdf};
use crate::compression::Compression;
use crate::error::FormatError;

/// Bidirectional mapping between a value and its one-byte wire identifier.
pub trait WireId: Sized + Copy {
    /// Name used in error messages ("algorithm", "kdf", ...).
    const KIND: &'static str;

    /// Total: every in-process value has exactly one identifier.
    fn to_wire(self) -> u8;

    fn lookup(id: u8) -> Option<Self>;

    /// # Errors
    ///
    /// Returns [`FormatError::UnrecognizedId`] for ids not in the table.
    fn from_wire(id: u8) -> Result<Self, FormatError> {
        Self::lookup(id).ok_or(FormatError::UnrecognizedId { kind: Self::KIND, id })
    }
}

impl WireId for Algorithm {
    const KIND: &'static str = "algorithm";

    fn to_wire(self) -> u8 {
        match self {
            Self::Aes256Gcm => 1,
            Self::ChaCha20Poly1305 => 2,
            Self::XChaCha20Poly1305 => 3,
        }
    }

    fn lookup(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::Aes256Gcm),
            2 => Some(Self::ChaCha20Poly1305),
            3 => Some(Self::XChaCha20Poly1305),
            _ => None,
        }
    }
}

impl WireId for Kdf {
    const KIND: &'static str = "kdf";

    fn to_wire(self) -> u8 {
        match self {
            Self::Argon2id => 1,
            Self::Argon2i => 2,
        }
    }

    fn lookup(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::Argon2id),
            2 => Some(Self::Argon2i),
            _ => None,
        }
    }
}

impl WireId for Compression {
    const KIND: &'static str = "compression";

    fn to_wire(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Zstd => 1,
        }
    }

    fn lookup(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::None),
            1 => Some(Self::Zstd),
            _ => None,
        }
    }
}
