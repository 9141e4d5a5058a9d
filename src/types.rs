//! Small shared enums.
//!
//! - [`Mode`]: which direction a file is being processed in
//! - [`Phase`]: the pipeline stage reported to a progress sink

use std::fmt::{Display, Formatter, Result};

/// Direction of a file operation.
///
/// Drives output path generation and user-facing wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Produce a `.swb` container from a plain file.
    Encrypt,

    /// Recover the plain file from a container.
    Decrypt,
}

impl Mode {
    #[inline]
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Encrypt => "Encrypt",
            Self::Decrypt => "Decrypt",
        }
    }

    /// Past tense used in success messages ("encrypted", "decrypted").
    #[inline]
    #[must_use]
    pub fn past_tense(self) -> &'static str {
        match self {
            Self::Encrypt => "encrypted",
            Self::Decrypt => "decrypted",
        }
    }
}

impl Display for Mode {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.label())
    }
}

/// A stage of the encrypt or decrypt pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Checking,
    Reading,
    Compressing,
    Generating,
    Deriving,
    Encrypting,
    Assembling,
    Parsing,
    Decrypting,
    Decompressing,
    Verifying,
    Writing,
    Done,
}

impl Phase {
    /// Short human-readable label for progress displays.
    #[inline]
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Checking => "checking input",
            Self::Reading => "reading",
            Self::Compressing => "compressing",
            Self::Generating => "generating salt and nonce",
            Self::Deriving => "deriving key",
            Self::Encrypting => "encrypting",
            Self::Assembling => "assembling header",
            Self::Parsing => "parsing header",
            Self::Decrypting => "decrypting",
            Self::Decompressing => "decompressing",
            Self::Verifying => "verifying",
            Self::Writing => "writing",
            Self::Done => "done",
        }
    }
}

impl Display for Phase {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.label())
    }
}
