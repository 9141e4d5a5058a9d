//! SweetBox - a small, self-describing, password-based file container.
//!
//! A container is a binary header followed by the ciphertext:
//! - AES-256-GCM, ChaCha20-Poly1305 or XChaCha20-Poly1305 for authenticated encryption
//! - Argon2id or Argon2i for key derivation
//! - Optional Zstandard compression before encryption
//! - The whole header bound to the ciphertext as associated data
//!
//! Everything needed to decrypt, apart from the password, is recorded in the
//! header, so files stay readable when the defaults change.

pub mod cipher;
pub mod compression;
pub mod config;
pub mod error;
pub mod file;
pub mod format;
pub mod header;
pub mod processor;
pub mod progress;
pub mod secret;
pub mod types;

pub use crate::cipher::{Algorithm, Kdf, KdfParams};
pub use crate::compression::Compression;
pub use crate::error::{Error, ErrorKind, FormatError, Result};
pub use crate::file::File;
pub use crate::header::{Header, HeaderBuilder, HeaderDraft, Version};
pub use crate::processor::{Inspection, Options, Processor};
pub use crate::progress::ProgressSink;
pub use crate::secret::Secret;
pub use crate::types::{Mode, Phase};
