//! # Password-Based Key Derivation
//!
//! Argon2 (v1.3) stretches a password and a random salt into a key of
//! exactly the length the chosen cipher needs. Two variants are supported:
//!
//! - **Argon2id**: the default. Data-independent first pass, data-dependent
//!   afterwards, resisting both side-channel and GPU attacks.
//! - **Argon2i**: fully data-independent memory access, kept for callers
//!   that specifically require it.
//!
//! ## Parameters
//!
//! The cost parameters are part of every container header as a fixed
//! 12-byte block (memory KiB, iterations, lanes, each a little-endian u32).
//! Decryption always uses the stored values, never the current defaults.

use argon2::{Argon2, Params, Version};
use secrecy::zeroize::Zeroizing;
use strum::{Display, EnumIter, EnumString};

use crate::config::{ARGON_MAX_MEMORY, ARGON_MAX_TIME, ARGON_MEMORY, ARGON_PARAMS_LEN, ARGON_THREADS, ARGON_TIME, SALT_SIZE};
use crate::error::{Error, Result};
use crate::secret::{Secret, SecretBytes};

/// Key-derivation functions a container can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Kdf {
    #[default]
    #[strum(serialize = "argon2id")]
    Argon2id,

    #[strum(serialize = "argon2i")]
    Argon2i,
}

impl Kdf {
    /// Width of this family's serialized parameter block.
    #[inline]
    #[must_use]
    pub const fn params_len(self) -> usize {
        ARGON_PARAMS_LEN
    }

    /// Salt length generated for new containers.
    #[inline]
    #[must_use]
    pub const fn salt_len(self) -> usize {
        SALT_SIZE
    }

    /// Every supported KDF is password-based and therefore needs a salt.
    #[inline]
    #[must_use]
    pub const fn requires_salt(self) -> bool {
        true
    }

    const fn variant(self) -> argon2::Algorithm {
        match self {
            Self::Argon2id => argon2::Algorithm::Argon2id,
            Self::Argon2i => argon2::Algorithm::Argon2i,
        }
    }

    /// Derives `len` bytes of key material.
    ///
    /// The intermediate buffer is zeroed if derivation fails part way.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] for an empty password or parameters
    ///   Argon2 refuses (salt too short, memory below 8 KiB per lane, ...)
    /// - [`Error::Primitive`] if the hash computation itself fails
    pub fn derive(self, password: &Secret, salt: &[u8], params: &KdfParams, len: usize) -> Result<SecretBytes> {
        if password.is_empty() {
            return Err(Error::invalid_argument("password cannot be empty"));
        }

        let argon_params = params.to_argon(len).map_err(Error::invalid_argument)?;
        let argon2 = Argon2::new(self.variant(), Version::V0x13, argon_params);

        let mut key = Zeroizing::new(vec![0u8; len]);
        argon2.hash_password_into(password.expose_secret().as_bytes(), salt, &mut key).map_err(|e| match e {
            argon2::Error::SaltTooShort | argon2::Error::SaltTooLong => Error::invalid_argument(format!("argon2 salt: {e}")),
            _ => Error::primitive("argon2", e),
        })?;

        Ok(SecretBytes::from_vec(std::mem::take(&mut *key)))
    }
}

/// Argon2 cost parameters as stored in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Number of lanes.
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::new(ARGON_MEMORY, ARGON_TIME, ARGON_THREADS)
    }
}

impl KdfParams {
    #[inline]
    #[must_use]
    pub const fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self { memory_kib, iterations, parallelism }
    }

    /// Checks the parameters against Argon2's limits and this crate's caps.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the parameters are unusable.
    pub fn check(&self) -> std::result::Result<(), String> {
        if self.memory_kib > ARGON_MAX_MEMORY {
            return Err(format!("memory cost {} KiB exceeds the {ARGON_MAX_MEMORY} KiB limit", self.memory_kib));
        }

        if self.iterations > ARGON_MAX_TIME {
            return Err(format!("time cost {} exceeds the limit of {ARGON_MAX_TIME}", self.iterations));
        }

        self.to_argon(crate::config::KEY_SIZE).map(|_| ())
    }

    fn to_argon(self, len: usize) -> std::result::Result<Params, String> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, Some(len)).map_err(|e| format!("argon2 parameters rejected: {e}"))
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; ARGON_PARAMS_LEN] {
        let mut out = [0u8; ARGON_PARAMS_LEN];
        out[0..4].copy_from_slice(&self.memory_kib.to_le_bytes());
        out[4..8].copy_from_slice(&self.iterations.to_le_bytes());
        out[8..12].copy_from_slice(&self.parallelism.to_le_bytes());
        out
    }

    #[must_use]
    pub fn from_bytes(bytes: &[u8; ARGON_PARAMS_LEN]) -> Self {
        let word = |i: usize| u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
        Self::new(word(0), word(4), word(8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const CHEAP: KdfParams = KdfParams::new(8, 1, 1);

    #[test]
    fn test_derive_is_deterministic() {
        let password = Secret::new("password");
        let salt = [1u8; 16];

        let a = Kdf::Argon2id.derive(&password, &salt, &CHEAP, 32).unwrap();
        let b = Kdf::Argon2id.derive(&password, &salt, &CHEAP, 32).unwrap();

        assert_eq!(a.len(), 32);
        assert_eq!(a.expose_secret(), b.expose_secret());
    }

    #[test]
    fn test_inputs_change_the_key() {
        let password = Secret::new("password");
        let base = Kdf::Argon2id.derive(&password, &[1u8; 16], &CHEAP, 32).unwrap();

        let other_salt = Kdf::Argon2id.derive(&password, &[2u8; 16], &CHEAP, 32).unwrap();
        let other_variant = Kdf::Argon2i.derive(&password, &[1u8; 16], &CHEAP, 32).unwrap();
        let other_params = Kdf::Argon2id.derive(&password, &[1u8; 16], &KdfParams::new(16, 1, 1), 32).unwrap();
        let other_password = Kdf::Argon2id.derive(&Secret::new("passwore"), &[1u8; 16], &CHEAP, 32).unwrap();

        for other in [other_salt, other_variant, other_params, other_password] {
            assert_ne!(base.expose_secret(), other.expose_secret());
        }
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let empty = Kdf::Argon2id.derive(&Secret::new(""), &[0u8; 16], &CHEAP, 32).unwrap_err();
        assert_eq!(empty.kind(), ErrorKind::InvalidArgument);

        let short_salt = Kdf::Argon2id.derive(&Secret::new("pw"), &[0u8; 4], &CHEAP, 32).unwrap_err();
        assert_eq!(short_salt.kind(), ErrorKind::InvalidArgument);

        let bad_params = Kdf::Argon2id.derive(&Secret::new("pw"), &[0u8; 16], &KdfParams::new(8, 0, 1), 32).unwrap_err();
        assert_eq!(bad_params.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_check_enforces_caps() {
        assert!(KdfParams::default().check().is_ok());
        assert!(CHEAP.check().is_ok());
        assert!(KdfParams::new(ARGON_MAX_MEMORY + 1, 1, 1).check().is_err());
        assert!(KdfParams::new(8, ARGON_MAX_TIME + 1, 1).check().is_err());
        assert!(KdfParams::new(8, 1, 0).check().is_err());
    }

    #[test]
    fn test_params_block_is_little_endian() {
        let params = KdfParams::new(0x0001_0000, 3, 4);
        let bytes = params.to_bytes();

        assert_eq!(bytes, [0x00, 0x00, 0x01, 0x00, 0x03, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00]);
        assert_eq!(KdfParams::from_bytes(&bytes), params);
    }
}
