//! # Primitive Capabilities
//!
//! Closed set of the authenticated ciphers and key-derivation functions a
//! container may name. Each variant knows its own key, nonce and tag sizes so
//! the pipeline can size generated material without hard-coding anything.
//!
//! ## Layout
//!
//! - [`Algorithm`] selects an AEAD and hands out a keyed [`Cipher`]
//! - [`AesGcm`], [`ChaCha20`] and [`XChaCha20`] are thin wrappers over the
//!   RustCrypto implementations, all in detached-tag mode
//! - [`Kdf`] and [`KdfParams`] (in `derive`) turn a password into a key
//! - [`random_bytes`] draws salts and nonces from a caller-supplied CSPRNG
//!
//! Decryption fails closed: when tag verification fails the working buffer
//! is wiped before the error is returned, so no partial plaintext escapes.

use ::aes_gcm::aead::generic_array::typenum::Unsigned;
use ::aes_gcm::aead::{AeadInPlace, Nonce, Tag};
use rand::rand_core::TryCryptoRng;
use secrecy::zeroize::Zeroize;
use strum::{Display, EnumIter, EnumString};

mod aes_gcm;
mod chacha20poly1305;
mod derive;

pub use self::aes_gcm::AesGcm;
pub use self::chacha20poly1305::{ChaCha20, XChaCha20};
pub use self::derive::{Kdf, KdfParams};
use crate::config::{AES_NONCE_SIZE, CHACHA_NONCE_SIZE, KEY_SIZE, TAG_SIZE, XCHACHA_NONCE_SIZE};
use crate::error::{Error, Result};
use crate::secret::SecretBytes;

/// Authenticated encryption algorithms a container can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Algorithm {
    /// AES-256 in Galois/Counter Mode. Hardware accelerated on most CPUs.
    #[default]
    #[strum(serialize = "aes-256-gcm")]
    Aes256Gcm,

    /// ChaCha20-Poly1305 (RFC 8439) with a 96-bit nonce.
    #[strum(serialize = "chacha20-poly1305")]
    ChaCha20Poly1305,

    /// XChaCha20-Poly1305 with a 192-bit nonce.
    #[strum(serialize = "xchacha20-poly1305")]
    XChaCha20Poly1305,
}

impl Algorithm {
    #[inline]
    #[must_use]
    pub const fn key_len(self) -> usize {
        KEY_SIZE
    }

    #[inline]
    #[must_use]
    pub const fn nonce_len(self) -> usize {
        match self {
            Self::Aes256Gcm => AES_NONCE_SIZE,
            Self::ChaCha20Poly1305 => CHACHA_NONCE_SIZE,
            Self::XChaCha20Poly1305 => XCHACHA_NONCE_SIZE,
        }
    }

    #[inline]
    #[must_use]
    pub const fn tag_len(self) -> usize {
        TAG_SIZE
    }

    /// Instantiates the cipher under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the key is not [`Self::key_len`] bytes.
    pub fn cipher(self, key: &SecretBytes) -> Result<Cipher> {
        let key = key.expose_secret();
        Ok(match self {
            Self::Aes256Gcm => Cipher::Aes(AesGcm::new(key)?),
            Self::ChaCha20Poly1305 => Cipher::ChaCha(ChaCha20::new(key)?),
            Self::XChaCha20Poly1305 => Cipher::XChaCha(XChaCha20::new(key)?),
        })
    }
}

/// A keyed AEAD instance.
pub enum Cipher {
    Aes(AesGcm),
    ChaCha(ChaCha20),
    XChaCha(XChaCha20),
}

impl std::fmt::Debug for Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Aes(_) => "Aes",
            Self::ChaCha(_) => "ChaCha",
            Self::XChaCha(_) => "XChaCha",
        };
        write!(f, "Cipher::{name}([... key ...])")
    }
}

impl Cipher {
    /// Encrypts `buffer` in place and returns the detached tag.
    pub fn seal(&self, nonce: &[u8], aad: &[u8], buffer: &mut [u8]) -> Result<Vec<u8>> {
        match self {
            Self::Aes(cipher) => cipher.encrypt(nonce, aad, buffer),
            Self::ChaCha(cipher) => cipher.encrypt(nonce, aad, buffer),
            Self::XChaCha(cipher) => cipher.encrypt(nonce, aad, buffer),
        }
    }

    /// Verifies `tag` and decrypts `buffer`, returning the plaintext.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthenticationFailed`] on any verification failure.
    /// The buffer is zeroed before it is dropped in that case.
    pub fn open(&self, nonce: &[u8], aad: &[u8], mut buffer: Vec<u8>, tag: &[u8]) -> Result<Vec<u8>> {
        let result = match self {
            Self::Aes(cipher) => cipher.decrypt(nonce, aad, &mut buffer, tag),
            Self::ChaCha(cipher) => cipher.decrypt(nonce, aad, &mut buffer, tag),
            Self::XChaCha(cipher) => cipher.decrypt(nonce, aad, &mut buffer, tag),
        };

        match result {
            Ok(()) => Ok(buffer),
            Err(err) => {
                buffer.zeroize();
                Err(err)
            }
        }
    }
}

/// Fills a fresh buffer of `len` bytes from `rng`.
///
/// # Errors
///
/// Returns [`Error::Primitive`] if the random source reports a failure.
pub fn random_bytes<R: TryCryptoRng + ?Sized>(rng: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut bytes = vec![0u8; len];
    rng.try_fill_bytes(&mut bytes).map_err(|e| Error::primitive("rng", e))?;
    Ok(bytes)
}

fn seal_detached<C: AeadInPlace>(cipher: &C, name: &'static str, nonce: &[u8], aad: &[u8], buffer: &mut [u8]) -> Result<Vec<u8>> {
    check_nonce::<C>(name, nonce)?;
    let tag = cipher.encrypt_in_place_detached(Nonce::<C>::from_slice(nonce), aad, buffer).map_err(|e| Error::primitive(name, e))?;
    Ok(tag.to_vec())
}

fn open_detached<C: AeadInPlace>(cipher: &C, name: &'static str, nonce: &[u8], aad: &[u8], buffer: &mut [u8], tag: &[u8]) -> Result<()> {
    check_nonce::<C>(name, nonce)?;
    if tag.len() != C::TagSize::USIZE {
        return Err(Error::AuthenticationFailed);
    }

    cipher.decrypt_in_place_detached(Nonce::<C>::from_slice(nonce), aad, buffer, Tag::<C>::from_slice(tag)).map_err(|_| Error::AuthenticationFailed)
}

fn check_nonce<C: AeadInPlace>(name: &'static str, nonce: &[u8]) -> Result<()> {
    if nonce.len() == C::NonceSize::USIZE {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!("{name} nonce must be {} bytes, got {}", C::NonceSize::USIZE, nonce.len())))
    }
}

fn check_key(name: &'static str, key: &[u8]) -> Result<()> {
    if key.len() == KEY_SIZE { Ok(()) } else { Err(Error::invalid_argument(format!("{name} key must be {KEY_SIZE} bytes, got {}", key.len()))) }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use strum::IntoEnumIterator;

    use super::*;
    use crate::error::ErrorKind;

    fn key() -> SecretBytes {
        SecretBytes::from_vec((0..32).collect())
    }

    #[test]
    fn test_every_algorithm_roundtrips_with_aad() {
        for algorithm in Algorithm::iter() {
            let cipher = algorithm.cipher(&key()).unwrap();
            let nonce = vec![7u8; algorithm.nonce_len()];
            let mut buffer = b"attack at dawn".to_vec();

            let tag = cipher.seal(&nonce, b"header", &mut buffer).unwrap();
            assert_eq!(tag.len(), algorithm.tag_len());
            assert_ne!(&buffer[..], b"attack at dawn");

            let plaintext = cipher.open(&nonce, b"header", buffer, &tag).unwrap();
            assert_eq!(plaintext, b"attack at dawn", "{algorithm}");
        }
    }

    #[test]
    fn test_empty_plaintext_still_produces_tag() {
        for algorithm in Algorithm::iter() {
            let cipher = algorithm.cipher(&key()).unwrap();
            let nonce = vec![0u8; algorithm.nonce_len()];
            let mut buffer = Vec::new();

            let tag = cipher.seal(&nonce, &[], &mut buffer).unwrap();
            assert_eq!(tag.len(), 16);
            assert!(cipher.open(&nonce, &[], buffer, &tag).unwrap().is_empty());
        }
    }

    #[test]
    fn test_tampering_fails_authentication() {
        let cipher = Algorithm::Aes256Gcm.cipher(&key()).unwrap();
        let nonce = [1u8; AES_NONCE_SIZE];
        let mut buffer = b"Secret Message".to_vec();
        let tag = cipher.seal(&nonce, b"aad", &mut buffer).unwrap();

        let mut flipped = buffer.clone();
        flipped[0] ^= 0x01;
        assert!(matches!(cipher.open(&nonce, b"aad", flipped, &tag), Err(Error::AuthenticationFailed)));

        let mut bad_tag = tag.clone();
        bad_tag[15] ^= 0x80;
        assert!(matches!(cipher.open(&nonce, b"aad", buffer.clone(), &bad_tag), Err(Error::AuthenticationFailed)));

        assert!(matches!(cipher.open(&nonce, b"other", buffer, &tag), Err(Error::AuthenticationFailed)));
    }

    #[test]
    fn test_wrong_sizes_are_rejected() {
        let short_key = SecretBytes::from_vec(vec![0u8; 16]);
        assert_eq!(Algorithm::ChaCha20Poly1305.cipher(&short_key).unwrap_err().kind(), ErrorKind::InvalidArgument);

        let cipher = Algorithm::XChaCha20Poly1305.cipher(&key()).unwrap();
        let err = cipher.seal(&[0u8; 12], &[], &mut [0u8; 4]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_cipher_debug_hides_key() {
        let rendered = format!("{:?}", Algorithm::ChaCha20Poly1305.cipher(&key()).unwrap());
        assert_eq!(rendered, "Cipher::ChaCha([... key ...])");

        let err = Algorithm::Aes256Gcm.cipher(&SecretBytes::from_vec(vec![1u8; 31])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_nonce_sizes_match_algorithms() {
        assert_eq!(Algorithm::Aes256Gcm.nonce_len(), 12);
        assert_eq!(Algorithm::ChaCha20Poly1305.nonce_len(), 12);
        assert_eq!(Algorithm::XChaCha20Poly1305.nonce_len(), 24);
    }

    #[test]
    fn test_algorithm_names_parse() {
        assert_eq!("aes-256-gcm".parse::<Algorithm>().unwrap(), Algorithm::Aes256Gcm);
        assert_eq!("XChaCha20-Poly1305".parse::<Algorithm>().unwrap(), Algorithm::XChaCha20Poly1305);
        assert!("des".parse::<Algorithm>().is_err());
        assert_eq!(Algorithm::ChaCha20Poly1305.to_string(), "chacha20-poly1305");
    }

    #[test]
    fn test_random_bytes_follow_rng() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);

        let first = random_bytes(&mut a, 32).unwrap();
        assert_eq!(first, random_bytes(&mut b, 32).unwrap());
        assert_ne!(first, random_bytes(&mut a, 32).unwrap());
        assert!(random_bytes(&mut a, 0).unwrap().is_empty());
    }
}
