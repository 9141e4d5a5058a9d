//! ChaCha20-Poly1305 and XChaCha20-Poly1305 wrappers.
//!
//! Both share the ChaCha20 key schedule and the Poly1305 authenticator; they
//! differ only in nonce width. The 96-bit variant is the IETF construction
//! (RFC 8439). The extended 192-bit variant derives a subkey with HChaCha20,
//! which makes purely random nonces safe for any realistic number of files.

use chacha20poly1305::aead::KeyInit;
use chacha20poly1305::{ChaCha20Poly1305 as ChaChaCore, XChaCha20Poly1305 as XChaChaCore};

use crate::error::{Error, Result};

/// ChaCha20-Poly1305 with a 12-byte nonce.
pub struct ChaCha20 {
    inner: ChaChaCore,
}

impl ChaCha20 {
    const NAME: &'static str = "chacha20-poly1305";

    #[inline]
    pub fn new(key: &[u8]) -> Result<Self> {
        super::check_key(Self::NAME, key)?;
        let inner = ChaChaCore::new_from_slice(key).map_err(|e| Error::primitive(Self::NAME, e))?;
        Ok(Self { inner })
    }

    /// Encrypts in place, returning the 16-byte Poly1305 tag.
    #[inline]
    pub fn encrypt(&self, nonce: &[u8], aad: &[u8], buffer: &mut [u8]) -> Result<Vec<u8>> {
        super::seal_detached(&self.inner, Self::NAME, nonce, aad, buffer)
    }

    #[inline]
    pub fn decrypt(&self, nonce: &[u8], aad: &[u8], buffer: &mut [u8], tag: &[u8]) -> Result<()> {
        super::open_detached(&self.inner, Self::NAME, nonce, aad, buffer, tag)
    }
}

/// XChaCha20-Poly1305 with a 24-byte nonce.
pub struct XChaCha20 {
    inner: XChaChaCore,
}

impl XChaCha20 {
    const NAME: &'static str = "xchacha20-poly1305";

    #[inline]
    pub fn new(key: &[u8]) -> Result<Self> {
        super::check_key(Self::NAME, key)?;
        let inner = XChaChaCore::new_from_slice(key).map_err(|e| Error::primitive(Self::NAME, e))?;
        Ok(Self { inner })
    }

    #[inline]
    pub fn encrypt(&self, nonce: &[u8], aad: &[u8], buffer: &mut [u8]) -> Result<Vec<u8>> {
        super::seal_detached(&self.inner, Self::NAME, nonce, aad, buffer)
    }

    #[inline]
    pub fn decrypt(&self, nonce: &[u8], aad: &[u8], buffer: &mut [u8], tag: &[u8]) -> Result<()> {
        super::open_detached(&self.inner, Self::NAME, nonce, aad, buffer, tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CHACHA_NONCE_SIZE, KEY_SIZE, TAG_SIZE, XCHACHA_NONCE_SIZE};

    #[test]
    fn test_chacha_roundtrip() {
        let cipher = ChaCha20::new(&[3u8; KEY_SIZE]).unwrap();
        let nonce = [9u8; CHACHA_NONCE_SIZE];
        let mut buffer = b"Hello, ChaCha20!".to_vec();

        let tag = cipher.encrypt(&nonce, &[], &mut buffer).unwrap();
        assert_eq!(tag.len(), TAG_SIZE);

        cipher.decrypt(&nonce, &[], &mut buffer, &tag).unwrap();
        assert_eq!(buffer, b"Hello, ChaCha20!");
    }

    #[test]
    fn test_variants_are_not_interchangeable() {
        let key = [5u8; KEY_SIZE];
        let chacha = ChaCha20::new(&key).unwrap();
        let xchacha = XChaCha20::new(&key).unwrap();

        assert!(xchacha.encrypt(&[0u8; CHACHA_NONCE_SIZE], &[], &mut []).is_err());
        assert!(chacha.encrypt(&[0u8; XCHACHA_NONCE_SIZE], &[], &mut []).is_err());
    }

    #[test]
    fn test_xchacha_rejects_tampered_tag() {
        let cipher = XChaCha20::new(&[0u8; KEY_SIZE]).unwrap();
        let nonce = [4u8; XCHACHA_NONCE_SIZE];
        let mut buffer = b"Secret Message".to_vec();

        let mut tag = cipher.encrypt(&nonce, b"aad", &mut buffer).unwrap();
        tag[0] ^= 0x01;

        assert!(matches!(cipher.decrypt(&nonce, b"aad", &mut buffer, &tag), Err(Error::AuthenticationFailed)));
    }

    #[test]
    fn test_short_tag_fails_authentication() {
        let cipher = ChaCha20::new(&[0u8; KEY_SIZE]).unwrap();
        let nonce = [0u8; CHACHA_NONCE_SIZE];
        let mut buffer = vec![1, 2, 3];
        let tag = cipher.encrypt(&nonce, &[], &mut buffer).unwrap();

        assert!(matches!(cipher.decrypt(&nonce, &[], &mut buffer, &tag[..8]), Err(Error::AuthenticationFailed)));
    }
}
