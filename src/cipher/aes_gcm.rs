use aes_gcm::Aes256Gcm;
use aes_gcm::aead::KeyInit;

use crate::error::{Error, Result};

const NAME: &str = "aes-256-gcm";

pub struct AesGcm {
    inner: Aes256Gcm,
}

impl AesGcm {
    #[inline]
    pub fn new(key: &[u8]) -> Result<Self> {
        super::check_key(NAME, key)?;
        let inner = Aes256Gcm::new_from_slice(key).map_err(|e| Error::primitive(NAME, e))?;
        Ok(Self { inner })
    }

    #[inline]
    pub fn encrypt(&self, nonce: &[u8], aad: &[u8], buffer: &mut [u8]) -> Result<Vec<u8>> {
        super::seal_detached(&self.inner, NAME, nonce, aad, buffer)
    }

    #[inline]
    pub fn decrypt(&self, nonce: &[u8], aad: &[u8], buffer: &mut [u8], tag: &[u8]) -> Result<()> {
        super::open_detached(&self.inner, NAME, nonce, aad, buffer, tag)
    }
}
