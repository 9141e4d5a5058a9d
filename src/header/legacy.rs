//! Format 1.x encoding, read-only.
//!
//! Differences from the canonical encoding:
//!
//! - salt, nonce and filename carry a one-byte length (at most 255 bytes)
//! - there is no flags field; the compressed bit follows the compression id
//! - there is no inline tag; the AEAD tag trails the ciphertext instead and
//!   no associated data is bound
//!
//! New containers are never written in this encoding. [`encode`] exists so a
//! parsed legacy header re-serializes to the bytes it came from.

use super::cursor::Cursor;
use super::{Flags, Header, Prefix};
use crate::compression::Compression;
use crate::error::{Error, Result};

pub(super) fn encode(header: &Header) -> Result<Vec<u8>> {
    if !header.tag.is_empty() {
        return Err(Error::invalid_argument("format 1 headers carry no inline tag"));
    }

    if header.flags != implied_flags(header.compression) {
        return Err(Error::invalid_argument("format 1 cannot record flags other than the compression-implied bit"));
    }

    let filename = header.filename.as_deref().unwrap_or_default().as_bytes();
    let mut out = Vec::with_capacity(64 + header.salt.len() + header.nonce.len() + filename.len());

    super::write_prefix(&mut out, header);
    put_prefixed(&mut out, "salt", &header.salt)?;
    put_prefixed(&mut out, "nonce", &header.nonce)?;
    out.extend_from_slice(&header.kdf_params.to_bytes());
    out.extend_from_slice(&header.original_size.to_le_bytes());
    out.extend_from_slice(&header.stored_size.to_le_bytes());
    out.extend_from_slice(&header.timestamp.to_le_bytes());
    put_prefixed(&mut out, "filename", filename)?;

    Ok(out)
}

pub(super) fn decode(prefix: Prefix, cursor: &mut Cursor<'_>) -> Result<Header> {
    let salt = cursor.prefixed_u8("salt")?.to_vec();
    let nonce = cursor.prefixed_u8("nonce")?.to_vec();
    let kdf_params = super::read_kdf_params(prefix.kdf, cursor)?;
    let original_size = cursor.u64("original size")?;
    let stored_size = cursor.u64("stored size")?;
    let timestamp = cursor.u64("timestamp")?;
    let filename = super::decode_filename(cursor.prefixed_u8("filename")?)?;

    Ok(Header {
        version: prefix.version,
        algorithm: prefix.algorithm,
        kdf: prefix.kdf,
        compression: prefix.compression,
        salt,
        nonce,
        kdf_params,
        original_size,
        stored_size,
        timestamp,
        filename,
        flags: implied_flags(prefix.compression),
        tag: Vec::new(),
    })
}

fn implied_flags(compression: Compression) -> Flags {
    Flags::empty().with_compressed(compression != Compression::None)
}

fn put_prefixed(out: &mut Vec<u8>, field: &'static str, bytes: &[u8]) -> Result<()> {
    let len = u8::try_from(bytes.len()).map_err(|_| Error::invalid_argument(format!("{field} is {} bytes, format 1 allows at most {}", bytes.len(), u8::MAX)))?;
    out.push(len);
    out.extend_from_slice(bytes);
    Ok(())
}
