//! Format 2.x encoding: two-byte length prefixes, explicit flags and an
//! inline authentication tag.

use super::cursor::Cursor;
use super::{Flags, Header, Prefix};
use crate::error::{Error, FormatError, Result};

pub(super) fn encode(header: &Header) -> Result<Vec<u8>> {
    let mut out = encode_unsealed(header, header.tag.len())?;
    out.extend_from_slice(&header.tag);
    Ok(out)
}

/// Everything up to and including the tag length prefix.
///
/// These are exactly the bytes bound to the ciphertext as associated data.
pub(super) fn encode_unsealed(header: &Header, tag_len: usize) -> Result<Vec<u8>> {
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
    out.extend_from_slice(&header.flags.bits().to_le_bytes());
    out.extend_from_slice(&prefix_len("tag", tag_len)?.to_le_bytes());

    Ok(out)
}

pub(super) fn decode(prefix: Prefix, cursor: &mut Cursor<'_>) -> Result<Header> {
    let salt = cursor.prefixed_u16("salt")?.to_vec();
    let nonce = cursor.prefixed_u16("nonce")?.to_vec();
    let kdf_params = super::read_kdf_params(prefix.kdf, cursor)?;
    let original_size = cursor.u64("original size")?;
    let stored_size = cursor.u64("stored size")?;
    let timestamp = cursor.u64("timestamp")?;
    let filename = super::decode_filename(cursor.prefixed_u16("filename")?)?;
    let flags = Flags::from_wire(cursor.u16("flags")?)?;
    let tag = cursor.prefixed_u16("tag")?.to_vec();

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
        flags,
        tag,
    })
}

fn prefix_len(field: &'static str, len: usize) -> Result<u16> {
    u16::try_from(len).map_err(|_| Error::invalid_argument(format!("{field} is {len} bytes, format 2 allows at most {}", u16::MAX)))
}

fn put_prefixed(out: &mut Vec<u8>, field: &'static str, bytes: &[u8]) -> Result<()> {
    out.extend_from_slice(&prefix_len(field, bytes.len())?.to_le_bytes());
    out.extend_from_slice(bytes);
    Ok(())
}

impl Flags {
    pub(super) fn from_wire(bits: u16) -> Result<Self, FormatError> {
        let unknown = bits & !Self::KNOWN;
        if unknown == 0 { Ok(Self(bits)) } else { Err(FormatError::invalid("flags", format!("unknown bits {unknown:#06x}"))) }
    }
}
