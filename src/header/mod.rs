//! # Container Header
//!
//! The self-describing metadata record at the start of every container.
//! A container is `[header][ciphertext]` with no separator; the header's own
//! length prefixes are the only way to find where the ciphertext starts.
//!
//! ## Canonical layout (format 2.0, little-endian)
//!
//! ```text
//! off  size  field
//! 0    4     magic "SWBX"
//! 4    1     version major (2)
//! 5    1     version minor (0)
//! 6    1     algorithm id
//! 7    1     kdf id
//! 8    1     compression id
//! 9    3     reserved, zero
//! 12   2+S   salt (u16 length + bytes)
//! ..   2+N   nonce (u16 length + bytes)
//! ..   12    kdf parameters (memory KiB, iterations, lanes as u32)
//! ..   8     original size
//! ..   8     stored size
//! ..   8     timestamp (unix seconds)
//! ..   2+F   filename (u16 length + UTF-8, 0 = none)
//! ..   2     flags (bit 0: compressed)
//! ..   2+T   tag (u16 length + bytes)
//! ```
//!
//! Every byte before the tag bytes is authenticated as associated data, so
//! editing any header field is detected exactly like editing the ciphertext.
//!
//! Format 1.x headers (one-byte prefixes, no flags, trailing tag) are
//! accepted by [`Header::from_bytes`] through a separate legacy decoder.
//! Which decoder runs depends only on the major version byte.
//!
//! ## Construction
//!
//! Headers are immutable. New ones go through [`HeaderBuilder`], which
//! refuses to produce anything until salt, nonce and sizes are supplied, and
//! then through [`HeaderDraft::seal`], which attaches the tag. There is no
//! way to serialize a header that was never sealed.

use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::cipher::{Algorithm, Kdf, KdfParams};
use crate::compression::Compression;
use crate::config::{ARGON_PARAMS_LEN, FIXED_PREFIX_LEN, FLAG_COMPRESSED, FORMAT_MAJOR, FORMAT_MINOR, KNOWN_FLAGS, LEGACY_MAJOR, MAGIC, MIN_SALT_SIZE, RESERVED_LEN};
use crate::error::{Error, FormatError, Result};
use crate::format::WireId;

mod canonical;
mod cursor;
mod legacy;

use self::cursor::Cursor;

/// Format revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

impl Version {
    /// The version every new container is written with.
    pub const CURRENT: Self = Self { major: FORMAT_MAJOR, minor: FORMAT_MINOR };

    #[inline]
    #[must_use]
    pub const fn is_legacy(self) -> bool {
        self.major == LEGACY_MAJOR
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Header flag bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags(u16);

impl Flags {
    const KNOWN: u16 = KNOWN_FLAGS;

    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[inline]
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Whether the payload must be decompressed after decryption.
    #[inline]
    #[must_use]
    pub const fn compressed(self) -> bool {
        self.0 & FLAG_COMPRESSED != 0
    }

    #[inline]
    #[must_use]
    pub const fn with_compressed(self, on: bool) -> Self {
        if on { Self(self.0 | FLAG_COMPRESSED) } else { Self(self.0 & !FLAG_COMPRESSED) }
    }
}

/// Parsed container metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    version: Version,
    algorithm: Algorithm,
    kdf: Kdf,
    compression: Compression,
    salt: Vec<u8>,
    nonce: Vec<u8>,
    kdf_params: KdfParams,
    original_size: u64,
    stored_size: u64,
    timestamp: u64,
    filename: Option<String>,
    flags: Flags,
    tag: Vec<u8>,
}

impl Header {
    /// Serializes the header in the encoding its version calls for.
    ///
    /// Deterministic: the same header always yields the same bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if a length-prefixed field does not
    /// fit its prefix. Nothing is ever truncated.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if self.version.is_legacy() { legacy::encode(self) } else { canonical::encode(self) }
    }

    /// Parses a header from the start of `bytes`.
    ///
    /// Returns the header and the exact number of bytes it occupied; the
    /// ciphertext begins at that offset. Checks run in order: fixed prefix
    /// present, magic, version, identifiers, then each variable field.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidFormat`] for short input, bad magic, unknown
    ///   identifiers, unknown flag bits or a non-UTF-8 filename
    /// - [`Error::UnsupportedVersion`] for any major version other than 1 or 2
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, usize)> {
        let mut cursor = Cursor::new(bytes);
        let prefix = Prefix::read(&mut cursor)?;

        let header = if prefix.version.is_legacy() { legacy::decode(prefix, &mut cursor)? } else { canonical::decode(prefix, &mut cursor)? };

        Ok((header, cursor.position()))
    }

    /// Checks the invariants parsing alone cannot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] describing the first violated rule.
    pub fn validate(&self) -> Result<()> {
        let invalid = |field: &'static str, reason: String| Err(Error::InvalidFormat(FormatError::invalid(field, reason)));

        if self.kdf.requires_salt() && self.salt.len() < MIN_SALT_SIZE {
            return invalid("salt", format!("{} bytes, {} requires at least {MIN_SALT_SIZE}", self.salt.len(), self.kdf));
        }

        if self.nonce.len() != self.algorithm.nonce_len() {
            return invalid("nonce", format!("{} bytes, {} requires {}", self.nonce.len(), self.algorithm, self.algorithm.nonce_len()));
        }

        if let Err(reason) = self.kdf_params.check() {
            return invalid("kdf parameters", reason);
        }

        if self.flags.compressed() && self.compression == Compression::None {
            return invalid("flags", "compressed bit set without a compression codec".to_owned());
        }

        if !self.flags.compressed() && self.original_size != self.stored_size {
            return invalid("sizes", format!("uncompressed payload declares original {} but stored {}", self.original_size, self.stored_size));
        }

        let expected_tag = if self.version.is_legacy() { 0 } else { self.algorithm.tag_len() };
        if self.tag.len() != expected_tag {
            return invalid("tag", format!("{} bytes, expected {expected_tag}", self.tag.len()));
        }

        Ok(())
    }

    /// Number of bytes that must follow the header.
    ///
    /// Format 1 appends the tag to the ciphertext, so it counts here.
    #[must_use]
    pub fn payload_len(&self) -> u64 {
        if self.version.is_legacy() { self.stored_size.saturating_add(self.algorithm.tag_len() as u64) } else { self.stored_size }
    }

    /// Slice of the raw header bytes bound as associated data.
    ///
    /// `raw` must be exactly the bytes this header was parsed from.
    #[must_use]
    pub fn associated_data<'a>(&self, raw: &'a [u8]) -> &'a [u8] {
        if self.version.is_legacy() { &[] } else { &raw[..raw.len().saturating_sub(self.tag.len())] }
    }

    #[inline]
    #[must_use]
    pub const fn version(&self) -> Version {
        self.version
    }

    #[inline]
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    #[inline]
    #[must_use]
    pub const fn kdf(&self) -> Kdf {
        self.kdf
    }

    #[inline]
    #[must_use]
    pub const fn compression(&self) -> Compression {
        self.compression
    }

    #[inline]
    #[must_use]
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    #[inline]
    #[must_use]
    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    #[inline]
    #[must_use]
    pub const fn kdf_params(&self) -> KdfParams {
        self.kdf_params
    }

    #[inline]
    #[must_use]
    pub const fn original_size(&self) -> u64 {
        self.original_size
    }

    #[inline]
    #[must_use]
    pub const fn stored_size(&self) -> u64 {
        self.stored_size
    }

    #[inline]
    #[must_use]
    pub const fn timestamp(&self) -> u64 {
        self.timestamp
    }

    #[inline]
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    #[inline]
    #[must_use]
    pub const fn flags(&self) -> Flags {
        self.flags
    }

    #[inline]
    #[must_use]
    pub fn tag(&self) -> &[u8] {
        &self.tag
    }
}

/// The decoded fixed 12-byte prefix.
pub(crate) struct Prefix {
    version: Version,
    algorithm: Algorithm,
    kdf: Kdf,
    compression: Compression,
}

impl Prefix {
    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        let fixed = cursor.take(FIXED_PREFIX_LEN, "fixed header")?;

        let magic = [fixed[0], fixed[1], fixed[2], fixed[3]];
        if magic != MAGIC {
            return Err(FormatError::BadMagic { found: magic }.into());
        }

        let version = Version { major: fixed[4], minor: fixed[5] };
        if version.major != FORMAT_MAJOR && version.major != LEGACY_MAJOR {
            return Err(Error::UnsupportedVersion { major: version.major, minor: version.minor, supported: FORMAT_MAJOR });
        }

        Ok(Self { version, algorithm: Algorithm::from_wire(fixed[6])?, kdf: Kdf::from_wire(fixed[7])?, compression: Compression::from_wire(fixed[8])? })
    }
}

fn write_prefix(out: &mut Vec<u8>, header: &Header) {
    out.extend_from_slice(&MAGIC);
    out.push(header.version.major);
    out.push(header.version.minor);
    out.push(header.algorithm.to_wire());
    out.push(header.kdf.to_wire());
    out.push(header.compression.to_wire());
    out.extend_from_slice(&[0u8; RESERVED_LEN]);
}

fn read_kdf_params(kdf: Kdf, cursor: &mut Cursor<'_>) -> Result<KdfParams> {
    debug_assert_eq!(kdf.params_len(), ARGON_PARAMS_LEN);
    Ok(KdfParams::from_bytes(&cursor.array::<ARGON_PARAMS_LEN>("kdf parameters")?))
}

fn decode_filename(raw: &[u8]) -> Result<Option<String>> {
    if raw.is_empty() {
        return Ok(None);
    }

    let name = std::str::from_utf8(raw).map_err(|e| FormatError::invalid("filename", e.to_string()))?;
    Ok(Some(name.to_owned()))
}

/// Step-by-step construction of a new header.
#[derive(Debug, Clone)]
pub struct HeaderBuilder {
    algorithm: Algorithm,
    kdf: Kdf,
    compression: Compression,
    kdf_params: KdfParams,
    salt: Option<Vec<u8>>,
    nonce: Option<Vec<u8>>,
    sizes: Option<(u64, u64)>,
    timestamp: Option<u64>,
    filename: Option<String>,
    compressed: bool,
}

impl HeaderBuilder {
    #[must_use]
    pub fn new(algorithm: Algorithm, kdf: Kdf, compression: Compression) -> Self {
        Self { algorithm, kdf, compression, kdf_params: KdfParams::default(), salt: None, nonce: None, sizes: None, timestamp: None, filename: None, compressed: false }
    }

    #[must_use]
    pub fn kdf_params(mut self, params: KdfParams) -> Self {
        self.kdf_params = params;
        self
    }

    #[must_use]
    pub fn salt(mut self, salt: Vec<u8>) -> Self {
        self.salt = Some(salt);
        self
    }

    #[must_use]
    pub fn nonce(mut self, nonce: Vec<u8>) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Plaintext length and the length of the payload actually encrypted.
    #[must_use]
    pub fn sizes(mut self, original: u64, stored: u64) -> Self {
        self.sizes = Some((original, stored));
        self
    }

    /// Defaults to the current time when never called.
    #[must_use]
    pub fn timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// An empty name is treated as no name.
    #[must_use]
    pub fn filename(mut self, filename: Option<String>) -> Self {
        self.filename = filename.filter(|name| !name.is_empty());
        self
    }

    #[must_use]
    pub fn compressed(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }

    /// Fixes every field except the tag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if salt, nonce or sizes were never
    /// set, or a field is too long for the canonical encoding.
    pub fn build(self) -> Result<HeaderDraft> {
        let salt = self.salt.ok_or_else(|| Error::invalid_argument("header salt not set"))?;
        let nonce = self.nonce.ok_or_else(|| Error::invalid_argument("header nonce not set"))?;
        let (original_size, stored_size) = self.sizes.ok_or_else(|| Error::invalid_argument("header sizes not set"))?;
        let timestamp = self.timestamp.unwrap_or_else(now);

        let header = Header {
            version: Version::CURRENT,
            algorithm: self.algorithm,
            kdf: self.kdf,
            compression: self.compression,
            salt,
            nonce,
            kdf_params: self.kdf_params,
            original_size,
            stored_size,
            timestamp,
            filename: self.filename,
            flags: Flags::empty().with_compressed(self.compressed),
            tag: Vec::new(),
        };

        let associated_data = canonical::encode_unsealed(&header, self.algorithm.tag_len())?;
        Ok(HeaderDraft { header, associated_data })
    }
}

/// A complete header still waiting for its authentication tag.
#[derive(Debug)]
pub struct HeaderDraft {
    header: Header,
    associated_data: Vec<u8>,
}

impl HeaderDraft {
    /// The bytes the cipher must authenticate alongside the payload.
    #[inline]
    #[must_use]
    pub fn associated_data(&self) -> &[u8] {
        &self.associated_data
    }

    #[inline]
    #[must_use]
    pub fn nonce(&self) -> &[u8] {
        &self.header.nonce
    }

    /// Attaches the tag, producing the final immutable header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the tag length differs from the
    /// one the associated data already committed to.
    pub fn seal(mut self, tag: Vec<u8>) -> Result<Header> {
        let expected = self.header.algorithm.tag_len();
        if tag.len() != expected {
            return Err(Error::invalid_argument(format!("tag is {} bytes, {} produces {expected}", tag.len(), self.header.algorithm)));
        }

        self.header.tag = tag;
        Ok(self.header)
    }
}

fn now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn builder() -> HeaderBuilder {
        HeaderBuilder::new(Algorithm::Aes256Gcm, Kdf::Argon2id, Compression::Zstd)
            .kdf_params(KdfParams::new(8, 1, 1))
            .salt(vec![0x11; 32])
            .nonce(vec![0x22; 12])
            .sizes(10_240, 97)
            .timestamp(1_700_000_000)
            .filename(Some("notes.txt".to_owned()))
            .compressed(true)
    }

    fn sample() -> Header {
        builder().build().unwrap().seal(vec![0x33; 16]).unwrap()
    }

    fn legacy_bytes() -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"SWBX");
        out.extend_from_slice(&[1, 0, 2, 1, 0, 0, 0, 0]);
        out.push(16);
        out.extend_from_slice(&[0xAA; 16]);
        out.push(12);
        out.extend_from_slice(&[0xBB; 12]);
        out.extend_from_slice(&KdfParams::new(8, 1, 1).to_bytes());
        out.extend_from_slice(&5u64.to_le_bytes());
        out.extend_from_slice(&5u64.to_le_bytes());
        out.extend_from_slice(&42u64.to_le_bytes());
        out.push(4);
        out.extend_from_slice(b"a.md");
        out
    }

    fn format_error(result: Result<(Header, usize)>) -> FormatError {
        match result {
            Err(Error::InvalidFormat(err)) => err,
            other => panic!("expected InvalidFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_serialized_layout() {
        let bytes = sample().to_bytes().unwrap();

        assert_eq!(bytes.len(), 127);
        assert_eq!(&bytes[0..4], b"SWBX");
        assert_eq!(&bytes[4..12], &[2, 0, 1, 1, 1, 0, 0, 0]);
        assert_eq!(&bytes[12..14], &[32, 0]);
        assert_eq!(&bytes[46..48], &[12, 0]);
        assert_eq!(&bytes[60..72], &KdfParams::new(8, 1, 1).to_bytes());
        assert_eq!(&bytes[72..80], &10_240u64.to_le_bytes());
        assert_eq!(&bytes[80..88], &97u64.to_le_bytes());
        assert_eq!(&bytes[107..109], &[0x01, 0x00]);
        assert_eq!(&bytes[109..111], &[16, 0]);
        assert_eq!(&bytes[111..], &[0x33; 16]);
    }

    #[test]
    fn test_roundtrip_reports_consumed_length() {
        let header = sample();
        let mut bytes = header.to_bytes().unwrap();
        let header_len = bytes.len();
        bytes.extend_from_slice(b"ciphertext follows");

        let (parsed, consumed) = Header::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(consumed, header_len);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_associated_data_is_header_without_tag() {
        let draft = builder().build().unwrap();
        let aad = draft.associated_data().to_vec();
        let header = draft.seal(vec![0x33; 16]).unwrap();
        let bytes = header.to_bytes().unwrap();

        assert_eq!(&bytes[..bytes.len() - 16], &aad[..]);
        assert_eq!(header.associated_data(&bytes), &aad[..]);
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let header = sample();
        assert_eq!(header.to_bytes().unwrap(), header.to_bytes().unwrap());
    }

    #[test]
    fn test_every_truncation_is_reported() {
        let bytes = sample().to_bytes().unwrap();

        for cut in 0..bytes.len() {
            let err = format_error(Header::from_bytes(&bytes[..cut]));
            assert!(err.is_truncation(), "cut at {cut}: {err}");
        }
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = sample().to_bytes().unwrap();
        bytes[0] = b'X';

        assert_eq!(format_error(Header::from_bytes(&bytes)), FormatError::BadMagic { found: *b"XWBX" });
    }

    #[test]
    fn test_short_input_is_truncation_not_bad_magic() {
        assert!(format_error(Header::from_bytes(b"PK")).is_truncation());
    }

    #[test]
    fn test_unsupported_versions() {
        for major in [0u8, 3, 255] {
            let mut bytes = sample().to_bytes().unwrap();
            bytes[4] = major;

            let err = Header::from_bytes(&bytes).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnsupportedVersion, "major {major}");
        }
    }

    #[test]
    fn test_newer_minor_is_accepted() {
        let mut bytes = sample().to_bytes().unwrap();
        bytes[5] = 7;

        let (header, _) = Header::from_bytes(&bytes).unwrap();
        assert_eq!(header.version(), Version { major: 2, minor: 7 });
    }

    #[test]
    fn test_unknown_identifiers() {
        let mut bytes = sample().to_bytes().unwrap();
        bytes[6] = 0x7F;
        assert_eq!(format_error(Header::from_bytes(&bytes)), FormatError::UnrecognizedId { kind: "algorithm", id: 0x7F });

        let mut bytes = sample().to_bytes().unwrap();
        bytes[8] = 9;
        assert_eq!(format_error(Header::from_bytes(&bytes)), FormatError::UnrecognizedId { kind: "compression", id: 9 });
    }

    #[test]
    fn test_unknown_flag_bits() {
        let mut bytes = sample().to_bytes().unwrap();
        bytes[108] = 0x80;

        assert!(matches!(format_error(Header::from_bytes(&bytes)), FormatError::InvalidField { field: "flags", .. }));
    }

    #[test]
    fn test_non_utf8_filename() {
        let mut bytes = sample().to_bytes().unwrap();
        bytes[98] = 0xFF;

        assert!(matches!(format_error(Header::from_bytes(&bytes)), FormatError::InvalidField { field: "filename", .. }));
    }

    #[test]
    fn test_maximum_length_fields() {
        let max = usize::from(u16::MAX);
        let header = builder().salt(vec![1; max]).nonce(vec![2; max]).filename(Some("n".repeat(max))).build().unwrap().seal(vec![0; 16]).unwrap();

        let bytes = header.to_bytes().unwrap();
        let (parsed, consumed) = Header::from_bytes(&bytes).unwrap();

        assert_eq!(parsed, header);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn test_overlong_fields_are_rejected_not_truncated() {
        let too_long = usize::from(u16::MAX) + 1;

        let err = builder().salt(vec![0; too_long]).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = builder().filename(Some("x".repeat(too_long))).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_builder_requires_salt_nonce_and_sizes() {
        let bare = HeaderBuilder::new(Algorithm::Aes256Gcm, Kdf::Argon2id, Compression::None);

        assert!(bare.clone().nonce(vec![0; 12]).sizes(0, 0).build().is_err());
        assert!(bare.clone().salt(vec![0; 32]).sizes(0, 0).build().is_err());
        assert!(bare.clone().salt(vec![0; 32]).nonce(vec![0; 12]).build().is_err());
        assert!(bare.salt(vec![0; 32]).nonce(vec![0; 12]).sizes(0, 0).build().is_ok());
    }

    #[test]
    fn test_seal_checks_tag_length() {
        let err = builder().build().unwrap().seal(vec![0; 15]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_empty_filename_is_absent() {
        let header = builder().filename(Some(String::new())).build().unwrap().seal(vec![0; 16]).unwrap();
        assert_eq!(header.filename(), None);

        let (parsed, _) = Header::from_bytes(&header.to_bytes().unwrap()).unwrap();
        assert_eq!(parsed.filename(), None);
    }

    #[test]
    fn test_validate_cross_field_rules() {
        let seal = |b: HeaderBuilder| b.build().unwrap().seal(vec![0; 16]).unwrap();

        assert!(seal(builder()).validate().is_ok());
        assert!(seal(builder().salt(Vec::new())).validate().is_err());
        assert!(seal(builder().salt(vec![0; 4])).validate().is_err());
        assert!(seal(builder().nonce(vec![0; 24])).validate().is_err());
        assert!(seal(builder().kdf_params(KdfParams::new(8, 0, 1))).validate().is_err());
        assert!(seal(builder().compressed(false)).validate().is_err());

        let mislabeled = HeaderBuilder::new(Algorithm::Aes256Gcm, Kdf::Argon2id, Compression::None).salt(vec![0; 32]).nonce(vec![0; 12]).sizes(3, 3).compressed(true);
        let err = seal(mislabeled).validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_validate_rejects_wrong_inline_tag() {
        let mut bytes = sample().to_bytes().unwrap();
        let tag_len_at = bytes.len() - 18;
        bytes[tag_len_at] = 8;
        bytes.truncate(bytes.len() - 8);

        let (header, _) = Header::from_bytes(&bytes).unwrap();
        assert!(header.validate().is_err());
    }

    #[test]
    fn test_legacy_header_parses() {
        let bytes = legacy_bytes();
        let (header, consumed) = Header::from_bytes(&bytes).unwrap();

        assert_eq!(consumed, bytes.len());
        assert!(header.version().is_legacy());
        assert_eq!(header.algorithm(), Algorithm::ChaCha20Poly1305);
        assert_eq!(header.salt(), &[0xAA; 16]);
        assert_eq!(header.filename(), Some("a.md"));
        assert!(!header.flags().compressed());
        assert!(header.tag().is_empty());
        assert_eq!(header.payload_len(), 5 + 16);
        assert!(header.associated_data(&bytes).is_empty());
        assert!(header.validate().is_ok());
    }

    #[test]
    fn test_legacy_header_reserializes_identically() {
        let bytes = legacy_bytes();
        let (header, _) = Header::from_bytes(&bytes).unwrap();
        assert_eq!(header.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_legacy_compression_implies_flag() {
        let mut bytes = legacy_bytes();
        bytes[8] = 1;

        let (header, _) = Header::from_bytes(&bytes).unwrap();
        assert!(header.flags().compressed());
    }

    #[test]
    fn test_legacy_truncation() {
        let bytes = legacy_bytes();
        for cut in 0..bytes.len() {
            assert!(format_error(Header::from_bytes(&bytes[..cut])).is_truncation(), "cut at {cut}");
        }
    }
}
