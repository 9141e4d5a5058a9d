//! Encryption and decryption pipelines.
//!
//! [`Processor`] drives one container through a fixed, linear sequence of
//! stages. Any stage failure aborts the run and is returned as-is; there are
//! no retries and no partial results.
//!
//! ```text
//! seal:  compress? → salt + nonce → derive key → encrypt → header
//! open:  header → derive key → decrypt → decompress? → length check
//! ```
//!
//! The in-memory [`Processor::seal`] and [`Processor::open`] are the core.
//! [`Processor::encrypt`] and [`Processor::decrypt`] wrap them with input
//! checks and an atomic output write.
//!
//! Randomness is always supplied by the caller. The file wrappers use the
//! operating system's CSPRNG; tests may pass a seeded generator instead.

use rand::rand_core::TryCryptoRng;
use rand::rngs::OsRng;
use secrecy::zeroize::Zeroizing;
use tracing::{debug, info};

use crate::cipher::{Algorithm, Kdf, KdfParams, random_bytes};
use crate::compression::Compression;
use crate::config::ZSTD_LEVEL;
use crate::error::{Error, FormatError, Result};
use crate::file::File;
use crate::header::{Header, HeaderBuilder};
use crate::progress::{ProgressSink, Reporter};
use crate::secret::Secret;
use crate::types::Phase;

/// Choices that shape a new container.
///
/// Only consulted when sealing. Opening always follows the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub algorithm: Algorithm,
    pub kdf: Kdf,
    pub kdf_params: KdfParams,
    pub compression: Compression,
    /// Codec level, ignored when `compression` is [`Compression::None`].
    pub level: i32,
    /// Record the input's file name in the header.
    pub store_filename: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            kdf: Kdf::default(),
            kdf_params: KdfParams::default(),
            compression: Compression::default(),
            level: ZSTD_LEVEL,
            store_filename: true,
        }
    }
}

impl Options {
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an unusable compression level
    /// or KDF cost.
    pub fn validate(&self) -> Result<()> {
        self.compression.check_level(self.level)?;
        self.kdf_params.check().map_err(Error::invalid_argument)
    }
}

/// The output of [`Processor::inspect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    pub header: Header,
    /// Bytes occupied by the header on disk.
    pub header_len: usize,
    /// Bytes following the header.
    pub payload_len: u64,
}

/// Runs the pipelines under one password.
pub struct Processor<'a> {
    password: Secret,
    options: Options,
    progress: Option<&'a dyn ProgressSink>,
}

impl<'a> Processor<'a> {
    pub fn new(password: Secret) -> Self {
        Self { password, options: Options::default(), progress: None }
    }

    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Attaches an observer. Results are identical with or without one.
    #[must_use]
    pub fn with_progress(mut self, sink: &'a dyn ProgressSink) -> Self {
        self.progress = Some(sink);
        self
    }

    /// Produces complete container bytes for `plaintext`.
    ///
    /// `filename` is recorded only when [`Options::store_filename`] is set.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] for an empty password or bad options
    /// - [`Error::Primitive`] if the random source, KDF or codec fails
    pub fn seal<R: TryCryptoRng + ?Sized>(&self, plaintext: &[u8], filename: Option<&str>, rng: &mut R) -> Result<Vec<u8>> {
        let reporter = Reporter::new(self.progress);
        let (_, container) = self.seal_with(plaintext, filename, rng, &reporter)?;
        reporter.stage(100, Phase::Done);
        Ok(container)
    }

    /// Recovers the plaintext from complete container bytes.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidFormat`] or [`Error::UnsupportedVersion`] if the
    ///   header cannot be used, or the payload length disagrees with it
    /// - [`Error::AuthenticationFailed`] for a wrong password or any
    ///   modification of header or ciphertext
    /// - [`Error::IntegrityMismatch`] if the recovered length differs from
    ///   the recorded original size
    pub fn open(&self, container: &[u8]) -> Result<(Header, Vec<u8>)> {
        let reporter = Reporter::new(self.progress);
        let opened = self.open_with(container, &reporter)?;
        reporter.stage(100, Phase::Done);
        Ok(opened)
    }

    /// Encrypts `input` into `output` using the operating system RNG.
    ///
    /// # Errors
    ///
    /// Everything [`Processor::seal`] returns, plus [`Error::NotFound`] and
    /// [`Error::Io`]. On failure `output` is left untouched.
    pub fn encrypt(&self, input: &File, output: &File) -> Result<Header> {
        self.encrypt_with_rng(input, output, &mut OsRng)
    }

    /// [`Processor::encrypt`] with an explicit random source.
    ///
    /// # Errors
    ///
    /// See [`Processor::encrypt`].
    pub fn encrypt_with_rng<R: TryCryptoRng + ?Sized>(&self, input: &File, output: &File, rng: &mut R) -> Result<Header> {
        let reporter = Reporter::new(self.progress);

        reporter.stage(0, Phase::Checking);
        input.validate()?;

        reporter.stage(10, Phase::Reading);
        let plaintext = Zeroizing::new(input.read_all()?);
        debug!(path = %input.path().display(), bytes = plaintext.len(), "read plaintext");

        let filename = input.file_name();
        let (header, container) = self.seal_with(&plaintext, filename.as_deref(), rng, &reporter)?;
        drop(plaintext);

        reporter.stage(90, Phase::Writing);
        output.write_atomic(&container)?;

        reporter.stage(100, Phase::Done);
        info!(input = %input.path().display(), output = %output.path().display(), algorithm = %header.algorithm(), original = header.original_size(), stored = header.stored_size(), "encrypted");

        Ok(header)
    }

    /// Decrypts the container at `input` into `output`.
    ///
    /// # Errors
    ///
    /// Everything [`Processor::open`] returns, plus [`Error::NotFound`] and
    /// [`Error::Io`]. On failure `output` is left untouched.
    pub fn decrypt(&self, input: &File, output: &File) -> Result<Header> {
        let reporter = Reporter::new(self.progress);

        reporter.stage(0, Phase::Checking);
        input.validate()?;

        reporter.stage(10, Phase::Reading);
        let container = input.read_all()?;
        debug!(path = %input.path().display(), bytes = container.len(), "read container");

        let (header, plaintext) = self.open_with(&container, &reporter)?;
        let plaintext = Zeroizing::new(plaintext);

        reporter.stage(90, Phase::Writing);
        output.write_atomic(&plaintext)?;

        reporter.stage(100, Phase::Done);
        info!(input = %input.path().display(), output = %output.path().display(), version = %header.version(), bytes = plaintext.len(), "decrypted");

        Ok(header)
    }

    /// Parses a container's header without a password.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`], [`Error::Io`], or whatever header parsing and
    /// validation report.
    pub fn inspect(input: &File) -> Result<Inspection> {
        input.validate()?;
        let bytes = input.read_all()?;

        let (header, header_len) = Header::from_bytes(&bytes)?;
        header.validate()?;

        Ok(Inspection { header, header_len, payload_len: (bytes.len() - header_len) as u64 })
    }

    fn seal_with<R: TryCryptoRng + ?Sized>(&self, plaintext: &[u8], filename: Option<&str>, rng: &mut R, reporter: &Reporter<'_>) -> Result<(Header, Vec<u8>)> {
        self.require_password()?;
        self.options.validate()?;

        let Options { algorithm, kdf, kdf_params, compression, level, store_filename } = self.options;
        let compressed = compression != Compression::None;

        let mut payload = if compressed {
            reporter.stage(20, Phase::Compressing);
            Zeroizing::new(compression.compress(plaintext, level)?)
        } else {
            Zeroizing::new(plaintext.to_vec())
        };
        debug!(%compression, original = plaintext.len(), stored = payload.len(), "payload prepared");

        reporter.stage(35, Phase::Generating);
        let salt = random_bytes(rng, kdf.salt_len())?;
        let nonce = random_bytes(rng, algorithm.nonce_len())?;

        reporter.stage(40, Phase::Deriving);
        let key = kdf.derive(&self.password, &salt, &kdf_params, algorithm.key_len())?;
        let cipher = algorithm.cipher(&key)?;
        drop(key);
        debug!(%kdf, memory_kib = kdf_params.memory_kib, iterations = kdf_params.iterations, "key derived");

        let draft = HeaderBuilder::new(algorithm, kdf, compression)
            .kdf_params(kdf_params)
            .salt(salt)
            .nonce(nonce)
            .sizes(plaintext.len() as u64, payload.len() as u64)
            .filename(filename.filter(|_| store_filename).map(str::to_owned))
            .compressed(compressed)
            .build()?;

        reporter.stage(70, Phase::Encrypting);
        let tag = cipher.seal(draft.nonce(), draft.associated_data(), &mut payload)?;
        drop(cipher);
        debug!(%algorithm, bytes = payload.len(), "payload encrypted");

        reporter.stage(85, Phase::Assembling);
        let header = draft.seal(tag)?;
        header.validate()?;

        let mut container = header.to_bytes()?;
        container.extend_from_slice(&payload);
        debug!(header_len = container.len() - payload.len(), total = container.len(), "container assembled");

        Ok((header, container))
    }

    fn open_with(&self, container: &[u8], reporter: &Reporter<'_>) -> Result<(Header, Vec<u8>)> {
        self.require_password()?;

        reporter.stage(20, Phase::Parsing);
        let (header, consumed) = Header::from_bytes(container)?;
        header.validate()?;
        debug!(version = %header.version(), algorithm = %header.algorithm(), header_len = consumed, "header parsed");

        let (raw_header, payload) = container.split_at(consumed);
        let actual = payload.len() as u64;
        if actual != header.payload_len() {
            return Err(FormatError::PayloadLength { expected: header.payload_len(), actual }.into());
        }

        let (ciphertext, tag) = if header.version().is_legacy() { payload.split_at(payload.len() - header.algorithm().tag_len()) } else { (payload, header.tag()) };

        reporter.stage(30, Phase::Deriving);
        let algorithm = header.algorithm();
        let key = header.kdf().derive(&self.password, header.salt(), &header.kdf_params(), algorithm.key_len())?;
        let cipher = algorithm.cipher(&key)?;
        drop(key);

        reporter.stage(60, Phase::Decrypting);
        let decrypted = Zeroizing::new(cipher.open(header.nonce(), header.associated_data(raw_header), ciphertext.to_vec(), tag)?);
        drop(cipher);

        let mut plaintext = if header.flags().compressed() {
            reporter.stage(75, Phase::Decompressing);
            Zeroizing::new(header.compression().decompress(&decrypted, header.original_size())?)
        } else {
            decrypted
        };

        reporter.stage(85, Phase::Verifying);
        let recovered = plaintext.len() as u64;
        if recovered != header.original_size() {
            return Err(Error::IntegrityMismatch { expected: header.original_size(), actual: recovered });
        }

        Ok((header, std::mem::take(&mut *plaintext)))
    }

    fn require_password(&self) -> Result<()> {
        if self.password.is_empty() { Err(Error::invalid_argument("password cannot be empty")) } else { Ok(()) }
    }
}
