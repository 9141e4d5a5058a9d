//! Global Configuration Constants
//!
//! Compile-time defaults for the container format, the key-derivation cost
//! parameters and the command line front-end.
//!
//! ## Format Stability
//!
//! Everything in the "Container Format" section is part of the on-disk
//! contract. Changing any of those values changes the bytes every reader
//! expects, so they move only together with a new `FORMAT_MAJOR`.
//!
//! The Argon2 defaults, on the other hand, are only used when *creating*
//! containers. The parameters actually used are stored in every header and
//! are always read back from there on decryption.

/// Application name used in user interfaces.
pub const APP_NAME: &str = "sweetbox";

/// File extension appended to encrypted files.
pub const FILE_EXTENSION: &str = ".swb";

/// Extension appended to a decrypted file when no better name is known.
pub const FALLBACK_EXTENSION: &str = ".out";

// === Container Format ===

/// Magic bytes at offset 0 of every container.
///
/// A mismatch is a hard parse failure: the file is not a container.
pub const MAGIC: [u8; 4] = *b"SWBX";

/// Current (canonical) format major version, written by every encryption.
pub const FORMAT_MAJOR: u8 = 2;

/// Current format minor version. Minor bumps only ever append fields.
pub const FORMAT_MINOR: u8 = 0;

/// Legacy format major version, readable but never written.
pub const LEGACY_MAJOR: u8 = 1;

/// Size of the fixed header prefix.
///
/// Layout: magic (4), major (1), minor (1), algorithm (1), kdf (1),
/// compression (1), reserved (3).
pub const FIXED_PREFIX_LEN: usize = 12;

/// Number of reserved bytes at the end of the fixed prefix.
pub const RESERVED_LEN: usize = 3;

/// Flag bit set when the payload was compressed before encryption.
pub const FLAG_COMPRESSED: u16 = 0x0001;

/// All flag bits understood by format 2.0.
pub const KNOWN_FLAGS: u16 = FLAG_COMPRESSED;

// === Cipher Parameters ===

/// Key size shared by every supported AEAD (256 bits).
pub const KEY_SIZE: usize = 32;

/// Authentication tag size shared by every supported AEAD (128 bits).
pub const TAG_SIZE: usize = 16;

/// AES-256-GCM nonce size (96 bits).
pub const AES_NONCE_SIZE: usize = 12;

/// ChaCha20-Poly1305 nonce size (96 bits).
pub const CHACHA_NONCE_SIZE: usize = 12;

/// XChaCha20-Poly1305 extended nonce size (192 bits).
///
/// Large enough that random generation never needs a counter.
pub const XCHACHA_NONCE_SIZE: usize = 24;

// === Argon2 Key Derivation Parameters ===
// Defaults for new containers. They trade a fraction of a second of CPU and
// 64 MiB of memory per encryption for strong resistance to GPU cracking.

/// Length of the random salt generated for each encryption.
///
/// 32 bytes means salts never collide in practice, so two files encrypted
/// with the same password still get unrelated keys.
pub const SALT_SIZE: usize = 32;

/// Shortest salt Argon2 accepts.
pub const MIN_SALT_SIZE: usize = 8;

/// Default Argon2 time cost (passes over memory).
pub const ARGON_TIME: u32 = 3;

/// Default Argon2 memory cost in KiB (64 MiB).
pub const ARGON_MEMORY: u32 = 64 * 1024;

/// Default Argon2 parallelism (lanes).
pub const ARGON_THREADS: u32 = 4;

/// Upper bound on the memory cost a header may request (4 GiB).
///
/// Containers are untrusted input; without a cap a crafted header could ask
/// the reader to allocate arbitrary amounts of memory before the tag is
/// ever checked.
pub const ARGON_MAX_MEMORY: u32 = 4 * 1024 * 1024;

/// Upper bound on the time cost a header may request.
pub const ARGON_MAX_TIME: u32 = 64;

/// Width of the serialized Argon2 parameter block (three little-endian u32).
pub const ARGON_PARAMS_LEN: usize = 12;

// === Compression ===

/// Default zstd level when compression is enabled.
pub const ZSTD_LEVEL: i32 = 3;

// === User Interface ===

/// Minimum length of an interactively chosen encryption password.
pub const PASSWORD_MIN_LENGTH: usize = 8;
