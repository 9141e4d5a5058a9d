//! Payload compression codecs.
//!
//! The pipeline never looks inside compressed bytes. It only records the
//! codec identifier and the compressed flag in the header.

use std::io::Read;

use strum::{Display, EnumIter, EnumString};

use crate::error::{Error, Result};

/// Compression codecs a container may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Compression {
    /// Payload stored as-is.
    #[default]
    #[strum(serialize = "none")]
    None,

    /// Zstandard.
    #[strum(serialize = "zstd")]
    Zstd,
}

impl Compression {
    /// Checks that `level` is meaningful for this codec.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an out-of-range zstd level.
    pub fn check_level(self, level: i32) -> Result<()> {
        match self {
            Self::None => Ok(()),
            Self::Zstd => {
                let range = zstd::compression_level_range();
                if range.contains(&level) {
                    Ok(())
                } else {
                    Err(Error::invalid_argument(format!("zstd level {level} outside {}..={}", range.start(), range.end())))
                }
            }
        }
    }

    /// Compresses `data`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Primitive`] if the codec fails.
    pub fn compress(self, data: &[u8], level: i32) -> Result<Vec<u8>> {
        match self {
            Self::None => Ok(data.to_vec()),
            Self::Zstd => zstd::bulk::compress(data, level).map_err(|e| Error::primitive("zstd", e)),
        }
    }

    /// Decompresses `data`, producing at most `limit + 1` bytes.
    ///
    /// Reading one byte past `limit` lets the caller detect an oversized
    /// payload without ever buffering an unbounded amount of output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Primitive`] if the input is not a valid frame.
    pub fn decompress(self, data: &[u8], limit: u64) -> Result<Vec<u8>> {
        match self {
            Self::None => Ok(data.to_vec()),
            Self::Zstd => {
                let decoder = zstd::stream::read::Decoder::with_buffer(data).map_err(|e| Error::primitive("zstd", e))?;
                let mut out = Vec::new();
                decoder.take(limit.saturating_add(1)).read_to_end(&mut out).map_err(|e| Error::primitive("zstd", e))?;
                Ok(out)
            }
        }
    }
}
