//! Global allocator.
//!
//! The binary runs on mimalloc. Whole files are buffered in memory and
//! batch mode allocates from several rayon workers at once, a pattern the
//! system allocator handles poorly.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;
