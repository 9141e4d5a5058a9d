//! Terminal front-end pieces.
//!
//! - [`display`]: result lines and the header table
//! - [`progress`]: per-file progress bars
//! - [`prompt`]: password entry

pub mod display;
pub mod progress;
pub mod prompt;
