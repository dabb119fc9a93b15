//! Command handlers behind the CLI.
//!
//! - [`compress_file`]: run the engine on one file and write its variants
//! - [`detect_file`]: report the detected format only
//!
//! File reading and writing happen here, never in the engine.

mod compress;

pub use compress::*;
