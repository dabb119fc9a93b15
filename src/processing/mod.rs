//! Compression pipeline.
//!
//! - [`detect`]: signature sniffing
//! - [`decode`]: one decode per request
//! - [`strategy`]: the fixed format → techniques table
//! - [`techniques`]: the twelve executors
//! - [`codecs`]: encoders, resampling, palettes
//! - [`engine`]: ties the above together

pub mod codecs;
pub mod decode;
pub mod detect;
pub mod engine;
pub mod strategy;
pub mod techniques;

pub use detect::detect;
pub use engine::CompressionEngine;
pub use strategy::Strategy;
