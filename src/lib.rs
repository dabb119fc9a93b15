// Module declarations in dependency order
pub mod utils;
pub mod core;
pub mod processing;
pub mod commands;

// Public exports for external consumers
pub use crate::core::{
    CompressionBatch, CompressionPolicy, CompressionResult, FormatTag, ImageInput, Technique,
};
pub use crate::processing::{CompressionEngine, Strategy, detect};
pub use crate::utils::{EngineError, EngineResult};
