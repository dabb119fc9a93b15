pub mod error;
pub mod validation;
pub mod formats;
pub mod fs;

pub use error::{EngineError, EngineResult};
pub use validation::validate_policy;
pub use formats::{FormatTag, format_from_extension};
pub use fs::{
    read_input,
    read_input_async,
    validate_input_path,
    variant_path,
    write_variant,
};
