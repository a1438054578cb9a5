use thiserror::Error;

use super::config::ConfigError;
use crate::core::curve::CurveError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Curve construction failed: {0}")]
    Curve(#[from] CurveError),

    #[error("Cannot estimate the complexity of an empty sequence")]
    EmptyInput,

    #[error("Voxel count {value} at curve position {position} exceeds the alphabet maximum {max}")]
    SymbolRange { value: u32, position: usize, max: u32 },
}
