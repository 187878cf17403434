pub mod config;
pub use config::{
    AnnotationStyle, BinStrategy, BoundaryRule, CategoryConfig, Config, LayoutConfig, Margins,
    Orientation, SearchConfig, MAX_BIN_COUNT,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PeerchartError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(String),
    #[error("no numeric samples to bin")]
    EmptyInput,
    #[error(transparent)]
    NotFound(#[from] NotFound),
    #[error("{0}")]
    Other(String),
}

/// Why a company lookup produced no record.
///
/// Callers show an error state for `Company` and fall back to the default
/// pseudo-record for `EmptyQuery`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFound {
    #[error("no company named '{0}'")]
    Company(String),
    #[error("empty company query")]
    EmptyQuery,
}

pub type Result<T> = std::result::Result<T, PeerchartError>;
