//! Build errors.

use jatsgen_core::ConfigError;
use jatsgen_xml::MarkupError;

/// Error building a document tree.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The record lacks the fields needed to build anything.
    #[error("article cannot be built: {}", .0.join("; "))]
    InsufficientInput(Vec<String>),
    /// A free-text field could not be turned into well-formed markup.
    #[error(transparent)]
    Markup(#[from] MarkupError),
    /// Content blocks are nested deeper than allowed.
    #[error("content blocks nested deeper than {max} levels")]
    DepthExceeded { max: usize },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
