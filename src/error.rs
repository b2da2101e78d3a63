//! Error types for sqlts.

use thiserror::Error;

use crate::resolve::ResolveError;

/// The main error type for sqlts operations.
///
/// Collaborator failures are transparent: the message a caller sees is the
/// one the filesystem, template engine or resolver produced.
#[derive(Debug, Error)]
pub enum Error {
    /// The template file (default or user supplied) could not be read.
    #[error(transparent)]
    FileRead(std::io::Error),

    /// The template engine rejected the template source.
    #[error(transparent)]
    TemplateCompile(#[from] handlebars::TemplateError),

    /// The template failed while rendering.
    #[error(transparent)]
    TemplateRender(#[from] handlebars::RenderError),

    /// A table or column could not be resolved to a target name or type.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The raw schema document could not be decoded.
    #[error("Schema error: {0}")]
    Schema(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// True when the failure came from reading the template file.
    pub fn is_file_read(&self) -> bool {
        matches!(self, Self::FileRead(_))
    }
}

/// Result type alias for sqlts operations.
pub type Result<T> = std::result::Result<T, Error>;
