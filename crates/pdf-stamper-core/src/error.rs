use thiserror::Error;

/// Unified error type for pdf-stamper-core
///
/// Every variant in the PDF section is fatal to the merge it came from:
/// the pipeline either yields a complete, stamped document or nothing.
/// - Parsing an input buffer
/// - Copying pages into the output document
/// - Embedding the stamp font and drawing the label
/// - Serializing and saving the result
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // PDF Errors
    // ==========================================================================
    /// An input buffer is empty or not a well-formed PDF
    #[error("failed to parse PDF '{name}': {reason}")]
    PdfParse { name: String, reason: String },

    /// A page could not be transplanted into the output document
    #[error("failed to copy page: {0}")]
    PdfCopy(String),

    /// The stamp font could not be embedded
    #[error("failed to embed font: {0}")]
    FontEmbed(String),

    /// A page rejected the label draw operation
    #[error("failed to draw on page {page}: {reason}")]
    Draw { page: usize, reason: String },

    /// Failed to serialize the output document
    #[error("failed to save PDF: {0}")]
    PdfSave(String),

    /// A blocking worker running one pipeline stage panicked or was cancelled
    #[error("{stage} task failed: {reason}")]
    Task { stage: &'static str, reason: String },

    // ==========================================================================
    // Persistence Errors
    // ==========================================================================
    /// The sink could not store the merged document
    #[error("failed to store merged PDF: {0}")]
    Sink(String),

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// Invalid configuration value
    #[error("invalid config value for '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Short, stable name of the error kind, for logs and diagnostics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PdfParse { .. } => "parse",
            Self::PdfCopy(_) => "copy",
            Self::FontEmbed(_) => "font_embed",
            Self::Draw { .. } => "draw",
            Self::PdfSave(_) => "save",
            Self::Task { .. } => "task",
            Self::Sink(_) => "sink",
            Self::ConfigLoad(_) | Self::ConfigInvalid { .. } => "config",
            Self::Io(_) => "io",
        }
    }

    pub(crate) fn parse(name: &str, reason: impl std::fmt::Display) -> Self {
        Self::PdfParse {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(Error::parse("a.pdf", "bad header").kind(), "parse");
        assert_eq!(Error::PdfCopy("x".into()).kind(), "copy");
        assert_eq!(Error::FontEmbed("x".into()).kind(), "font_embed");
        assert_eq!(
            Error::Draw {
                page: 3,
                reason: "x".into()
            }
            .kind(),
            "draw"
        );
        assert_eq!(
            Error::Task {
                stage: "stamp",
                reason: "x".into()
            }
            .kind(),
            "task"
        );
    }

    #[test]
    fn test_parse_message_names_source() {
        let err = Error::parse("ticket.pdf", "invalid file header");
        assert_eq!(
            err.to_string(),
            "failed to parse PDF 'ticket.pdf': invalid file header"
        );
    }
}
