//! Error types for procedure reading.

/// Error while reading an expanded procedure document.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProcedureError {
    /// The document is not well-formed XML.
    #[error("XML parse error")]
    Xml(#[from] quick_xml::Error),

    /// Text could not be decoded.
    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// A `ProcessingCommand` has no `Command` name.
    #[error("processing command {index} has no command name")]
    MissingCommandName {
        /// Zero-based position of the command in the document.
        index: usize,
    },

    /// A `Parameter` has no `Keyword`.
    #[error("parameter without keyword in command `{command}`")]
    MissingKeyword {
        /// Name of the enclosing command, empty if not yet known.
        command: String,
    },
}
