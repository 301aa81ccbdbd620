//! Error types for the paged PDF writer.

/// Result type alias for writer operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Errors that can occur while emitting a document.
///
/// Page-layout mutations never fail; partial acceptance is reported
/// through the mutators' boolean returns instead.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// I/O error from the output target.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document was already finished.
    #[error("document already finished")]
    Finished,

    /// A drawing operation was issued with no open page.
    #[error("no page is open; call new_page first")]
    NoOpenPage,
}
