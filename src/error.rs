//! Error types for the document extraction and mutation engine.
//!
//! Absence on the read path (missing page map, unresolved destination,
//! missing form field) is never an error: extractors represent it in their
//! output as `None`, an empty sequence, or an omitted field. The variants
//! here cover genuine failures: out-of-range handles, disallowed requests,
//! and mutation errors reported by the provider.

/// Result type alias for document engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while walking or mutating a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Page index outside the document's page range
    #[error("Page index {index} out of range: document has {count} pages")]
    PageOutOfRange {
        /// 0-based page index that was requested
        index: usize,
        /// Number of pages in the document
        count: usize,
    },

    /// Annotation index outside the page's annotation list
    #[error("Annotation index {0} out of range")]
    AnnotationOutOfRange(usize),

    /// Requested annotation subtype is not in the supported set
    #[error("Annotation subtype not supported: {0}")]
    DisallowedSubtype(String),

    /// Page view parameters do not describe an invertible transform
    #[error("Invalid page view: {0}")]
    InvalidPageView(String),

    /// Color value could not be parsed
    #[error("Invalid color value: {0:?}")]
    InvalidColor(String),

    /// A required field was absent from a mutation request
    #[error("Request is missing required field '{0}'")]
    MissingField(&'static str),

    /// Redaction could not be applied or a mark could not be written
    #[error("Redaction failed: {0}")]
    Redaction(String),

    /// Failure reported by the underlying document object provider
    #[error("Provider error: {0}")]
    Provider(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_out_of_range_message() {
        let err = Error::PageOutOfRange { index: 7, count: 3 };
        let msg = format!("{}", err);
        assert!(msg.contains("7"));
        assert!(msg.contains("3 pages"));
    }

    #[test]
    fn test_disallowed_subtype_message() {
        let err = Error::DisallowedSubtype("Comment".to_string());
        assert!(format!("{}", err).contains("Comment"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
