//! Document object tree extraction and annotation mutation.
//!
//! `docmap` walks the object graph of an opened document through a
//! provider seam ([`provider::DocumentObjects`]) and turns its facets into
//! serializable snapshots: the structural page map, bookmarks, named
//! destinations, page annotations with flattened form fields, and raw page
//! content. On the mutation side it manages the full redaction-mark
//! lifecycle (create, restyle, remove, apply) and form field writes.
//!
//! The crate owns no parser. Any backend implementing the provider traits
//! plugs in; [`provider::memory`] ships an in-memory one.
//!
//! # Example
//!
//! ```
//! use docmap::extract::extract_page_map;
//! use docmap::provider::memory::{MemDocument, MemElementBuilder, MemPageBuilder};
//!
//! let doc = MemDocument::builder()
//!     .page(MemPageBuilder::new().structure(MemElementBuilder::new(1, 6)))
//!     .build();
//!
//! let map = extract_page_map(&doc, 1)?;
//! assert_eq!(map.data.unwrap().kind, "pde_container");
//! # Ok::<(), docmap::Error>(())
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod extract;
pub mod forms;
pub mod geometry;
pub mod kinds;
pub mod object;
pub mod provider;
pub mod redact;

pub use error::{Error, Result};
pub use geometry::{DevRect, Matrix, PageView, PdfRect, Rotation};
pub use kinds::{ContentKind, ElementKind, FieldFlags, FieldKind};
pub use object::Object;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Translate a 1-based page number into a 0-based index, range-checked
/// against the document's page count.
pub(crate) fn page_index(page_number: usize, count: usize) -> Result<usize> {
    let index = page_number
        .checked_sub(1)
        .ok_or(Error::PageOutOfRange { index: 0, count })?;
    if index >= count {
        return Err(Error::PageOutOfRange { index, count });
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "docmap");
    }

    #[test]
    fn test_page_index_translation() {
        assert_eq!(page_index(1, 3).unwrap(), 0);
        assert_eq!(page_index(3, 3).unwrap(), 2);
        assert!(page_index(0, 3).is_err());
        assert!(page_index(4, 3).is_err());
        assert!(page_index(1, 0).is_err());
    }
}
