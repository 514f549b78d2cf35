//! Read-only extractors over the document object provider.
//!
//! Each extractor walks one facet of a document (structural page map,
//! bookmarks, named destinations, annotations, raw content, page
//! properties) and produces a serializable snapshot. Extractors never
//! fail on malformed graphs: unreadable or unresolvable pieces are
//! dropped or mapped to empty results, and only structural misuse
//! (a page index out of range, a disallowed subtype filter) raises.

pub mod annots;
pub mod bookmarks;
pub mod content;
pub mod named_dests;
pub mod page_map;
pub mod pages;

pub use annots::{extract_page_annotations, AnnotationRecord, PageAnnotationsResponse};
pub use bookmarks::{extract_bookmarks, BookmarkAction, BookmarkNode};
pub use content::{extract_page_content, ContentRecord, PageContentResponse};
pub use named_dests::{extract_named_destinations, NamedDestination, NamedDestinations};
pub use page_map::{extract_page_map, ElementNode, PageMapResponse};
pub use pages::{extract_page_properties, PageProperties};
