//! The document object provider seam.
//!
//! The extraction and mutation engine never parses file bytes itself; it
//! walks an already-parsed object graph owned by an external provider. This
//! module defines that capability as a family of traits: a document exposes
//! pages, the outline root, name trees, and destination resolution; a page
//! exposes its structure root, content objects, and annotation list; and the
//! leaf traits give typed access to elements, bookmarks, content objects,
//! annotations, and form fields.
//!
//! Page handles are scoped resources. Implementations tie release to `Drop`,
//! so a page acquired at the top of an operation is released on every exit
//! path, including early returns and errors.

use std::ops::{Deref, DerefMut};

use crate::error::Result;
use crate::geometry::PdfRect;
use crate::kinds::FieldFlags;
use crate::object::Object;

pub mod memory;

/// Document-level accessors of the provider.
pub trait DocumentObjects {
    /// Page handle type.
    type Page: PageObjects;
    /// Bookmark handle type.
    type Bookmark: BookmarkObject;
    /// Form field handle type.
    type Field: FormFieldObject;

    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Acquire a page by 0-based index. The returned handle releases the
    /// page when dropped.
    fn acquire_page(&self, index: usize) -> Result<Self::Page>;

    /// The synthetic root of the bookmark (outline) tree, if the document
    /// has one.
    fn outline_root(&self) -> Option<Self::Bookmark>;

    /// Root object of the name tree with the given name (e.g. "Dests"),
    /// if present.
    fn name_tree(&self, name: &str) -> Option<Object>;

    /// Resolve a view-destination object to a 0-based page index. Returns
    /// `None` for invalid destinations and for pages that do not exist.
    fn destination_page(&self, dest: &Object) -> Option<usize>;

    /// Look up an interactive form field by its fully qualified name.
    fn field_by_name(&self, name: &str) -> Option<Self::Field>;

    /// Burn every redaction mark into page content. Irreversible; all mark
    /// identifiers are invalid afterwards.
    fn apply_redaction(&mut self) -> Result<()>;

    /// Serialize the document to a byte stream for persistence.
    fn save_to_bytes(&self) -> Result<Vec<u8>>;
}

/// Page-level accessors of the provider.
pub trait PageObjects {
    /// Structure element handle type.
    type Element: StructElement;
    /// Content object handle type.
    type Content: ContentObject;
    /// Annotation handle type.
    type Annotation: AnnotationObject;

    /// The page's crop box in document space.
    fn crop_box(&self) -> PdfRect;

    /// The page's stored rotation in degrees.
    fn rotation(&self) -> i32;

    /// Root element of the page's structural map, or `None` when the page
    /// has no structure.
    fn structure_root(&self) -> Option<Self::Element>;

    /// Number of objects in the page's content list.
    fn content_count(&self) -> usize;

    /// Content object by 0-based index, in document order.
    fn content_object(&self, index: usize) -> Option<Self::Content>;

    /// Number of annotations on the page.
    fn annotation_count(&self) -> usize;

    /// Annotation by 0-based index, in document order.
    fn annotation(&self, index: usize) -> Option<Self::Annotation>;

    /// Allocate a new annotation of the given subtype at a document-space
    /// rectangle and append it to the page.
    fn add_annotation(&mut self, subtype: &str, rect: PdfRect) -> Result<Self::Annotation>;

    /// Detach the annotation at the given 0-based index from the page.
    fn remove_annotation(&mut self, index: usize) -> Result<()>;
}

/// A node of the page's logical structure graph.
///
/// One trait covers all element roles; the line/word accessors return zero
/// or `None` for elements that are not text blocks or text lines.
pub trait StructElement: Sized {
    /// Stable identifier of the element within the graph.
    fn id(&self) -> i64;

    /// Raw engine kind code (see [`crate::kinds::ElementKind::from_code`]).
    fn kind_code(&self) -> i32;

    /// Bounding box in document space.
    fn bbox(&self) -> PdfRect;

    /// Number of generic children.
    fn child_count(&self) -> usize;

    /// Generic child by 0-based index, in document order.
    fn child(&self, index: usize) -> Option<Self>;

    /// Text content, for text blocks, lines, and words.
    fn text(&self) -> Option<String>;

    /// Number of text lines, for text blocks.
    fn line_count(&self) -> usize;

    /// Text line by 0-based index, for text blocks.
    fn line(&self, index: usize) -> Option<Self>;

    /// Word count: total across all lines for a text block, words in the
    /// line for a text line.
    fn word_count(&self) -> usize;

    /// Word by 0-based index, for text lines.
    fn word(&self, index: usize) -> Option<Self>;
}

/// A node of the bookmark (outline) graph.
pub trait BookmarkObject: Sized {
    /// Whether this bookmark has a parent, i.e. is not the synthetic root.
    ///
    /// Reading the parent link can fail in damaged documents; callers treat
    /// a failure as "root-level" and keep walking.
    fn has_parent(&self) -> Result<bool>;

    /// Bookmark title.
    fn title(&self) -> String;

    /// The navigation action attached to this bookmark, if any.
    fn action(&self) -> Option<BookmarkActionRef>;

    /// Number of child bookmarks.
    fn child_count(&self) -> usize;

    /// Child bookmark by 0-based index, in document order.
    fn child(&self, index: usize) -> Option<Self>;
}

/// Raw navigation action attached to a bookmark, before resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum BookmarkActionRef {
    /// Go-to action carrying an unresolved view-destination object.
    GoTo(Object),
    /// URI action carrying the literal target.
    Uri(String),
    /// Any other action kind, identified by its subtype tag. Dropped by the
    /// bookmark extractor.
    Other(String),
}

/// Font resource attached to a text content object.
#[derive(Debug, Clone, PartialEq)]
pub struct FontResource {
    /// Font name as stored in the document
    pub name: String,
    /// Matched system font name
    pub system_name: String,
    /// Whether the matched system font is bold
    pub bold: bool,
    /// Whether the matched system font is italic
    pub italic: bool,
}

/// Text state metrics of a text content object without a font resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Font size in points
    pub font_size: f64,
    /// Character spacing
    pub char_spacing: f64,
    /// Word spacing
    pub word_spacing: f64,
}

/// An object in a page's content list.
pub trait ContentObject {
    /// Raw engine kind code (see [`crate::kinds::ContentKind::from_code`]).
    fn kind_code(&self) -> i32;

    /// Bounding box in document space.
    fn bbox(&self) -> PdfRect;

    /// Text content, for text objects.
    fn text(&self) -> Option<String>;

    /// Associated font resource, if one exists.
    fn font(&self) -> Option<FontResource>;

    /// Text state metrics; meaningful for text objects.
    fn text_metrics(&self) -> TextMetrics;
}

/// A page annotation with dictionary-style property access.
pub trait AnnotationObject {
    /// Form field handle type for widget annotations.
    type Field: FormFieldObject;

    /// Stable identifier of the annotation's underlying object.
    fn id(&self) -> i64;

    /// Annotation subtype tag ("Link", "Widget", "Redact", ...).
    fn subtype(&self) -> String;

    /// Bounding box in document space.
    fn bbox(&self) -> PdfRect;

    /// The form field attached to a widget annotation, if any.
    fn form_field(&self) -> Option<Self::Field>;

    /// Read a string property.
    fn get_text(&self, key: &str) -> Option<String>;

    /// Read a numeric property.
    fn get_number(&self, key: &str) -> Option<f64>;

    /// Read a boolean property.
    fn get_bool(&self, key: &str) -> Option<bool>;

    /// Read a numeric array property.
    fn get_number_array(&self, key: &str) -> Option<Vec<f64>>;

    /// Write a string property.
    fn put_string(&mut self, key: &str, value: &str);

    /// Write a numeric property.
    fn put_number(&mut self, key: &str, value: f64);

    /// Write a boolean property.
    fn put_bool(&mut self, key: &str, value: bool);

    /// Write a numeric array property.
    fn put_number_array(&mut self, key: &str, values: &[f64]);

    /// Signal that the property named by `key` is about to change.
    fn notify_will_change(&mut self, key: &str);

    /// Signal that the change is complete. The provider regenerates the
    /// annotation's appearance in response.
    fn notify_did_change(&mut self, key: &str);
}

/// An interactive form field.
pub trait FormFieldObject {
    /// Raw engine kind code (see [`crate::kinds::FieldKind::from_code`]).
    fn kind_code(&self) -> i32;

    /// Fully qualified field name.
    fn full_name(&self) -> String;

    /// Current field value.
    fn value(&self) -> String;

    /// Default field value.
    fn default_value(&self) -> String;

    /// Tooltip (alternate field name).
    fn tooltip(&self) -> String;

    /// Field flag word.
    fn flags(&self) -> FieldFlags;

    /// Number of options, for choice fields.
    fn option_count(&self) -> usize;

    /// Option caption by 0-based index, for choice fields.
    fn option_caption(&self, index: usize) -> Option<String>;

    /// Number of export values, for radio buttons and check boxes.
    fn export_value_count(&self) -> usize;

    /// Export value by 0-based index.
    fn export_value(&self, index: usize) -> Option<String>;

    /// Maximum value length, for text fields. Zero means unlimited.
    fn max_length(&self) -> i64;

    /// Set the field's value. Multiple values are comma-separated.
    fn set_value(&mut self, value: &str);
}

/// RAII bracket around an annotation mutation.
///
/// Entering the scope fires the will-change notification; dropping it fires
/// did-change, which is the signal the provider uses to regenerate the
/// annotation's appearance. Property writes go through the scope via deref,
/// so a mutation cannot skip either half of the bracket.
pub struct ChangeScope<'a, A: AnnotationObject> {
    annot: &'a mut A,
    key: &'a str,
}

impl<'a, A: AnnotationObject> ChangeScope<'a, A> {
    /// Open a change bracket for the property named by `key`.
    pub fn begin(annot: &'a mut A, key: &'a str) -> Self {
        annot.notify_will_change(key);
        Self { annot, key }
    }
}

impl<A: AnnotationObject> Deref for ChangeScope<'_, A> {
    type Target = A;

    fn deref(&self) -> &A {
        self.annot
    }
}

impl<A: AnnotationObject> DerefMut for ChangeScope<'_, A> {
    fn deref_mut(&mut self) -> &mut A {
        self.annot
    }
}

impl<A: AnnotationObject> Drop for ChangeScope<'_, A> {
    fn drop(&mut self) {
        self.annot.notify_did_change(self.key);
    }
}
