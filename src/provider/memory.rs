//! In-memory document object provider.
//!
//! A reference implementation of the provider traits over plain data. The
//! test suite drives every extractor and the redaction engine through this
//! backend, and the backend enforces the page acquire/release discipline so
//! leaked page handles are detectable.
//!
//! Handles are `Rc`-backed and single-threaded, mirroring the synchronous
//! execution model of the real engine.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::geometry::PdfRect;
use crate::kinds::FieldFlags;
use crate::object::Object;

use super::{
    AnnotationObject, BookmarkActionRef, BookmarkObject, ContentObject, DocumentObjects,
    FontResource, FormFieldObject, PageObjects, StructElement, TextMetrics,
};

// ---------------------------------------------------------------------------
// Inner data
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct ElementInner {
    id: i64,
    kind_code: i32,
    bbox: PdfRect,
    text: Option<String>,
    children: Vec<Rc<ElementInner>>,
    lines: Vec<Rc<ElementInner>>,
    words: Vec<Rc<ElementInner>>,
}

#[derive(Debug)]
struct BookmarkInner {
    title: String,
    action: Option<BookmarkActionRef>,
    children: Vec<Rc<BookmarkInner>>,
    is_root: bool,
    parent_link_broken: bool,
}

#[derive(Debug)]
struct ContentInner {
    kind_code: i32,
    bbox: PdfRect,
    text: Option<String>,
    font: Option<FontResource>,
    metrics: TextMetrics,
}

#[derive(Debug)]
struct FieldInner {
    kind_code: i32,
    full_name: String,
    value: String,
    default_value: String,
    tooltip: String,
    flags: FieldFlags,
    options: Vec<String>,
    export_values: Vec<String>,
    max_length: i64,
}

#[derive(Debug)]
struct AnnotInner {
    id: i64,
    subtype: String,
    bbox: PdfRect,
    props: HashMap<String, Object>,
    field: Option<Rc<RefCell<FieldInner>>>,
    pending_change: Option<String>,
    appearance_generation: u32,
}

#[derive(Debug)]
struct PageInner {
    crop_box: PdfRect,
    rotation: i32,
    structure: Option<Rc<ElementInner>>,
    contents: Vec<Rc<ContentInner>>,
    annots: Vec<Rc<RefCell<AnnotInner>>>,
}

#[derive(Debug)]
struct DocInner {
    pages: Vec<Rc<RefCell<PageInner>>>,
    outline: Option<Rc<BookmarkInner>>,
    name_trees: HashMap<String, Object>,
    fields: HashMap<String, Rc<RefCell<FieldInner>>>,
    redaction_applied: bool,
    burned_marks: usize,
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// An in-memory document.
#[derive(Debug)]
pub struct MemDocument {
    inner: RefCell<DocInner>,
    ids: Rc<Cell<i64>>,
    acquired: Rc<Cell<usize>>,
}

impl MemDocument {
    /// Start building a document.
    pub fn builder() -> MemDocumentBuilder {
        MemDocumentBuilder::default()
    }

    /// Number of currently acquired (unreleased) page handles.
    pub fn acquired_pages(&self) -> usize {
        self.acquired.get()
    }

    /// Whether redaction has been applied to this document.
    pub fn redaction_applied(&self) -> bool {
        self.inner.borrow().redaction_applied
    }

    /// Number of redaction marks burned by [`DocumentObjects::apply_redaction`].
    pub fn burned_mark_count(&self) -> usize {
        self.inner.borrow().burned_marks
    }
}

impl DocumentObjects for MemDocument {
    type Page = MemPage;
    type Bookmark = MemBookmark;
    type Field = MemFormField;

    fn page_count(&self) -> usize {
        self.inner.borrow().pages.len()
    }

    fn acquire_page(&self, index: usize) -> Result<MemPage> {
        let inner = self.inner.borrow();
        let page = inner
            .pages
            .get(index)
            .cloned()
            .ok_or(Error::PageOutOfRange {
                index,
                count: inner.pages.len(),
            })?;
        self.acquired.set(self.acquired.get() + 1);
        Ok(MemPage {
            inner: page,
            ids: Rc::clone(&self.ids),
            _lease: PageLease(Rc::clone(&self.acquired)),
        })
    }

    fn outline_root(&self) -> Option<MemBookmark> {
        self.inner.borrow().outline.clone().map(MemBookmark)
    }

    fn name_tree(&self, name: &str) -> Option<Object> {
        self.inner.borrow().name_trees.get(name).cloned()
    }

    fn destination_page(&self, dest: &Object) -> Option<usize> {
        // A destination is a page number, or an array whose first entry is
        // the page number.
        let page = match dest {
            Object::Integer(i) => *i,
            Object::Array(arr) => arr.first().and_then(Object::as_integer)?,
            _ => return None,
        };
        if page < 0 || page as usize >= self.page_count() {
            return None;
        }
        Some(page as usize)
    }

    fn field_by_name(&self, name: &str) -> Option<MemFormField> {
        self.inner
            .borrow()
            .fields
            .get(name)
            .cloned()
            .map(|inner| MemFormField { inner })
    }

    fn apply_redaction(&mut self) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.redaction_applied {
            return Err(Error::Redaction(
                "redaction already applied to this document".to_string(),
            ));
        }
        let mut burned = 0;
        for page in &inner.pages {
            let mut page = page.borrow_mut();
            let before = page.annots.len();
            page.annots
                .retain(|annot| annot.borrow().subtype != "Redact");
            burned += before - page.annots.len();
        }
        inner.redaction_applied = true;
        inner.burned_marks = burned;
        log::debug!("burned {} redaction marks", burned);
        Ok(())
    }

    fn save_to_bytes(&self) -> Result<Vec<u8>> {
        let inner = self.inner.borrow();
        let snapshot = serde_json::json!({
            "pages": inner.pages.len(),
            "redactionApplied": inner.redaction_applied,
        });
        Ok(serde_json::to_vec(&snapshot)?)
    }
}

/// Decrements the document's acquired-page counter on drop.
#[derive(Debug)]
struct PageLease(Rc<Cell<usize>>);

impl Drop for PageLease {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// An acquired in-memory page. Released on drop.
#[derive(Debug)]
pub struct MemPage {
    inner: Rc<RefCell<PageInner>>,
    ids: Rc<Cell<i64>>,
    _lease: PageLease,
}

impl PageObjects for MemPage {
    type Element = MemElement;
    type Content = MemContent;
    type Annotation = MemAnnotation;

    fn crop_box(&self) -> PdfRect {
        self.inner.borrow().crop_box
    }

    fn rotation(&self) -> i32 {
        self.inner.borrow().rotation
    }

    fn structure_root(&self) -> Option<MemElement> {
        self.inner.borrow().structure.clone().map(MemElement)
    }

    fn content_count(&self) -> usize {
        self.inner.borrow().contents.len()
    }

    fn content_object(&self, index: usize) -> Option<MemContent> {
        self.inner.borrow().contents.get(index).cloned().map(MemContent)
    }

    fn annotation_count(&self) -> usize {
        self.inner.borrow().annots.len()
    }

    fn annotation(&self, index: usize) -> Option<MemAnnotation> {
        self.inner
            .borrow()
            .annots
            .get(index)
            .cloned()
            .map(|inner| MemAnnotation { inner })
    }

    fn add_annotation(&mut self, subtype: &str, rect: PdfRect) -> Result<MemAnnotation> {
        let id = self.ids.get();
        self.ids.set(id + 1);
        let annot = Rc::new(RefCell::new(AnnotInner {
            id,
            subtype: subtype.to_string(),
            bbox: rect,
            props: HashMap::new(),
            field: None,
            pending_change: None,
            appearance_generation: 0,
        }));
        self.inner.borrow_mut().annots.push(Rc::clone(&annot));
        Ok(MemAnnotation { inner: annot })
    }

    fn remove_annotation(&mut self, index: usize) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if index >= inner.annots.len() {
            return Err(Error::AnnotationOutOfRange(index));
        }
        inner.annots.remove(index);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Structure elements
// ---------------------------------------------------------------------------

/// A node in an in-memory structure graph.
#[derive(Debug, Clone)]
pub struct MemElement(Rc<ElementInner>);

impl StructElement for MemElement {
    fn id(&self) -> i64 {
        self.0.id
    }

    fn kind_code(&self) -> i32 {
        self.0.kind_code
    }

    fn bbox(&self) -> PdfRect {
        self.0.bbox
    }

    fn child_count(&self) -> usize {
        self.0.children.len()
    }

    fn child(&self, index: usize) -> Option<MemElement> {
        self.0.children.get(index).cloned().map(MemElement)
    }

    fn text(&self) -> Option<String> {
        self.0.text.clone()
    }

    fn line_count(&self) -> usize {
        self.0.lines.len()
    }

    fn line(&self, index: usize) -> Option<MemElement> {
        self.0.lines.get(index).cloned().map(MemElement)
    }

    fn word_count(&self) -> usize {
        if self.0.lines.is_empty() {
            self.0.words.len()
        } else {
            self.0.lines.iter().map(|line| line.words.len()).sum()
        }
    }

    fn word(&self, index: usize) -> Option<MemElement> {
        self.0.words.get(index).cloned().map(MemElement)
    }
}

// ---------------------------------------------------------------------------
// Bookmarks
// ---------------------------------------------------------------------------

/// A node in an in-memory bookmark graph.
#[derive(Debug, Clone)]
pub struct MemBookmark(Rc<BookmarkInner>);

impl BookmarkObject for MemBookmark {
    fn has_parent(&self) -> Result<bool> {
        if self.0.parent_link_broken {
            return Err(Error::Provider("bookmark parent link unreadable".to_string()));
        }
        Ok(!self.0.is_root)
    }

    fn title(&self) -> String {
        self.0.title.clone()
    }

    fn action(&self) -> Option<BookmarkActionRef> {
        self.0.action.clone()
    }

    fn child_count(&self) -> usize {
        self.0.children.len()
    }

    fn child(&self, index: usize) -> Option<MemBookmark> {
        self.0.children.get(index).cloned().map(MemBookmark)
    }
}

// ---------------------------------------------------------------------------
// Content objects
// ---------------------------------------------------------------------------

/// An in-memory page content object.
#[derive(Debug, Clone)]
pub struct MemContent(Rc<ContentInner>);

impl ContentObject for MemContent {
    fn kind_code(&self) -> i32 {
        self.0.kind_code
    }

    fn bbox(&self) -> PdfRect {
        self.0.bbox
    }

    fn text(&self) -> Option<String> {
        self.0.text.clone()
    }

    fn font(&self) -> Option<FontResource> {
        self.0.font.clone()
    }

    fn text_metrics(&self) -> TextMetrics {
        self.0.metrics
    }
}

// ---------------------------------------------------------------------------
// Annotations
// ---------------------------------------------------------------------------

/// An in-memory annotation handle. Clones share the same annotation.
#[derive(Debug, Clone)]
pub struct MemAnnotation {
    inner: Rc<RefCell<AnnotInner>>,
}

impl MemAnnotation {
    /// How many times the appearance has been regenerated (did-change
    /// notifications received).
    pub fn appearance_generation(&self) -> u32 {
        self.inner.borrow().appearance_generation
    }

    /// The property key of an open change bracket, if one is pending.
    pub fn pending_change(&self) -> Option<String> {
        self.inner.borrow().pending_change.clone()
    }

    /// Read a raw property value.
    pub fn property(&self, key: &str) -> Option<Object> {
        self.inner.borrow().props.get(key).cloned()
    }
}

impl AnnotationObject for MemAnnotation {
    type Field = MemFormField;

    fn id(&self) -> i64 {
        self.inner.borrow().id
    }

    fn subtype(&self) -> String {
        self.inner.borrow().subtype.clone()
    }

    fn bbox(&self) -> PdfRect {
        self.inner.borrow().bbox
    }

    fn form_field(&self) -> Option<MemFormField> {
        self.inner
            .borrow()
            .field
            .clone()
            .map(|inner| MemFormField { inner })
    }

    fn get_text(&self, key: &str) -> Option<String> {
        self.inner
            .borrow()
            .props
            .get(key)
            .and_then(Object::as_str)
            .map(str::to_string)
    }

    fn get_number(&self, key: &str) -> Option<f64> {
        self.inner.borrow().props.get(key).and_then(Object::as_real)
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.inner.borrow().props.get(key).and_then(Object::as_bool)
    }

    fn get_number_array(&self, key: &str) -> Option<Vec<f64>> {
        self.inner
            .borrow()
            .props
            .get(key)
            .and_then(Object::as_array)
            .map(|arr| arr.iter().filter_map(Object::as_real).collect())
    }

    fn put_string(&mut self, key: &str, value: &str) {
        self.inner
            .borrow_mut()
            .props
            .insert(key.to_string(), Object::String(value.to_string()));
    }

    fn put_number(&mut self, key: &str, value: f64) {
        self.inner
            .borrow_mut()
            .props
            .insert(key.to_string(), Object::Real(value));
    }

    fn put_bool(&mut self, key: &str, value: bool) {
        self.inner
            .borrow_mut()
            .props
            .insert(key.to_string(), Object::Boolean(value));
    }

    fn put_number_array(&mut self, key: &str, values: &[f64]) {
        let array = values.iter().map(|v| Object::Real(*v)).collect();
        self.inner
            .borrow_mut()
            .props
            .insert(key.to_string(), Object::Array(array));
    }

    fn notify_will_change(&mut self, key: &str) {
        let mut inner = self.inner.borrow_mut();
        if let Some(open) = &inner.pending_change {
            log::warn!("will-change for {:?} while {:?} is still open", key, open);
        }
        inner.pending_change = Some(key.to_string());
    }

    fn notify_did_change(&mut self, key: &str) {
        let mut inner = self.inner.borrow_mut();
        match inner.pending_change.take() {
            Some(open) if open == key => inner.appearance_generation += 1,
            Some(open) => {
                log::warn!("did-change for {:?} closes bracket opened for {:?}", key, open);
                inner.appearance_generation += 1;
            }
            None => log::warn!("did-change for {:?} without a matching will-change", key),
        }
    }
}

// ---------------------------------------------------------------------------
// Form fields
// ---------------------------------------------------------------------------

/// An in-memory form field handle. Clones share the same field.
#[derive(Debug, Clone)]
pub struct MemFormField {
    inner: Rc<RefCell<FieldInner>>,
}

impl FormFieldObject for MemFormField {
    fn kind_code(&self) -> i32 {
        self.inner.borrow().kind_code
    }

    fn full_name(&self) -> String {
        self.inner.borrow().full_name.clone()
    }

    fn value(&self) -> String {
        self.inner.borrow().value.clone()
    }

    fn default_value(&self) -> String {
        self.inner.borrow().default_value.clone()
    }

    fn tooltip(&self) -> String {
        self.inner.borrow().tooltip.clone()
    }

    fn flags(&self) -> FieldFlags {
        self.inner.borrow().flags
    }

    fn option_count(&self) -> usize {
        self.inner.borrow().options.len()
    }

    fn option_caption(&self, index: usize) -> Option<String> {
        self.inner.borrow().options.get(index).cloned()
    }

    fn export_value_count(&self) -> usize {
        self.inner.borrow().export_values.len()
    }

    fn export_value(&self, index: usize) -> Option<String> {
        self.inner.borrow().export_values.get(index).cloned()
    }

    fn max_length(&self) -> i64 {
        self.inner.borrow().max_length
    }

    fn set_value(&mut self, value: &str) {
        self.inner.borrow_mut().value = value.to_string();
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Builder for [`MemDocument`].
#[derive(Debug, Default)]
pub struct MemDocumentBuilder {
    pages: Vec<MemPageBuilder>,
    outline: Option<MemBookmarkBuilder>,
    name_trees: HashMap<String, Object>,
}

impl MemDocumentBuilder {
    /// Append a page.
    pub fn page(mut self, page: MemPageBuilder) -> Self {
        self.pages.push(page);
        self
    }

    /// Set the bookmark tree root.
    pub fn outline(mut self, root: MemBookmarkBuilder) -> Self {
        self.outline = Some(root.root());
        self
    }

    /// Install a name tree under the given tree name (e.g. "Dests").
    pub fn name_tree(mut self, name: &str, root: Object) -> Self {
        self.name_trees.insert(name.to_string(), root);
        self
    }

    /// Build the document.
    pub fn build(self) -> MemDocument {
        let ids = Rc::new(Cell::new(1i64));
        let mut fields = HashMap::new();
        let pages = self
            .pages
            .into_iter()
            .map(|page| Rc::new(RefCell::new(page.build(&ids, &mut fields))))
            .collect();
        MemDocument {
            inner: RefCell::new(DocInner {
                pages,
                outline: self.outline.map(|root| root.build()),
                name_trees: self.name_trees,
                fields,
                redaction_applied: false,
                burned_marks: 0,
            }),
            ids,
            acquired: Rc::new(Cell::new(0)),
        }
    }
}

/// Builder for an in-memory page.
#[derive(Debug)]
pub struct MemPageBuilder {
    crop_box: PdfRect,
    rotation: i32,
    structure: Option<MemElementBuilder>,
    contents: Vec<MemContentBuilder>,
    annots: Vec<MemAnnotationBuilder>,
}

impl Default for MemPageBuilder {
    fn default() -> Self {
        Self {
            // US Letter
            crop_box: PdfRect::new(792.0, 0.0, 0.0, 612.0),
            rotation: 0,
            structure: None,
            contents: Vec::new(),
            annots: Vec::new(),
        }
    }
}

impl MemPageBuilder {
    /// Create a page with a US Letter crop box.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the crop box.
    pub fn crop_box(mut self, rect: PdfRect) -> Self {
        self.crop_box = rect;
        self
    }

    /// Set the stored page rotation in degrees.
    pub fn rotation(mut self, degrees: i32) -> Self {
        self.rotation = degrees;
        self
    }

    /// Set the root of the page's structural map.
    pub fn structure(mut self, root: MemElementBuilder) -> Self {
        self.structure = Some(root);
        self
    }

    /// Append a content object.
    pub fn content(mut self, content: MemContentBuilder) -> Self {
        self.contents.push(content);
        self
    }

    /// Append an annotation.
    pub fn annotation(mut self, annot: MemAnnotationBuilder) -> Self {
        self.annots.push(annot);
        self
    }

    fn build(
        self,
        ids: &Rc<Cell<i64>>,
        fields: &mut HashMap<String, Rc<RefCell<FieldInner>>>,
    ) -> PageInner {
        PageInner {
            crop_box: self.crop_box,
            rotation: self.rotation,
            structure: self.structure.map(|root| root.build()),
            contents: self.contents.into_iter().map(|c| Rc::new(c.0)).collect(),
            annots: self
                .annots
                .into_iter()
                .map(|annot| annot.build(ids, fields))
                .collect(),
        }
    }
}

/// Builder for a structure element.
#[derive(Debug)]
pub struct MemElementBuilder {
    id: i64,
    kind_code: i32,
    bbox: PdfRect,
    text: Option<String>,
    children: Vec<MemElementBuilder>,
    lines: Vec<MemElementBuilder>,
    words: Vec<MemElementBuilder>,
}

impl MemElementBuilder {
    /// Create an element with the given id and raw kind code.
    pub fn new(id: i64, kind_code: i32) -> Self {
        Self {
            id,
            kind_code,
            bbox: PdfRect::new(0.0, 0.0, 0.0, 0.0),
            text: None,
            children: Vec::new(),
            lines: Vec::new(),
            words: Vec::new(),
        }
    }

    /// Set the bounding box.
    pub fn bbox(mut self, rect: PdfRect) -> Self {
        self.bbox = rect;
        self
    }

    /// Set the text content.
    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// Append a generic child element.
    pub fn child(mut self, child: MemElementBuilder) -> Self {
        self.children.push(child);
        self
    }

    /// Append a text line (valid on text blocks).
    pub fn line(mut self, line: MemElementBuilder) -> Self {
        self.lines.push(line);
        self
    }

    /// Append a word (valid on text lines).
    pub fn word(mut self, word: MemElementBuilder) -> Self {
        self.words.push(word);
        self
    }

    fn build(self) -> Rc<ElementInner> {
        Rc::new(ElementInner {
            id: self.id,
            kind_code: self.kind_code,
            bbox: self.bbox,
            text: self.text,
            children: self.children.into_iter().map(|c| c.build()).collect(),
            lines: self.lines.into_iter().map(|l| l.build()).collect(),
            words: self.words.into_iter().map(|w| w.build()).collect(),
        })
    }
}

/// Builder for a content object.
#[derive(Debug)]
pub struct MemContentBuilder(ContentInner);

impl MemContentBuilder {
    /// Create a content object with the given raw kind code.
    pub fn new(kind_code: i32) -> Self {
        Self(ContentInner {
            kind_code,
            bbox: PdfRect::new(0.0, 0.0, 0.0, 0.0),
            text: None,
            font: None,
            metrics: TextMetrics {
                font_size: 0.0,
                char_spacing: 0.0,
                word_spacing: 0.0,
            },
        })
    }

    /// Set the bounding box.
    pub fn bbox(mut self, rect: PdfRect) -> Self {
        self.0.bbox = rect;
        self
    }

    /// Set the text content.
    pub fn text(mut self, text: &str) -> Self {
        self.0.text = Some(text.to_string());
        self
    }

    /// Attach a font resource.
    pub fn font(mut self, name: &str, system_name: &str, bold: bool, italic: bool) -> Self {
        self.0.font = Some(FontResource {
            name: name.to_string(),
            system_name: system_name.to_string(),
            bold,
            italic,
        });
        self
    }

    /// Set the text state metrics.
    pub fn metrics(mut self, font_size: f64, char_spacing: f64, word_spacing: f64) -> Self {
        self.0.metrics = TextMetrics {
            font_size,
            char_spacing,
            word_spacing,
        };
        self
    }
}

/// Builder for an annotation.
#[derive(Debug)]
pub struct MemAnnotationBuilder {
    subtype: String,
    bbox: PdfRect,
    props: HashMap<String, Object>,
    field: Option<MemFieldBuilder>,
}

impl MemAnnotationBuilder {
    /// Create an annotation with the given subtype tag.
    pub fn new(subtype: &str) -> Self {
        Self {
            subtype: subtype.to_string(),
            bbox: PdfRect::new(0.0, 0.0, 0.0, 0.0),
            props: HashMap::new(),
            field: None,
        }
    }

    /// Set the bounding box.
    pub fn bbox(mut self, rect: PdfRect) -> Self {
        self.bbox = rect;
        self
    }

    /// Set a dictionary property.
    pub fn prop(mut self, key: &str, value: Object) -> Self {
        self.props.insert(key.to_string(), value);
        self
    }

    /// Attach a form field (for widget annotations).
    pub fn field(mut self, field: MemFieldBuilder) -> Self {
        self.field = Some(field);
        self
    }

    fn build(
        self,
        ids: &Rc<Cell<i64>>,
        fields: &mut HashMap<String, Rc<RefCell<FieldInner>>>,
    ) -> Rc<RefCell<AnnotInner>> {
        let id = ids.get();
        ids.set(id + 1);
        let field = self.field.map(|field| {
            let inner = Rc::new(RefCell::new(field.0));
            let name = inner.borrow().full_name.clone();
            fields.insert(name, Rc::clone(&inner));
            inner
        });
        Rc::new(RefCell::new(AnnotInner {
            id,
            subtype: self.subtype,
            bbox: self.bbox,
            props: self.props,
            field,
            pending_change: None,
            appearance_generation: 0,
        }))
    }
}

/// Builder for a form field.
#[derive(Debug)]
pub struct MemFieldBuilder(FieldInner);

impl MemFieldBuilder {
    /// Create a field with the given raw kind code and fully qualified name.
    pub fn new(kind_code: i32, full_name: &str) -> Self {
        Self(FieldInner {
            kind_code,
            full_name: full_name.to_string(),
            value: String::new(),
            default_value: String::new(),
            tooltip: String::new(),
            flags: FieldFlags::empty(),
            options: Vec::new(),
            export_values: Vec::new(),
            max_length: 0,
        })
    }

    /// Set the current value.
    pub fn value(mut self, value: &str) -> Self {
        self.0.value = value.to_string();
        self
    }

    /// Set the default value.
    pub fn default_value(mut self, value: &str) -> Self {
        self.0.default_value = value.to_string();
        self
    }

    /// Set the tooltip.
    pub fn tooltip(mut self, tooltip: &str) -> Self {
        self.0.tooltip = tooltip.to_string();
        self
    }

    /// Set the flag word.
    pub fn flags(mut self, flags: FieldFlags) -> Self {
        self.0.flags = flags;
        self
    }

    /// Append a choice option.
    pub fn option(mut self, caption: &str) -> Self {
        self.0.options.push(caption.to_string());
        self
    }

    /// Append an export value.
    pub fn export_value(mut self, value: &str) -> Self {
        self.0.export_values.push(value.to_string());
        self
    }

    /// Set the maximum value length.
    pub fn max_length(mut self, max_length: i64) -> Self {
        self.0.max_length = max_length;
        self
    }
}

/// Builder for a bookmark node.
#[derive(Debug)]
pub struct MemBookmarkBuilder {
    title: String,
    action: Option<BookmarkActionRef>,
    children: Vec<MemBookmarkBuilder>,
    is_root: bool,
    parent_link_broken: bool,
}

impl MemBookmarkBuilder {
    /// Create a bookmark with the given title.
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            action: None,
            children: Vec::new(),
            is_root: false,
            parent_link_broken: false,
        }
    }

    /// Attach a raw navigation action.
    pub fn action(mut self, action: BookmarkActionRef) -> Self {
        self.action = Some(action);
        self
    }

    /// Attach a go-to action targeting a 0-based page index.
    pub fn goto_page(self, page_index: i64) -> Self {
        self.action(BookmarkActionRef::GoTo(Object::Integer(page_index)))
    }

    /// Attach a URI action.
    pub fn uri(self, uri: &str) -> Self {
        self.action(BookmarkActionRef::Uri(uri.to_string()))
    }

    /// Append a child bookmark.
    pub fn child(mut self, child: MemBookmarkBuilder) -> Self {
        self.children.push(child);
        self
    }

    /// Make reading this bookmark's parent link fail, to exercise the
    /// extractor's fallback path.
    pub fn broken_parent_link(mut self) -> Self {
        self.parent_link_broken = true;
        self
    }

    fn root(mut self) -> Self {
        self.is_root = true;
        self
    }

    fn build(self) -> Rc<BookmarkInner> {
        Rc::new(BookmarkInner {
            title: self.title,
            action: self.action,
            children: self.children.into_iter().map(|c| c.build()).collect(),
            is_root: self.is_root,
            parent_link_broken: self.parent_link_broken,
        })
    }
}
