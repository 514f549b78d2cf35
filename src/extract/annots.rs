//! Page annotation extraction.
//!
//! Surfaces the link, widget, and redaction-mark annotations of a page.
//! The caller passes an allow-list of subtypes; an allow-list naming any
//! other subtype disables the whole extraction rather than partially
//! honoring it. Widgets are flattened together with their backing form
//! field, and a widget with no field is skipped.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::geometry::PdfRect;
use crate::kinds::{FieldFlags, FieldKind};
use crate::provider::{AnnotationObject, DocumentObjects, FormFieldObject, PageObjects};

/// Annotation subtypes the extractor knows how to surface.
pub const SUPPORTED_SUBTYPES: [&str; 3] = ["Link", "Widget", "Redact"];

/// Extracted annotations of one page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAnnotationsResponse {
    /// 1-based page number the annotations were extracted from.
    pub page_number: usize,
    /// Matching annotations in page order.
    pub data: Vec<AnnotationRecord>,
    /// The allow-list the extraction was asked for.
    pub annot_subtypes: Vec<String>,
}

/// One extracted annotation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationRecord {
    /// Stable annotation identifier.
    pub id: i64,
    /// Annotation subtype tag.
    #[serde(rename = "type")]
    pub subtype: String,
    /// Bounding box in document space.
    pub bbox: PdfRect,
    /// Form field detail. Widgets only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget: Option<WidgetDetail>,
}

/// Form field detail flattened into a widget annotation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetDetail {
    /// Fully qualified field name.
    pub name: String,
    /// Field kind tag.
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Current field value.
    pub value: String,
    /// Default field value.
    pub default_value: String,
    /// Field tooltip.
    pub tooltip: String,
    /// Whether the field must be filled before submit.
    pub required: bool,
    /// Whether the field value cannot be edited.
    pub read_only: bool,
    /// Choice options. Dropdowns and lists only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<ChoiceOption>>,
    /// Export values. Radio groups and check boxes only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_values: Option<Vec<String>>,
    /// Maximum value length. Text inputs and dropdowns only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
    /// Whether the value may span multiple lines. Text inputs and
    /// dropdowns only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_line: Option<bool>,
}

/// A single choice option of a dropdown or list field.
#[derive(Debug, Serialize)]
pub struct ChoiceOption {
    /// Displayed caption.
    pub caption: String,
    /// Stored value.
    pub value: String,
}

/// Extract the annotations of the page with the given 1-based number,
/// keeping only subtypes named in `allowed`.
///
/// An allow-list naming an unsupported subtype fails closed: the whole
/// page yields no annotations. Raises only when `page_number` is out of
/// range.
pub fn extract_page_annotations<D: DocumentObjects>(
    doc: &D,
    page_number: usize,
    allowed: &[&str],
) -> Result<PageAnnotationsResponse> {
    let index = crate::page_index(page_number, doc.page_count())?;
    let annot_subtypes = allowed.iter().map(|s| s.to_string()).collect();

    if let Err(err) = validate_subtypes(allowed) {
        log::warn!("annotation extraction disabled: {}", err);
        return Ok(PageAnnotationsResponse {
            page_number,
            data: Vec::new(),
            annot_subtypes,
        });
    }

    let page = doc.acquire_page(index)?;
    let mut data = Vec::new();
    for i in 0..page.annotation_count() {
        let Some(annot) = page.annotation(i) else {
            continue;
        };
        let subtype = annot.subtype();
        if !allowed.contains(&subtype.as_str()) {
            continue;
        }
        let widget = if subtype == "Widget" {
            match annot.form_field() {
                Some(field) => Some(widget_detail(&field)),
                // Orphaned widgets carry nothing worth surfacing.
                None => continue,
            }
        } else {
            None
        };
        data.push(AnnotationRecord {
            id: annot.id(),
            subtype,
            bbox: annot.bbox(),
            widget,
        });
    }

    Ok(PageAnnotationsResponse {
        page_number,
        data,
        annot_subtypes,
    })
}

fn validate_subtypes(allowed: &[&str]) -> Result<()> {
    for subtype in allowed {
        if !SUPPORTED_SUBTYPES.contains(subtype) {
            return Err(Error::DisallowedSubtype(subtype.to_string()));
        }
    }
    Ok(())
}

fn widget_detail<F: FormFieldObject>(field: &F) -> WidgetDetail {
    let kind = FieldKind::from_code(field.kind_code());
    let flags = field.flags();

    let options = match kind {
        FieldKind::Dropdown | FieldKind::List => {
            let mut options = Vec::with_capacity(field.option_count());
            for i in 0..field.option_count() {
                if let Some(caption) = field.option_caption(i) {
                    options.push(ChoiceOption {
                        value: caption.clone(),
                        caption,
                    });
                }
            }
            Some(options)
        }
        _ => None,
    };

    let export_values = match kind {
        FieldKind::Radio | FieldKind::Checkbox => {
            let mut values = Vec::with_capacity(field.export_value_count());
            for i in 0..field.export_value_count() {
                if let Some(value) = field.export_value(i) {
                    values.push(value);
                }
            }
            Some(values)
        }
        _ => None,
    };

    let (max_length, multi_line) = match kind {
        FieldKind::Text | FieldKind::Dropdown => (
            Some(field.max_length()),
            Some(flags.contains(FieldFlags::MULTILINE)),
        ),
        _ => (None, None),
    };

    WidgetDetail {
        name: field.full_name(),
        kind,
        value: field.value(),
        default_value: field.default_value(),
        tooltip: field.tooltip(),
        required: flags.contains(FieldFlags::REQUIRED),
        read_only: flags.contains(FieldFlags::READ_ONLY),
        options,
        export_values,
        max_length,
        multi_line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::memory::{
        MemAnnotationBuilder, MemDocument, MemFieldBuilder, MemPageBuilder,
    };

    fn mixed_page() -> MemPageBuilder {
        MemPageBuilder::new()
            .annotation(MemAnnotationBuilder::new("Link"))
            .annotation(MemAnnotationBuilder::new("Squiggly"))
            .annotation(
                MemAnnotationBuilder::new("Widget")
                    .field(MemFieldBuilder::new(4, "form.name").value("Ada")),
            )
            .annotation(MemAnnotationBuilder::new("Redact"))
    }

    #[test]
    fn test_allow_list_filters() {
        let doc = MemDocument::builder().page(mixed_page()).build();
        let result = extract_page_annotations(&doc, 1, &["Link", "Redact"]).unwrap();
        let subtypes: Vec<_> = result.data.iter().map(|a| a.subtype.as_str()).collect();
        assert_eq!(subtypes, ["Link", "Redact"]);
        assert_eq!(result.annot_subtypes, ["Link", "Redact"]);
        assert_eq!(doc.acquired_pages(), 0);
    }

    #[test]
    fn test_unsupported_subtype_fails_closed() {
        let doc = MemDocument::builder().page(mixed_page()).build();
        let result = extract_page_annotations(&doc, 1, &["Link", "Comment"]).unwrap();
        assert!(result.data.is_empty());
        assert_eq!(result.annot_subtypes, ["Link", "Comment"]);
    }

    #[test]
    fn test_widget_without_field_is_skipped() {
        let doc = MemDocument::builder()
            .page(
                MemPageBuilder::new()
                    .annotation(MemAnnotationBuilder::new("Widget"))
                    .annotation(
                        MemAnnotationBuilder::new("Widget")
                            .field(MemFieldBuilder::new(4, "kept")),
                    ),
            )
            .build();
        let result = extract_page_annotations(&doc, 1, &["Widget"]).unwrap();
        assert_eq!(result.data.len(), 1);
        assert_eq!(result.data[0].widget.as_ref().unwrap().name, "kept");
    }

    #[test]
    fn test_text_field_detail() {
        let doc = MemDocument::builder()
            .page(MemPageBuilder::new().annotation(
                MemAnnotationBuilder::new("Widget").field(
                    MemFieldBuilder::new(4, "bio")
                        .value("hello")
                        .default_value("n/a")
                        .tooltip("Biography")
                        .flags(FieldFlags::REQUIRED | FieldFlags::MULTILINE)
                        .max_length(200),
                ),
            ))
            .build();
        let result = extract_page_annotations(&doc, 1, &["Widget"]).unwrap();
        let widget = result.data[0].widget.as_ref().unwrap();
        assert_eq!(widget.kind, FieldKind::Text);
        assert_eq!(widget.value, "hello");
        assert_eq!(widget.default_value, "n/a");
        assert_eq!(widget.tooltip, "Biography");
        assert!(widget.required);
        assert!(!widget.read_only);
        assert_eq!(widget.max_length, Some(200));
        assert_eq!(widget.multi_line, Some(true));
        assert!(widget.options.is_none());
        assert!(widget.export_values.is_none());
    }

    #[test]
    fn test_choice_and_toggle_detail() {
        let doc = MemDocument::builder()
            .page(
                MemPageBuilder::new()
                    .annotation(MemAnnotationBuilder::new("Widget").field(
                        MemFieldBuilder::new(5, "color").option("Red").option("Blue"),
                    ))
                    .annotation(MemAnnotationBuilder::new("Widget").field(
                        MemFieldBuilder::new(3, "agree").export_value("Yes"),
                    )),
            )
            .build();
        let result = extract_page_annotations(&doc, 1, &["Widget"]).unwrap();

        let dropdown = result.data[0].widget.as_ref().unwrap();
        let options = dropdown.options.as_ref().unwrap();
        assert_eq!(options[1].caption, "Blue");
        assert_eq!(options[1].value, "Blue");
        assert_eq!(dropdown.max_length, Some(0));

        let checkbox = result.data[1].widget.as_ref().unwrap();
        assert_eq!(checkbox.kind, FieldKind::Checkbox);
        assert_eq!(checkbox.export_values.as_deref(), Some(["Yes".to_string()].as_slice()));
        assert!(checkbox.options.is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let doc = MemDocument::builder().page(mixed_page()).build();
        let result = extract_page_annotations(&doc, 1, &["Widget"]).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["pageNumber"], 1);
        assert_eq!(json["annotSubtypes"][0], "Widget");
        let widget = &json["data"][0]["widget"];
        assert_eq!(widget["type"], "text");
        assert_eq!(widget["defaultValue"], "");
        assert!(widget.get("options").is_none());
    }
}
