//! Raw page content extraction.
//!
//! Flattens a page's content objects into records. Only text, image, and
//! form-XObject objects surface; paths, shadings, and unknown kinds are
//! skipped. A text record's state carries the resolved font when one is
//! attached, and falls back to bare spacing metrics otherwise.

use serde::Serialize;

use crate::error::Result;
use crate::geometry::PdfRect;
use crate::kinds::ContentKind;
use crate::provider::{ContentObject, DocumentObjects, PageObjects};

/// One extracted content object.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ContentRecord {
    /// A text object.
    #[serde(rename = "pds_text")]
    Text {
        /// Text content.
        text: String,
        /// Bounding box in document space.
        bbox: PdfRect,
        /// Font or metric state of the text.
        #[serde(rename = "textState")]
        text_state: TextState,
    },
    /// An image object.
    #[serde(rename = "pds_image")]
    Image {
        /// Bounding box in document space.
        bbox: PdfRect,
    },
    /// A form XObject, surfaced as an opaque marker.
    #[serde(rename = "pds_form")]
    Form,
}

/// Text state attached to a text record.
#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TextState {
    /// The text's font resource, when one is resolved.
    #[serde(rename_all = "camelCase")]
    Font {
        /// Font name as stored in the document.
        font_name: String,
        /// Matching system font name.
        sys_font_name: String,
        /// Whether the face is bold.
        is_bold: bool,
        /// Whether the face is italic.
        is_italic: bool,
    },
    /// Bare spacing metrics, when no font is resolved.
    #[serde(rename_all = "camelCase")]
    Metrics {
        /// Font size in points.
        font_size: f64,
        /// Extra spacing per character in points.
        char_spacing: f64,
        /// Extra spacing per space character in points.
        word_spacing: f64,
    },
}

/// Extracted content of one page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContentResponse {
    /// 1-based page number the content was extracted from.
    pub page_number: usize,
    /// Surfaced content records in page order.
    pub data: Vec<ContentRecord>,
}

/// Extract the content objects of the page with the given 1-based number.
///
/// Raises only when `page_number` is out of range.
pub fn extract_page_content<D: DocumentObjects>(
    doc: &D,
    page_number: usize,
) -> Result<PageContentResponse> {
    let index = crate::page_index(page_number, doc.page_count())?;
    let page = doc.acquire_page(index)?;

    let mut data = Vec::new();
    for i in 0..page.content_count() {
        let Some(object) = page.content_object(i) else {
            continue;
        };
        match ContentKind::from_code(object.kind_code()) {
            ContentKind::Text => {
                let text_state = match object.font() {
                    Some(font) => TextState::Font {
                        font_name: font.name,
                        sys_font_name: font.system_name,
                        is_bold: font.bold,
                        is_italic: font.italic,
                    },
                    None => {
                        let metrics = object.text_metrics();
                        TextState::Metrics {
                            font_size: metrics.font_size,
                            char_spacing: metrics.char_spacing,
                            word_spacing: metrics.word_spacing,
                        }
                    }
                };
                data.push(ContentRecord::Text {
                    text: object.text().unwrap_or_default(),
                    bbox: object.bbox(),
                    text_state,
                });
            }
            ContentKind::Image => data.push(ContentRecord::Image {
                bbox: object.bbox(),
            }),
            ContentKind::Form => data.push(ContentRecord::Form),
            ContentKind::Path | ContentKind::Shading | ContentKind::Unknown => {}
        }
    }

    Ok(PageContentResponse { page_number, data })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::memory::{MemContentBuilder, MemDocument, MemPageBuilder};

    #[test]
    fn test_font_beats_metrics() {
        let doc = MemDocument::builder()
            .page(
                MemPageBuilder::new()
                    .content(
                        MemContentBuilder::new(1)
                            .text("styled")
                            .font("F1", "Helvetica-Bold", true, false)
                            .metrics(11.0, 0.5, 1.0),
                    )
                    .content(MemContentBuilder::new(1).text("plain").metrics(9.0, 0.0, 0.25)),
            )
            .build();

        let content = extract_page_content(&doc, 1).unwrap();
        assert_eq!(content.data.len(), 2);
        let ContentRecord::Text { text, text_state, .. } = &content.data[0] else {
            panic!("expected text record");
        };
        assert_eq!(text, "styled");
        assert_eq!(
            *text_state,
            TextState::Font {
                font_name: "F1".to_string(),
                sys_font_name: "Helvetica-Bold".to_string(),
                is_bold: true,
                is_italic: false,
            }
        );
        let ContentRecord::Text { text_state, .. } = &content.data[1] else {
            panic!("expected text record");
        };
        assert_eq!(
            *text_state,
            TextState::Metrics {
                font_size: 9.0,
                char_spacing: 0.0,
                word_spacing: 0.25,
            }
        );
    }

    #[test]
    fn test_paths_and_shadings_skipped() {
        let doc = MemDocument::builder()
            .page(
                MemPageBuilder::new()
                    .content(MemContentBuilder::new(2))
                    .content(MemContentBuilder::new(3))
                    .content(MemContentBuilder::new(4))
                    .content(MemContentBuilder::new(5)),
            )
            .build();
        let content = extract_page_content(&doc, 1).unwrap();
        assert!(matches!(content.data[0], ContentRecord::Image { .. }));
        assert!(matches!(content.data[1], ContentRecord::Form));
        assert_eq!(content.data.len(), 2);
    }

    #[test]
    fn test_serialized_shape() {
        let doc = MemDocument::builder()
            .page(
                MemPageBuilder::new()
                    .content(MemContentBuilder::new(1).text("hi").metrics(12.0, 0.0, 0.0))
                    .content(MemContentBuilder::new(5)),
            )
            .build();
        let json = serde_json::to_value(&extract_page_content(&doc, 1).unwrap()).unwrap();
        let text = &json["data"][0];
        assert_eq!(text["type"], "pds_text");
        assert_eq!(text["textState"]["fontSize"], 12.0);
        assert_eq!(json["data"][1]["type"], "pds_form");
    }
}
