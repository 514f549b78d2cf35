//! Structural page map extraction.
//!
//! Walks a page's tagged structure and emits it as a nested node tree. Text
//! blocks get a dedicated expansion: their lines and words become child
//! nodes with counters the generic recursion does not carry (line numbers,
//! per-line word indexes, and a word position running across the whole
//! block).

use serde::Serialize;

use crate::error::Result;
use crate::geometry::PdfRect;
use crate::kinds::ElementKind;
use crate::provider::{DocumentObjects, PageObjects, StructElement};

/// One node of an extracted page map.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode {
    /// Stable element identifier.
    pub id: i64,
    /// Element kind tag, e.g. `pde_text`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Identifier of the enclosing element. Text lines and words only;
    /// generic children do not carry it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    /// 0-based line number within a text block. Lines only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_num: Option<usize>,
    /// 0-based word position within its line. Words only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// 0-based word position within the whole text block. Words only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_index: Option<usize>,
    /// Number of lines in a text block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_lines: Option<usize>,
    /// Number of words in a text block or line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_words: Option<usize>,
    /// Bounding box in document space.
    pub bbox: PdfRect,
    /// Text content, where the element carries any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Child nodes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub kids: Vec<ElementNode>,
}

/// Extracted page map for one page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMapResponse {
    /// 1-based page number the map was extracted from.
    pub page_number: usize,
    /// Root of the map, or `None` when the page has no structure.
    pub data: Option<ElementNode>,
}

/// Extract the structural map of the page with the given 1-based number.
///
/// A page without structure yields `data: None`. Raises only when
/// `page_number` is out of range.
pub fn extract_page_map<D: DocumentObjects>(doc: &D, page_number: usize) -> Result<PageMapResponse> {
    let index = crate::page_index(page_number, doc.page_count())?;
    let page = doc.acquire_page(index)?;
    let data = page.structure_root().map(|root| visit_element(&root));
    Ok(PageMapResponse { page_number, data })
}

fn visit_element<E: StructElement>(element: &E) -> ElementNode {
    let kind = ElementKind::from_code(element.kind_code());
    let mut node = ElementNode {
        id: element.id(),
        kind: kind.tag(),
        bbox: element.bbox(),
        ..ElementNode::default()
    };
    if kind == ElementKind::Text {
        node.text = element.text();
        node.num_lines = Some(element.line_count());
        node.num_words = Some(element.word_count());
        node.kids = collect_text_lines(element);
    }
    for i in 0..element.child_count() {
        if let Some(child) = element.child(i) {
            node.kids.push(visit_element(&child));
        }
    }
    node
}

fn collect_text_lines<E: StructElement>(block: &E) -> Vec<ElementNode> {
    let mut lines = Vec::with_capacity(block.line_count());
    // Word position within the block keeps running across lines.
    let mut parent_index = 0usize;
    for line_num in 0..block.line_count() {
        let Some(line) = block.line(line_num) else {
            continue;
        };
        let mut line_node = ElementNode {
            id: line.id(),
            kind: ElementKind::TextLine.tag(),
            parent_id: Some(block.id()),
            line_num: Some(line_num),
            num_words: Some(line.word_count()),
            bbox: line.bbox(),
            text: line.text(),
            ..ElementNode::default()
        };
        for index in 0..line.word_count() {
            if let Some(word) = line.word(index) {
                line_node.kids.push(ElementNode {
                    id: word.id(),
                    kind: ElementKind::Word.tag(),
                    parent_id: Some(line.id()),
                    index: Some(index),
                    parent_index: Some(parent_index),
                    bbox: word.bbox(),
                    text: word.text(),
                    ..ElementNode::default()
                });
                parent_index += 1;
            }
        }
        lines.push(line_node);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::memory::{MemDocument, MemElementBuilder, MemPageBuilder};

    fn text_block() -> MemElementBuilder {
        MemElementBuilder::new(10, 1)
            .text("Hello world")
            .line(
                MemElementBuilder::new(11, 2)
                    .text("Hello world")
                    .word(MemElementBuilder::new(12, 3).text("Hello"))
                    .word(MemElementBuilder::new(13, 3).text("world")),
            )
    }

    #[test]
    fn test_text_block_expansion() {
        let doc = MemDocument::builder()
            .page(MemPageBuilder::new().structure(
                MemElementBuilder::new(1, 6).child(text_block()),
            ))
            .build();

        let map = extract_page_map(&doc, 1).unwrap();
        assert_eq!(map.page_number, 1);
        let root = map.data.unwrap();
        assert_eq!(root.kind, "pde_container");
        assert!(root.parent_id.is_none());

        let block = &root.kids[0];
        assert_eq!(block.kind, "pde_text");
        // Generic children carry no parent link.
        assert!(block.parent_id.is_none());
        assert_eq!(block.text.as_deref(), Some("Hello world"));
        assert_eq!(block.num_lines, Some(1));
        assert_eq!(block.num_words, Some(2));

        let line = &block.kids[0];
        assert_eq!(line.kind, "pde_text_line");
        assert_eq!(line.parent_id, Some(10));
        assert_eq!(line.line_num, Some(0));
        assert_eq!(line.num_words, Some(2));
        assert_eq!(line.kids[0].parent_id, Some(11));

        let words: Vec<_> = line.kids.iter().map(|w| w.text.as_deref()).collect();
        assert_eq!(words, [Some("Hello"), Some("world")]);
        assert_eq!(line.kids[0].index, Some(0));
        assert_eq!(line.kids[1].index, Some(1));
    }

    #[test]
    fn test_parent_index_runs_across_lines() {
        let block = MemElementBuilder::new(20, 1)
            .text("one two three")
            .line(
                MemElementBuilder::new(21, 2)
                    .word(MemElementBuilder::new(22, 3).text("one"))
                    .word(MemElementBuilder::new(23, 3).text("two")),
            )
            .line(
                MemElementBuilder::new(24, 2)
                    .word(MemElementBuilder::new(25, 3).text("three")),
            );
        let doc = MemDocument::builder()
            .page(MemPageBuilder::new().structure(block))
            .build();

        let map = extract_page_map(&doc, 1).unwrap();
        let block = map.data.unwrap();
        assert_eq!(block.num_words, Some(3));
        // Second line's word continues the block-wide counter.
        assert_eq!(block.kids[0].kids[1].parent_index, Some(1));
        assert_eq!(block.kids[1].kids[0].parent_index, Some(2));
        assert_eq!(block.kids[1].kids[0].index, Some(0));
    }

    #[test]
    fn test_page_without_structure() {
        let doc = MemDocument::builder().page(MemPageBuilder::new()).build();
        let map = extract_page_map(&doc, 1).unwrap();
        assert!(map.data.is_none());
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["data"], serde_json::Value::Null);
        assert_eq!(json["pageNumber"], 1);
    }

    #[test]
    fn test_page_number_out_of_range() {
        let doc = MemDocument::builder().page(MemPageBuilder::new()).build();
        assert!(extract_page_map(&doc, 0).is_err());
        assert!(extract_page_map(&doc, 2).is_err());
        assert_eq!(doc.acquired_pages(), 0);
    }

    #[test]
    fn test_serialized_shape() {
        let doc = MemDocument::builder()
            .page(
                MemPageBuilder::new().structure(
                    MemElementBuilder::new(1, 6)
                        .child(MemElementBuilder::new(2, 5)),
                ),
            )
            .build();
        let json = serde_json::to_value(&extract_page_map(&doc, 1).unwrap()).unwrap();
        let root = &json["data"];
        assert_eq!(root["type"], "pde_container");
        // Optional counters stay absent outside text expansion, and so
        // does the parent link.
        assert!(root.get("numLines").is_none());
        let image = &root["kids"][0];
        assert_eq!(image["type"], "pde_image");
        assert!(image.get("parentId").is_none());
        assert!(image.get("kids").is_none());
    }
}
