//! Bookmark tree extraction.
//!
//! The outline root is a synthetic container; it never surfaces as a node,
//! only its kids do. Navigation actions are resolved to page numbers where
//! possible and dropped otherwise.

use serde::Serialize;

use crate::provider::{BookmarkActionRef, BookmarkObject, DocumentObjects};

/// One node of the extracted bookmark tree.
#[derive(Debug, Default, Serialize)]
pub struct BookmarkNode {
    /// Bookmark title. Absent on the synthetic root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Resolved navigation action, where one could be resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<BookmarkAction>,
    /// Child bookmarks.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub kids: Vec<BookmarkNode>,
}

/// A resolved bookmark navigation action.
#[derive(Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum BookmarkAction {
    /// Jump to a page of this document. The page number key stays
    /// snake_case on the wire.
    GoTo {
        /// 1-based target page number.
        page_num: usize,
    },
    /// Open an external URI.
    #[serde(rename = "URI")]
    Uri {
        /// Target URI.
        uri: String,
    },
}

/// Extract the document's bookmark tree.
///
/// Returns a titleless container node whose kids are the top-level
/// bookmarks. A document without an outline yields a node with no kids.
pub fn extract_bookmarks<D: DocumentObjects>(doc: &D) -> BookmarkNode {
    let mut root = BookmarkNode::default();
    if let Some(outline) = doc.outline_root() {
        visit_bookmark(doc, &outline, &mut root.kids);
    }
    root
}

enum Placement {
    /// Surface as a node of its own.
    Node,
    /// Splice children directly into the current sibling list.
    Container,
}

fn visit_bookmark<D: DocumentObjects>(
    doc: &D,
    bookmark: &D::Bookmark,
    siblings: &mut Vec<BookmarkNode>,
) {
    let placement = match bookmark.has_parent() {
        Ok(true) => Placement::Node,
        Ok(false) => Placement::Container,
        Err(err) => {
            // An unreadable parent link cannot distinguish the synthetic
            // root from a real bookmark. Treat it as the root so its
            // subtree still surfaces.
            log::warn!("treating bookmark as root, parent link unreadable: {}", err);
            Placement::Container
        }
    };

    match placement {
        Placement::Node => {
            let mut node = BookmarkNode {
                title: Some(bookmark.title()),
                action: bookmark.action().and_then(|action| resolve_action(doc, action)),
                kids: Vec::new(),
            };
            for i in 0..bookmark.child_count() {
                if let Some(child) = bookmark.child(i) {
                    visit_bookmark(doc, &child, &mut node.kids);
                }
            }
            siblings.push(node);
        }
        Placement::Container => {
            for i in 0..bookmark.child_count() {
                if let Some(child) = bookmark.child(i) {
                    visit_bookmark(doc, &child, siblings);
                }
            }
        }
    }
}

fn resolve_action<D: DocumentObjects>(doc: &D, action: BookmarkActionRef) -> Option<BookmarkAction> {
    match action {
        BookmarkActionRef::GoTo(dest) => {
            let index = doc.destination_page(&dest)?;
            Some(BookmarkAction::GoTo {
                page_num: index + 1,
            })
        }
        BookmarkActionRef::Uri(uri) => Some(BookmarkAction::Uri { uri }),
        BookmarkActionRef::Other(kind) => {
            log::debug!("dropping bookmark action of kind {:?}", kind);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Object;
    use crate::provider::memory::{MemBookmarkBuilder, MemDocument, MemPageBuilder};

    fn two_page_doc(outline: MemBookmarkBuilder) -> MemDocument {
        MemDocument::builder()
            .page(MemPageBuilder::new())
            .page(MemPageBuilder::new())
            .outline(outline)
            .build()
    }

    #[test]
    fn test_root_is_elided() {
        let doc = two_page_doc(
            MemBookmarkBuilder::new("")
                .child(MemBookmarkBuilder::new("Intro").goto_page(0))
                .child(
                    MemBookmarkBuilder::new("Chapters")
                        .child(MemBookmarkBuilder::new("One").goto_page(1)),
                ),
        );
        let tree = extract_bookmarks(&doc);
        assert!(tree.title.is_none());
        assert_eq!(tree.kids.len(), 2);
        assert_eq!(tree.kids[0].title.as_deref(), Some("Intro"));
        assert_eq!(tree.kids[0].action, Some(BookmarkAction::GoTo { page_num: 1 }));
        assert_eq!(tree.kids[1].kids[0].title.as_deref(), Some("One"));
        assert_eq!(
            tree.kids[1].kids[0].action,
            Some(BookmarkAction::GoTo { page_num: 2 })
        );
    }

    #[test]
    fn test_uri_and_unresolvable_actions() {
        let doc = two_page_doc(
            MemBookmarkBuilder::new("")
                .child(MemBookmarkBuilder::new("Site").uri("https://example.com"))
                .child(MemBookmarkBuilder::new("Dangling").goto_page(9))
                .child(MemBookmarkBuilder::new("Launch").action(
                    crate::provider::BookmarkActionRef::Other("Launch".to_string()),
                )),
        );
        let tree = extract_bookmarks(&doc);
        assert_eq!(
            tree.kids[0].action,
            Some(BookmarkAction::Uri {
                uri: "https://example.com".to_string()
            })
        );
        // Actions that cannot be resolved vanish; the bookmark stays.
        assert_eq!(tree.kids[1].title.as_deref(), Some("Dangling"));
        assert!(tree.kids[1].action.is_none());
        assert!(tree.kids[2].action.is_none());
    }

    #[test]
    fn test_no_outline() {
        let doc = MemDocument::builder().page(MemPageBuilder::new()).build();
        let tree = extract_bookmarks(&doc);
        assert!(tree.kids.is_empty());
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_serialized_action_shape() {
        let doc = two_page_doc(
            MemBookmarkBuilder::new("")
                .child(MemBookmarkBuilder::new("Intro").goto_page(1))
                .child(MemBookmarkBuilder::new("Site").uri("https://example.com")),
        );
        let json = serde_json::to_value(extract_bookmarks(&doc)).unwrap();
        assert_eq!(
            json["kids"][0]["action"],
            serde_json::json!({ "type": "GoTo", "page_num": 2 })
        );
        assert_eq!(
            json["kids"][1]["action"],
            serde_json::json!({ "type": "URI", "uri": "https://example.com" })
        );
    }

    #[test]
    fn test_broken_parent_link_falls_back_to_root() {
        let doc = two_page_doc(
            MemBookmarkBuilder::new("").child(
                MemBookmarkBuilder::new("Opaque")
                    .broken_parent_link()
                    .child(MemBookmarkBuilder::new("Kept").goto_page(0)),
            ),
        );
        let tree = extract_bookmarks(&doc);
        // The unreadable bookmark is treated as a root: it contributes no
        // node, but its subtree is spliced into its siblings' place.
        assert_eq!(tree.kids.len(), 1);
        assert_eq!(tree.kids[0].title.as_deref(), Some("Kept"));
    }

    #[test]
    fn test_goto_array_destination() {
        let doc = two_page_doc(MemBookmarkBuilder::new("").child(
            MemBookmarkBuilder::new("Fit").action(crate::provider::BookmarkActionRef::GoTo(
                Object::Array(vec![Object::Integer(1), Object::Name("Fit".to_string())]),
            )),
        ));
        let tree = extract_bookmarks(&doc);
        assert_eq!(tree.kids[0].action, Some(BookmarkAction::GoTo { page_num: 2 }));
    }
}
