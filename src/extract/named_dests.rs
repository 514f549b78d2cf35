//! Named destination extraction.
//!
//! Walks the document's "Dests" name tree and flattens it into a map from
//! destination name to 1-based page number. Within a node, leaf pairs are
//! consumed before kid subtrees; when the same name occurs more than once,
//! the occurrence visited last overwrites the earlier one while keeping the
//! name's original position in the map.

use indexmap::IndexMap;
use serde::Serialize;

use crate::object::Object;
use crate::provider::DocumentObjects;

/// A resolved named destination.
///
/// Serializes with a snake_case `page_num` key, unlike the camelCase used
/// elsewhere on the wire.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct NamedDestination {
    /// 1-based target page number.
    pub page_num: usize,
}

/// All named destinations of a document, in first-seen order.
pub type NamedDestinations = IndexMap<String, NamedDestination>;

/// Extract every resolvable named destination.
///
/// Names whose destination does not resolve to a page are dropped. A
/// document without a "Dests" name tree yields an empty map.
pub fn extract_named_destinations<D: DocumentObjects>(doc: &D) -> NamedDestinations {
    let mut dests = NamedDestinations::new();
    if let Some(root) = doc.name_tree("Dests") {
        resolve_node(doc, &root, &mut dests);
    }
    dests
}

fn resolve_node<D: DocumentObjects>(doc: &D, node: &Object, dests: &mut NamedDestinations) {
    let Some(dict) = node.as_dict() else {
        return;
    };

    // Leaf pairs first, kid subtrees after, so a name repeated deeper in
    // the tree wins.
    if let Some(names) = dict.get("Names").and_then(Object::as_array) {
        for pair in names.chunks(2) {
            let [key, value] = pair else {
                continue;
            };
            let Some(name) = key.as_str() else {
                continue;
            };
            if let Some(index) = doc.destination_page(value) {
                dests.insert(
                    name.to_string(),
                    NamedDestination {
                        page_num: index + 1,
                    },
                );
            }
        }
    }

    if let Some(kids) = dict.get("Kids").and_then(Object::as_array) {
        for kid in kids {
            resolve_node(doc, kid, dests);
        }
    }
}
