//! Redaction mark lifecycle.
//!
//! Marks are redaction annotations carrying styling in their dictionary.
//! Creating or restyling a mark happens inside a change bracket keyed on
//! the inner-color property, so the backend regenerates the mark's
//! appearance when the bracket closes. Applying redaction burns every mark
//! into the page content and is irreversible.
//!
//! Each operation returns a typed result; the JSON request boundary in
//! [`handle_request`] collapses failures to a boolean after logging them.
//! Every operation takes the document by exclusive borrow, including the
//! ones whose writes go through page handles.

use std::fmt::Write as _;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{DevRect, PageView, Rotation};
use crate::provider::{AnnotationObject, ChangeScope, DocumentObjects, PageObjects};

/// Annotation subtype tag of a redaction mark.
pub const REDACT_SUBTYPE: &str = "Redact";

/// Dictionary key whose change bracket triggers appearance regeneration.
pub const APPEARANCE_KEY: &str = "IC";

/// An RGB color parsed from a hex string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RgbColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl RgbColor {
    /// Channels normalized to the 0..=1 range.
    pub fn components(&self) -> [f64; 3] {
        [
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        ]
    }
}

impl FromStr for RgbColor {
    type Err = Error;

    /// Parse `#rgb` or `#rrggbb`, with or without the leading `#`.
    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !hex.is_ascii() {
            return Err(Error::InvalidColor(s.to_string()));
        }
        let expanded;
        let hex = match hex.len() {
            3 => {
                expanded = hex.chars().flat_map(|c| [c, c]).collect::<String>();
                expanded.as_str()
            }
            6 => hex,
            _ => return Err(Error::InvalidColor(s.to_string())),
        };
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| Error::InvalidColor(s.to_string()))
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl<'de> Deserialize<'de> for RgbColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Horizontal alignment of a mark's overlay text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayAlignment {
    /// Left aligned.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Right aligned.
    Right,
}

impl OverlayAlignment {
    /// Quadding value stored in the mark dictionary.
    pub fn quadding(self) -> i32 {
        match self {
            Self::Left => 0,
            Self::Center => 1,
            Self::Right => 2,
        }
    }
}

fn default_font_size() -> f64 {
    12.0
}

/// Styling of one redaction mark.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkStyle {
    /// Outline color of the editable mark.
    pub redaction_mark_outline_color: RgbColor,
    /// Fill color of the editable mark.
    pub redaction_mark_fill_color: RgbColor,
    /// Fill color of the area after redaction is applied.
    pub redacted_area_fill_color: RgbColor,
    /// Text drawn over the redacted area.
    #[serde(default)]
    pub overlay_text: String,
    /// Overlay text color.
    #[serde(default)]
    pub overlay_text_font_color: RgbColor,
    /// Overlay text size in points.
    #[serde(default = "default_font_size")]
    pub overlay_text_font_size: f64,
    /// Overlay text alignment.
    #[serde(default)]
    pub overlay_text_alignment: OverlayAlignment,
    /// Whether the overlay text repeats to fill the area.
    #[serde(default)]
    pub repeat_overlay_text: bool,
    /// Whether overlay text is enabled at all.
    #[serde(default)]
    pub use_overlay_text: bool,
}

impl MarkStyle {
    /// Default-appearance string for the overlay text, in content-stream
    /// operator syntax with a Helvetica face.
    pub fn appearance_string(&self) -> String {
        let [r, g, b] = self.overlay_text_font_color.components();
        let mut da = String::new();
        let _ = write!(da, "{} {} {} RG {} {} {} rg", r, g, b, r, g, b);
        let _ = write!(
            da,
            " 0 Tc 0 Tw 100 Tz 0 TL 0 Ts 0 Tr /Helv {} Tf",
            self.overlay_text_font_size
        );
        da
    }
}

/// One rectangle of a page selection, in device space.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionEntry {
    /// Existing mark identifier. Present on update entries, absent on
    /// create entries.
    #[serde(default)]
    pub name: Option<String>,
    /// Left edge in device space.
    #[serde(default)]
    pub left: f64,
    /// Top edge in device space.
    #[serde(default)]
    pub top: f64,
    /// Width in device space.
    #[serde(default)]
    pub width: f64,
    /// Height in device space.
    #[serde(default)]
    pub height: f64,
    /// Mark styling.
    pub data: MarkStyle,
}

/// Selection entries grouped by page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSelection {
    /// 1-based page number.
    pub page_number: usize,
    /// Entries on this page.
    #[serde(default)]
    pub kids: Vec<SelectionEntry>,
}

/// A redaction operation name, as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RedactionQuery {
    /// Create marks from a selection.
    CreateRedactionMarks,
    /// Restyle existing marks named in a selection.
    UpdateRedactionMark,
    /// Remove marks by identifier from one page.
    RemoveRedactionMarks,
    /// Burn all marks into the document.
    ApplyRedaction,
}

/// A parsed redaction request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactionRequest {
    /// Requested operation.
    pub query: RedactionQuery,
    /// Page selections, for create and update.
    #[serde(default)]
    pub selection: Vec<PageSelection>,
    /// Mark identifiers, for remove.
    #[serde(default)]
    pub indexes: Vec<i64>,
    /// 1-based page number, for remove.
    #[serde(default)]
    pub page_number: Option<usize>,
}

impl RedactionRequest {
    /// Parse a request from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Outcome of a redaction request, mirrored back with the operation name.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct RedactionResponse {
    /// The operation that ran.
    pub query: RedactionQuery,
    /// Whether it succeeded.
    pub result: bool,
}

/// Dispatch a redaction request, collapsing any failure to `result: false`
/// after logging it.
pub fn handle_request<D: DocumentObjects>(
    doc: &mut D,
    request: &RedactionRequest,
) -> RedactionResponse {
    let outcome = match request.query {
        RedactionQuery::CreateRedactionMarks => create_redaction_marks(doc, &request.selection),
        RedactionQuery::UpdateRedactionMark => update_redaction_mark(doc, &request.selection),
        RedactionQuery::RemoveRedactionMarks => request
            .page_number
            .ok_or(Error::MissingField("pageNumber"))
            .and_then(|page_number| remove_redaction_marks(doc, page_number, &request.indexes)),
        RedactionQuery::ApplyRedaction => apply_redaction(doc).map(|_| ()),
    };
    let result = match outcome {
        Ok(()) => true,
        Err(err) => {
            log::error!("{:?} failed: {}", request.query, err);
            false
        }
    };
    RedactionResponse {
        query: request.query,
        result,
    }
}

/// Create one redaction mark per unnamed selection entry.
///
/// Entry rectangles are given in device space at zoom 1 with no rotation;
/// an all-zero rectangle selects the whole page.
pub fn create_redaction_marks<D: DocumentObjects>(
    doc: &mut D,
    selection: &[PageSelection],
) -> Result<()> {
    for page_selection in selection {
        let index = crate::page_index(page_selection.page_number, doc.page_count())?;
        let mut page = doc.acquire_page(index)?;
        let view = PageView::new(page.crop_box(), 1.0, Rotation::None)?;

        for entry in &page_selection.kids {
            if entry.name.is_some() {
                continue;
            }
            let dev_rect = DevRect::from_origin_size(entry.left, entry.top, entry.width, entry.height);
            let rect = view.rect_to_page(&dev_rect);
            let mut annot = page.add_annotation(REDACT_SUBTYPE, rect)?;
            write_mark_properties(&mut annot, &entry.data, OverlayWrite::WhenPresent);
        }
    }
    Ok(())
}

/// Restyle the marks named by selection entries.
///
/// Entry names carry the target mark identifier. Entries without a name,
/// names that are not identifiers, and identifiers matching no redaction
/// mark are skipped.
pub fn update_redaction_mark<D: DocumentObjects>(
    doc: &mut D,
    selection: &[PageSelection],
) -> Result<()> {
    for page_selection in selection {
        let index = crate::page_index(page_selection.page_number, doc.page_count())?;
        let page = doc.acquire_page(index)?;

        for entry in &page_selection.kids {
            let Some(name) = &entry.name else {
                continue;
            };
            let Ok(target) = name.parse::<i64>() else {
                log::warn!("mark name {:?} is not an identifier, skipping", name);
                continue;
            };
            for i in 0..page.annotation_count() {
                let Some(mut annot) = page.annotation(i) else {
                    continue;
                };
                if annot.subtype() != REDACT_SUBTYPE || annot.id() != target {
                    continue;
                }
                write_mark_properties(&mut annot, &entry.data, OverlayWrite::Managed);
            }
        }
    }
    Ok(())
}

/// Remove the redaction marks with the given identifiers from one page.
/// Identifiers matching no mark are ignored.
pub fn remove_redaction_marks<D: DocumentObjects>(
    doc: &mut D,
    page_number: usize,
    ids: &[i64],
) -> Result<()> {
    let index = crate::page_index(page_number, doc.page_count())?;
    let mut page = doc.acquire_page(index)?;

    let mut doomed = Vec::new();
    for i in 0..page.annotation_count() {
        if let Some(annot) = page.annotation(i) {
            if annot.subtype() == REDACT_SUBTYPE && ids.contains(&annot.id()) {
                doomed.push(i);
            }
        }
    }
    // Remove back to front so earlier indexes stay valid.
    for i in doomed.into_iter().rev() {
        page.remove_annotation(i)?;
    }
    Ok(())
}

/// Burn every redaction mark into the document and serialize the result.
pub fn apply_redaction<D: DocumentObjects>(doc: &mut D) -> Result<Vec<u8>> {
    doc.apply_redaction()?;
    doc.save_to_bytes()
}

/// When to write the overlay-text keys.
enum OverlayWrite {
    /// Write them whenever overlay text is present. Used on create, where
    /// the mark dictionary starts empty.
    WhenPresent,
    /// Honor the enable flag, and blank the stored overlay text when it is
    /// off or empty. Used on update, where stale text must not survive.
    Managed,
}

fn write_mark_properties<A: AnnotationObject>(annot: &mut A, style: &MarkStyle, mode: OverlayWrite) {
    let mut annot = ChangeScope::begin(annot, APPEARANCE_KEY);

    annot.put_number_array("OC", &style.redaction_mark_outline_color.components());
    annot.put_number_array("AFC", &style.redaction_mark_fill_color.components());
    annot.put_number_array(APPEARANCE_KEY, &style.redacted_area_fill_color.components());

    let overlay_enabled = match mode {
        OverlayWrite::WhenPresent => true,
        OverlayWrite::Managed => style.use_overlay_text,
    };
    if overlay_enabled && !style.overlay_text.is_empty() {
        annot.put_string("DA", &style.appearance_string());
        annot.put_string("OverlayText", &style.overlay_text);
        annot.put_number("Q", f64::from(style.overlay_text_alignment.quadding()));
        if style.repeat_overlay_text {
            annot.put_bool("Repeat", true);
        }
    } else if matches!(mode, OverlayWrite::Managed) {
        annot.put_string("OverlayText", "");
    }
    // Dropping the scope closes the bracket and regenerates the appearance.
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parsing() {
        assert_eq!("#000000".parse::<RgbColor>().unwrap(), RgbColor::default());
        assert_eq!(
            "ff8000".parse::<RgbColor>().unwrap(),
            RgbColor { r: 255, g: 128, b: 0 }
        );
        assert_eq!(
            "#f80".parse::<RgbColor>().unwrap(),
            RgbColor { r: 255, g: 136, b: 0 }
        );
        assert!("#12345".parse::<RgbColor>().is_err());
        assert!("zzzzzz".parse::<RgbColor>().is_err());
        assert!("#ééé".parse::<RgbColor>().is_err());
    }

    #[test]
    fn test_color_components() {
        let [r, g, b] = RgbColor { r: 255, g: 0, b: 51 }.components();
        assert_eq!(r, 1.0);
        assert_eq!(g, 0.0);
        assert_eq!(b, 0.2);
    }

    #[test]
    fn test_appearance_string() {
        let style: MarkStyle = serde_json::from_value(serde_json::json!({
            "redactionMarkOutlineColor": "#ff0000",
            "redactionMarkFillColor": "#ffffff",
            "redactedAreaFillColor": "#000000",
            "overlayText": "CLASSIFIED",
            "overlayTextFontColor": "#ffffff",
            "overlayTextFontSize": 10,
        }))
        .unwrap();
        assert_eq!(
            style.appearance_string(),
            "1 1 1 RG 1 1 1 rg 0 Tc 0 Tw 100 Tz 0 TL 0 Ts 0 Tr /Helv 10 Tf"
        );
    }

    #[test]
    fn test_style_defaults() {
        let style: MarkStyle = serde_json::from_value(serde_json::json!({
            "redactionMarkOutlineColor": "#ff0000",
            "redactionMarkFillColor": "#ffffff",
            "redactedAreaFillColor": "#000000",
        }))
        .unwrap();
        assert_eq!(style.overlay_text, "");
        assert_eq!(style.overlay_text_font_size, 12.0);
        assert_eq!(style.overlay_text_alignment, OverlayAlignment::Left);
        assert!(!style.repeat_overlay_text);
        assert!(!style.use_overlay_text);
    }

    #[test]
    fn test_alignment_quadding() {
        assert_eq!(OverlayAlignment::Left.quadding(), 0);
        assert_eq!(OverlayAlignment::Center.quadding(), 1);
        assert_eq!(OverlayAlignment::Right.quadding(), 2);
        let parsed: OverlayAlignment = serde_json::from_str("\"center\"").unwrap();
        assert_eq!(parsed, OverlayAlignment::Center);
    }

    #[test]
    fn test_request_parsing() {
        let request = RedactionRequest::from_json(
            r##"{
                "query": "createRedactionMarks",
                "selection": [{
                    "pageNumber": 1,
                    "kids": [{
                        "left": 31, "top": 31, "width": 151, "height": 71,
                        "data": {
                            "redactionMarkOutlineColor": "#ff0000",
                            "redactionMarkFillColor": "#ffffff",
                            "redactedAreaFillColor": "#000000"
                        }
                    }]
                }]
            }"##,
        )
        .unwrap();
        assert_eq!(request.query, RedactionQuery::CreateRedactionMarks);
        assert_eq!(request.selection[0].page_number, 1);
        assert_eq!(request.selection[0].kids[0].width, 151.0);
        assert!(request.selection[0].kids[0].name.is_none());

        assert!(RedactionRequest::from_json("{\"query\": \"explode\"}").is_err());
    }
}
