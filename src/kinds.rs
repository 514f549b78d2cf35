//! Closed kind registries for the document object graph.
//!
//! The underlying engine reports element, content-object, and form-field
//! kinds as small integer codes. Each registry here is a total mapping from
//! those codes to a closed enum with a stable string tag; codes outside the
//! known range map to the unknown kind rather than failing, so a newer engine
//! never breaks extraction.

use bitflags::bitflags;
use serde::Serialize;

/// Structural role of a page element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Unknown element
    Unknown,
    /// Text block
    Text,
    /// Line of text inside a text block
    TextLine,
    /// Word inside a text line
    Word,
    /// Text run (never produced by the tree extractor)
    TextRun,
    /// Image
    Image,
    /// Generic container
    Container,
    /// List
    List,
    /// Line graphic
    Line,
    /// Rectangle graphic
    Rect,
    /// Table
    Table,
    /// Table cell
    Cell,
    /// Table of contents
    Toc,
    /// Form field
    FormField,
    /// Page header
    Header,
    /// Page footer
    Footer,
    /// Annotation
    Annot,
}

impl ElementKind {
    /// Map an engine kind code to an element kind. Total: unmapped codes
    /// yield [`ElementKind::Unknown`].
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Text,
            2 => Self::TextLine,
            3 => Self::Word,
            4 => Self::TextRun,
            5 => Self::Image,
            6 => Self::Container,
            7 => Self::List,
            8 => Self::Line,
            9 => Self::Rect,
            10 => Self::Table,
            11 => Self::Cell,
            12 => Self::Toc,
            13 => Self::FormField,
            14 => Self::Header,
            15 => Self::Footer,
            16 => Self::Annot,
            _ => Self::Unknown,
        }
    }

    /// Stable string tag used in extracted output.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Text => "pde_text",
            Self::TextLine => "pde_text_line",
            Self::Word => "pde_word",
            Self::TextRun => "pde_text_run",
            Self::Image => "pde_image",
            Self::Container => "pde_container",
            Self::List => "pde_list",
            Self::Line => "pde_line",
            Self::Rect => "pde_rect",
            Self::Table => "pde_table",
            Self::Cell => "pde_cell",
            Self::Toc => "pde_toc",
            Self::FormField => "pde_form_field",
            Self::Header => "pde_header",
            Self::Footer => "pde_footer",
            Self::Annot => "pde_annot",
        }
    }
}

/// Kind of a page content object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Unknown object
    Unknown,
    /// Text object
    Text,
    /// Path object
    Path,
    /// Image object
    Image,
    /// Shading object
    Shading,
    /// Form XObject
    Form,
}

impl ContentKind {
    /// Map an engine kind code to a content kind. Total: unmapped codes
    /// yield [`ContentKind::Unknown`].
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Text,
            2 => Self::Path,
            3 => Self::Image,
            4 => Self::Shading,
            5 => Self::Form,
            _ => Self::Unknown,
        }
    }

    /// Stable string tag used in extracted output.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Text => "pds_text",
            Self::Path => "pds_path",
            Self::Image => "pds_image",
            Self::Shading => "pds_shading",
            Self::Form => "pds_form",
        }
    }
}

/// Kind of an interactive form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Unknown field
    Unknown,
    /// Push button
    Button,
    /// Radio button group
    Radio,
    /// Check box
    Checkbox,
    /// Text input
    Text,
    /// Combo box
    Dropdown,
    /// List box
    List,
    /// Signature field
    Signature,
}

impl FieldKind {
    /// Map an engine kind code to a field kind. Total: unmapped codes yield
    /// [`FieldKind::Unknown`].
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Button,
            2 => Self::Radio,
            3 => Self::Checkbox,
            4 => Self::Text,
            5 => Self::Dropdown,
            6 => Self::List,
            7 => Self::Signature,
            _ => Self::Unknown,
        }
    }

    /// Stable string tag used in extracted output.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Button => "button",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Text => "text",
            Self::Dropdown => "dropdown",
            Self::List => "list",
            Self::Signature => "signature",
        }
    }
}

bitflags! {
    /// Form field flag word, per the common field-flag bit assignments.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FieldFlags: u32 {
        /// Bit 1: field is read-only; user cannot change the value
        const READ_ONLY = 1 << 0;

        /// Bit 2: field is required; must have a value before submit
        const REQUIRED = 1 << 1;

        /// Bit 13: text may include multiple lines
        const MULTILINE = 1 << 12;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_kind_codes_are_total() {
        assert_eq!(ElementKind::from_code(1), ElementKind::Text);
        assert_eq!(ElementKind::from_code(16), ElementKind::Annot);
        assert_eq!(ElementKind::from_code(0), ElementKind::Unknown);
        assert_eq!(ElementKind::from_code(99), ElementKind::Unknown);
        assert_eq!(ElementKind::from_code(-1), ElementKind::Unknown);
    }

    #[test]
    fn test_element_tags() {
        assert_eq!(ElementKind::Text.tag(), "pde_text");
        assert_eq!(ElementKind::TextLine.tag(), "pde_text_line");
        assert_eq!(ElementKind::Word.tag(), "pde_word");
        assert_eq!(ElementKind::Unknown.tag(), "unknown");
    }

    #[test]
    fn test_content_kind_codes() {
        assert_eq!(ContentKind::from_code(1), ContentKind::Text);
        assert_eq!(ContentKind::from_code(5), ContentKind::Form);
        assert_eq!(ContentKind::from_code(42), ContentKind::Unknown);
        assert_eq!(ContentKind::Image.tag(), "pds_image");
    }

    #[test]
    fn test_field_kind_codes() {
        assert_eq!(FieldKind::from_code(4), FieldKind::Text);
        assert_eq!(FieldKind::from_code(7), FieldKind::Signature);
        assert_eq!(FieldKind::from_code(8), FieldKind::Unknown);
        assert_eq!(FieldKind::Dropdown.tag(), "dropdown");
    }

    #[test]
    fn test_field_kind_serializes_as_tag() {
        let json = serde_json::to_string(&FieldKind::Checkbox).unwrap();
        assert_eq!(json, "\"checkbox\"");
    }

    #[test]
    fn test_field_flags() {
        let flags = FieldFlags::REQUIRED | FieldFlags::MULTILINE;
        assert!(flags.contains(FieldFlags::REQUIRED));
        assert!(!flags.contains(FieldFlags::READ_ONLY));
        assert_eq!(flags.bits(), 2 | 4096);
    }
}
