//! FILENAME: model/src/band.rs
//! Bands and elements - the layout half of the report definition.
//!
//! A band is a named horizontal region of the report; an element is a
//! positioned static-text or expression-bound cell within a band.

use serde::{Deserialize, Serialize};

// ============================================================================
// BAND KINDS
// ============================================================================

/// The named regions a template may declare.
///
/// The ordering of this enum is the fixed rendering order shared by every
/// output format: title, page header, column header, then per-group
/// header / detail rows / footer (or plain detail rows when no group is
/// declared), column footer, page footer, summary. `LastPageFooter`
/// replaces `PageFooter` when both are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BandKind {
    Title,
    PageHeader,
    ColumnHeader,
    GroupHeader,
    Detail,
    GroupFooter,
    ColumnFooter,
    PageFooter,
    LastPageFooter,
    Summary,
}

impl BandKind {
    /// The template source tag for this band kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            BandKind::Title => "title",
            BandKind::PageHeader => "pageHeader",
            BandKind::ColumnHeader => "columnHeader",
            BandKind::GroupHeader => "groupHeader",
            BandKind::Detail => "detail",
            BandKind::GroupFooter => "groupFooter",
            BandKind::ColumnFooter => "columnFooter",
            BandKind::PageFooter => "pageFooter",
            BandKind::LastPageFooter => "lastPageFooter",
            BandKind::Summary => "summary",
        }
    }

    /// Parses a template source tag into a band kind.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "title" => Some(BandKind::Title),
            "pageHeader" => Some(BandKind::PageHeader),
            "columnHeader" => Some(BandKind::ColumnHeader),
            "groupHeader" => Some(BandKind::GroupHeader),
            "detail" => Some(BandKind::Detail),
            "groupFooter" => Some(BandKind::GroupFooter),
            "columnFooter" => Some(BandKind::ColumnFooter),
            "pageFooter" => Some(BandKind::PageFooter),
            "lastPageFooter" => Some(BandKind::LastPageFooter),
            "summary" => Some(BandKind::Summary),
            _ => None,
        }
    }
}

// ============================================================================
// TEXT STYLING
// ============================================================================

/// Horizontal text alignment within an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justified,
}

impl TextAlign {
    /// Parses the template source attribute value ("Left", "Center", ...).
    pub fn from_attr(attr: &str) -> Self {
        match attr {
            "Center" => TextAlign::Center,
            "Right" => TextAlign::Right,
            "Justified" => TextAlign::Justified,
            _ => TextAlign::Left,
        }
    }
}

/// Font and alignment attributes applied identically by every renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size: u32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            font_size: 10,
            bold: false,
            italic: false,
            underline: false,
            align: TextAlign::Left,
        }
    }
}

// ============================================================================
// ELEMENTS
// ============================================================================

/// The content kind of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementKind {
    /// Literal text rendered verbatim.
    StaticText { content: String },
    /// An expression evaluated against the current render context.
    TextField { expression: String },
}

/// A positioned cell within a band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    /// Horizontal offset within the band, in pixels.
    pub x: u32,
    /// Vertical offset within the band, in pixels.
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub kind: ElementKind,
    pub style: TextStyle,
}

impl Element {
    pub fn static_text(x: u32, y: u32, width: u32, height: u32, content: impl Into<String>) -> Self {
        Element {
            x,
            y,
            width,
            height,
            kind: ElementKind::StaticText { content: content.into() },
            style: TextStyle::default(),
        }
    }

    pub fn text_field(x: u32, y: u32, width: u32, height: u32, expression: impl Into<String>) -> Self {
        Element {
            x,
            y,
            width,
            height,
            kind: ElementKind::TextField { expression: expression.into() },
            style: TextStyle::default(),
        }
    }

    /// The expression string, for text fields.
    pub fn expression(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::TextField { expression } => Some(expression),
            ElementKind::StaticText { .. } => None,
        }
    }

    /// The literal content, for static text.
    pub fn static_content(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::StaticText { content } => Some(content),
            ElementKind::TextField { .. } => None,
        }
    }
}

// ============================================================================
// BANDS
// ============================================================================

/// A named horizontal region of the report layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Band {
    pub kind: BandKind,
    /// Band height in pixels.
    pub height: u32,
    /// Elements in declaration order.
    pub elements: Vec<Element>,
}

impl Band {
    pub fn new(kind: BandKind, height: u32) -> Self {
        Band {
            kind,
            height,
            elements: Vec::new(),
        }
    }

    /// True when the band declares no elements and can be skipped.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The literal contents of the band's static-text elements, in order.
    /// Used by tabular renderers to source header labels.
    pub fn static_texts(&self) -> Vec<&str> {
        self.elements.iter().filter_map(|e| e.static_content()).collect()
    }
}
