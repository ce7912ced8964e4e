//! Panels: the positioned nodes of the layout tree.
//!
//! Every `pan1`, `wnd1`, `pic1`, `txt1` and `bnd1` section decodes into one [`Panel`]. The shared
//! transform and naming fields live on `Panel` itself, the section-specific payload lives in
//! [`PanelKind`]. A panel owns its children outright; their order is the paint order and the order
//! the encoder emits them in.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::layout::types::{Size, Vector2, Vector3};

/// Width of a panel's fixed name field in bytes.
pub const PANEL_NAME_SIZE: usize = 0x18;

bitflags! {
    /// Visibility and layout behaviour bits of a panel.
    ///
    /// Bits without a named constant are retained as-is so they survive a decode/encode cycle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PanelFlags : u8 {
        /// The panel is drawn
        const VISIBLE = 0x01;
        /// The panel's alpha multiplies into its children
        const INFLUENCED_ALPHA = 0x02;
        /// The panel is repositioned when the screen aspect changes
        const LOCATION_ADJUST = 0x04;
    }
}

bitflags! {
    /// How a panel reacts to magnification of the parts it belongs to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MagnificationFlags : u8 {
        /// Ignore the parts' magnification
        const IGNORE_PARTS_MAGNIFY = 0x01;
        /// Adjust to the bounds of the parts
        const ADJUST_TO_PARTS_BOUNDS = 0x02;
    }
}

/// A node of the panel tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Panel {
    /// Visibility and layout behaviour
    pub flags: PanelFlags,
    /// Anchor point of the panel relative to its position, engine encoded
    pub origin: u8,
    /// Opacity, 0 (transparent) to 255 (opaque)
    pub alpha: u8,
    /// Magnification behaviour
    pub magnification: MagnificationFlags,
    /// Name, at most [`PANEL_NAME_SIZE`] UTF-8 bytes
    pub name: String,
    /// Position relative to the parent
    pub translation: Vector3,
    /// Rotation in degrees around each axis
    pub rotation: Vector3,
    /// Scale factors
    pub scale: Vector2,
    /// Width and height
    pub size: Size,
    /// Raw `usd1` payload attached to this panel
    pub user_data: Option<Vec<u8>>,
    /// Section-specific payload
    pub kind: PanelKind,
    /// Owned children in paint order
    pub children: Vec<Panel>,
}

/// The variant-specific part of a panel, one per section tag.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PanelKind {
    /// A plain container panel (`pan1`)
    #[default]
    Panel,
    /// A window frame (`wnd1`)
    Window(Window),
    /// A textured quad (`pic1`)
    Picture(Picture),
    /// A text box (`txt1`)
    TextSection(TextSection),
    /// An invisible hit/bounds box (`bnd1`)
    Boundary,
}

/// The variant of a [`PanelKind`] without its payload.
///
/// Used wherever only the section type matters: dumps, summaries and tree listings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
pub enum PanelType {
    /// `pan1`
    Panel,
    /// `wnd1`
    Window,
    /// `pic1`
    Picture,
    /// `txt1`
    TextSection,
    /// `bnd1`
    Boundary,
}

impl From<&PanelKind> for PanelType {
    fn from(kind: &PanelKind) -> Self {
        match kind {
            PanelKind::Panel => PanelType::Panel,
            PanelKind::Window(_) => PanelType::Window,
            PanelKind::Picture(_) => PanelType::Picture,
            PanelKind::TextSection(_) => PanelType::TextSection,
            PanelKind::Boundary => PanelType::Boundary,
        }
    }
}

/// Payload of a `wnd1` section.
///
/// The window record after the shared panel fields has not been reverse engineered; it is kept as
/// an opaque blob and written back verbatim.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Window {
    /// Everything after the shared panel fields, section padding included
    pub data: Vec<u8>,
}

/// Packed 32-bit colors for the four corners of a quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VertexColors {
    /// Top-left corner
    pub top_left: u32,
    /// Top-right corner
    pub top_right: u32,
    /// Bottom-left corner
    pub bottom_left: u32,
    /// Bottom-right corner
    pub bottom_right: u32,
}

/// One set of texture coordinates for the four corners of a quad.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TexCoordSet {
    /// Top-left corner
    pub top_left: Vector2,
    /// Top-right corner
    pub top_right: Vector2,
    /// Bottom-left corner
    pub bottom_left: Vector2,
    /// Bottom-right corner
    pub bottom_right: Vector2,
}

/// Payload of a `pic1` section.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Picture {
    /// Corner colors
    pub vertex_colors: VertexColors,
    /// Index into [`crate::Layout::materials`]
    pub material_index: u16,
    /// One entry per texture coordinate generator, may be empty
    pub tex_coords: Vec<TexCoordSet>,
}

/// Payload of a `txt1` section.
///
/// The engine allocates the text buffer once, at the capacity declared in the section. The model
/// stores that capacity as slack on top of the current text, in UTF-16 code units, so that editing
/// the text keeps the original buffer size:
///
/// ```text
/// capacity_bytes = text_byte_len + additional_chars * 2
/// ```
///
/// # Examples
///
/// ```rust
/// use bclyt::TextSection;
///
/// let mut text = TextSection::default();
/// text.set_text("Continue");
/// assert_eq!(text.text_byte_len(), 18);
///
/// // Shorter text keeps the buffer, the difference becomes slack
/// text.set_text("OK");
/// assert_eq!(text.capacity_bytes(), 18);
/// assert_eq!(text.additional_chars, 6);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextSection {
    /// Displayed text, without its null terminator
    pub text: String,
    /// Buffer slack beyond the text, in UTF-16 code units
    pub additional_chars: u16,
    /// Index into [`crate::Layout::materials`]
    pub material_index: u16,
    /// Index into [`crate::Layout::fonts`]
    pub font_index: u16,
    /// Two bytes following the font index, meaning unknown
    pub unknown_bytes: [u8; 2],
    /// Reserved half-word, kept verbatim
    pub reserved: u16,
    /// Two words following the text offset, meaning unknown
    pub unknown_words: [i32; 2],
    /// Vector following the unknown words, meaning unknown
    pub unknown_vector: Vector2,
    /// Two floats closing the fixed record, meaning unknown
    pub unknown_floats: [f32; 2],
}

impl TextSection {
    /// Number of bytes the text occupies on disk: UTF-16 code units plus a null terminator, or
    /// nothing at all for empty text.
    #[must_use]
    pub fn text_byte_len(&self) -> usize {
        if self.text.is_empty() {
            0
        } else {
            (self.text.encode_utf16().count() + 1) * 2
        }
    }

    /// The declared buffer capacity in bytes.
    #[must_use]
    pub fn capacity_bytes(&self) -> usize {
        self.text_byte_len() + usize::from(self.additional_chars) * 2
    }

    /// Replace the text while keeping the buffer capacity.
    ///
    /// If the new text is longer than the current capacity the buffer grows to fit it exactly,
    /// otherwise the capacity is unchanged and the difference becomes slack.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let capacity = self.capacity_bytes();
        self.text = text.into();
        let slack = capacity.saturating_sub(self.text_byte_len()) / 2;
        self.additional_chars = u16::try_from(slack).unwrap_or(u16::MAX);
    }

    /// Derive the slack from a capacity and the text already stored in `self.text`.
    pub(crate) fn set_capacity_bytes(&mut self, capacity: usize) {
        let slack = capacity.saturating_sub(self.text_byte_len()) / 2;
        self.additional_chars = u16::try_from(slack).unwrap_or(u16::MAX);
    }
}

impl Panel {
    /// Create a panel with identity transform, full opacity and the visible flag set.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: PanelKind) -> Self {
        Panel {
            flags: PanelFlags::VISIBLE,
            alpha: 0xFF,
            name: name.into(),
            scale: Vector2::new(1.0, 1.0),
            kind,
            ..Default::default()
        }
    }

    /// The variant of this panel without its payload.
    #[must_use]
    pub fn panel_type(&self) -> PanelType {
        PanelType::from(&self.kind)
    }

    /// Returns the text payload if this is a text panel.
    #[must_use]
    pub fn as_text(&self) -> Option<&TextSection> {
        match &self.kind {
            PanelKind::TextSection(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the mutable text payload if this is a text panel.
    pub fn as_text_mut(&mut self) -> Option<&mut TextSection> {
        match &mut self.kind {
            PanelKind::TextSection(text) => Some(text),
            _ => None,
        }
    }

    /// Iterate over this panel and all of its descendants in pre-order.
    #[must_use]
    pub fn iter(&self) -> PanelIter<'_> {
        PanelIter { stack: vec![self] }
    }

    /// Visit this panel and all of its descendants in pre-order, mutably.
    pub fn visit_mut<F: FnMut(&mut Panel)>(&mut self, visitor: &mut F) {
        visitor(self);
        for child in &mut self.children {
            child.visit_mut(visitor);
        }
    }

    /// Find the first panel named `name` in pre-order.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Panel> {
        self.iter().find(|panel| panel.name == name)
    }

    /// Find the first panel named `name` in pre-order, mutably.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Panel> {
        if self.name == name {
            return Some(self);
        }

        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(name))
    }
}

/// Pre-order iterator over a panel subtree, see [`Panel::iter`].
pub struct PanelIter<'a> {
    stack: Vec<&'a Panel>,
}

impl<'a> Iterator for PanelIter<'a> {
    type Item = &'a Panel;

    fn next(&mut self) -> Option<Self::Item> {
        let panel = self.stack.pop()?;
        self.stack.extend(panel.children.iter().rev());
        Some(panel)
    }
}
