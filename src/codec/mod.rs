//! The CLYT binary codec.
//!
//! A CLYT stream is a 0x14-byte header followed by a flat run of sections:
//!
//! ```text
//! header   "CLYT" | u16 BOM 0xFEFF | u16 header size 0x14 | u32 version | u32 total size | u32 count
//! section  [u8; 4] tag | u32 length (header included) | payload, padded to 4 bytes
//! ```
//!
//! Nesting is not encoded in the records themselves. Payload-less marker sections (`pas1`/`pae1`
//! for panels, `grs1`/`gre1` for groups) open and close the children of the node emitted right
//! before them. The [`decoder`] rebuilds the trees with a [`cursor::TreeCursor`], the [`encoder`]
//! emits the markers while walking the model depth-first.

pub mod cursor;
pub mod decoder;
pub mod encoder;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// File magic.
pub const MAGIC: [u8; 4] = *b"CLYT";
/// Byte order mark, as read little-endian.
pub const BYTE_ORDER_MARK: u16 = 0xFEFF;
/// Size of the container header.
pub const HEADER_SIZE: u16 = 0x14;
/// The only supported container version, 2.2.0.0.
pub const VERSION: u32 = 0x0202_0000;
/// Size of a section's tag and length fields.
pub const SECTION_HEADER_SIZE: usize = 8;
/// Size of the fields every panel section starts with.
pub const PANEL_RECORD_SIZE: usize = 0x44;
/// Offset of the text from the start of a `txt1` section, as written by the encoder.
pub const TEXT_OFFSET: u32 = 0x74;
/// Section payload alignment.
pub const SECTION_ALIGNMENT: usize = 4;

/// Header field offsets patched after all sections are written.
pub(crate) const HEADER_TOTAL_SIZE_OFFSET: usize = 0x0C;
pub(crate) const HEADER_SECTION_COUNT_OFFSET: usize = 0x10;

/// A known section tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
pub enum SectionTag {
    /// Layout definition: origin and canvas size
    #[strum(serialize = "lyt1")]
    Layout,
    /// Texture name table
    #[strum(serialize = "txl1")]
    TextureList,
    /// Font name table
    #[strum(serialize = "fnl1")]
    FontList,
    /// Material table
    #[strum(serialize = "mat1")]
    Materials,
    /// Plain panel
    #[strum(serialize = "pan1")]
    Panel,
    /// Window panel
    #[strum(serialize = "wnd1")]
    Window,
    /// Picture panel
    #[strum(serialize = "pic1")]
    Picture,
    /// Text panel
    #[strum(serialize = "txt1")]
    Text,
    /// Boundary panel
    #[strum(serialize = "bnd1")]
    Boundary,
    /// User data for the most recently emitted node
    #[strum(serialize = "usd1")]
    UserData,
    /// Opens the children of the last panel
    #[strum(serialize = "pas1")]
    PanelStart,
    /// Closes the current panel children
    #[strum(serialize = "pae1")]
    PanelEnd,
    /// Group
    #[strum(serialize = "grp1")]
    Group,
    /// Opens the children of the last group
    #[strum(serialize = "grs1")]
    GroupStart,
    /// Closes the current group children
    #[strum(serialize = "gre1")]
    GroupEnd,
}

impl SectionTag {
    /// Look up the tag for 4 raw bytes. Returns `None` for tags this crate does not know.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 4]) -> Option<Self> {
        std::str::from_utf8(&bytes).ok()?.parse().ok()
    }

    /// Where the section sits in a stream: `lyt1`, the texture, font and material tables, the panel
    /// tree, the group tree. Sections never go back to a lower rank.
    pub(crate) fn rank(self) -> u8 {
        match self {
            SectionTag::Layout => 0,
            SectionTag::TextureList => 1,
            SectionTag::FontList => 2,
            SectionTag::Materials => 3,
            SectionTag::Panel
            | SectionTag::Window
            | SectionTag::Picture
            | SectionTag::Text
            | SectionTag::Boundary
            | SectionTag::UserData
            | SectionTag::PanelStart
            | SectionTag::PanelEnd => 4,
            SectionTag::Group | SectionTag::GroupStart | SectionTag::GroupEnd => 5,
        }
    }

    /// True for the tags that produce a [`crate::Panel`].
    pub(crate) fn is_panel(self) -> bool {
        matches!(
            self,
            SectionTag::Panel
                | SectionTag::Window
                | SectionTag::Picture
                | SectionTag::Text
                | SectionTag::Boundary
        )
    }

    /// The 4 bytes written for this tag.
    #[must_use]
    pub fn as_bytes(self) -> [u8; 4] {
        let name: &'static str = self.into();
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(name.as_bytes());
        bytes
    }
}

/// Printable form of a raw tag for messages.
pub(crate) fn tag_name(bytes: [u8; 4]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() {
                char::from(b).to_string()
            } else {
                format!("\\x{b:02x}")
            }
        })
        .collect()
}
