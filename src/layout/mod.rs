//! The in-memory layout model.
//!
//! A [`Layout`] is what the decoder produces and the encoder consumes: canvas definition, the
//! material, texture and font tables, and two independent trees. The panel tree is owned through
//! [`Layout::root_panel`], each [`Panel`] owning its children. The group tree hangs off
//! [`Layout::root_group`] and refers to panels by name.
//!
//! The model is a plain value. Nothing in it points back to a parent or into the source buffer, so
//! it can be edited freely between [`Layout::decode`] and [`Layout::encode`].
//!
//! # Examples
//!
//! ```rust
//! use bclyt::{Layout, Panel, PanelKind, Size};
//!
//! let mut layout = Layout::new(Size::new(400.0, 240.0));
//! layout.root_panel = Some(Panel::new("Root", PanelKind::Panel));
//!
//! let bytes = layout.encode()?;
//! let decoded = Layout::from_mem(bytes)?;
//! assert_eq!(decoded.find_panel("Root").unwrap().name, "Root");
//! # Ok::<(), bclyt::Error>(())
//! ```

pub mod group;
pub mod material;
pub mod panel;
pub mod types;

use std::path::Path;

use bitflags::bitflags;

use crate::{
    codec::{decoder, encoder},
    file::File,
    Error, Result,
};

pub use group::Group;
pub use material::{Material, MaterialFlags, TextureMapEntry, TextureMatrixEntry, UndecodedStages};
pub use panel::{
    MagnificationFlags, Panel, PanelFlags, PanelIter, PanelKind, PanelType, Picture, TexCoordSet,
    TextSection, VertexColors, Window,
};
pub use types::{LayoutOrigin, Size, TextureFilter, Vector2, Vector3, WrapMode};

bitflags! {
    /// Resource tables that are present in the stream but hold no entries.
    ///
    /// The encoder leaves out an empty table unless its bit is set here, so a decoded stream with
    /// a zero-count `txl1`, `fnl1` or `mat1` is written back with that section in place. The bit
    /// has no effect once the matching list is non-empty.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EmptyTables : u8 {
        /// A `txl1` with no texture names
        const TEXTURES = 0x01;
        /// A `fnl1` with no font names
        const FONTS = 0x02;
        /// A `mat1` with no materials
        const MATERIALS = 0x04;
    }
}

/// A decoded CLYT layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    /// Coordinate origin of the canvas
    pub origin: LayoutOrigin,
    /// Nominal canvas size
    pub size: Size,
    /// Materials, referenced by index from pictures and text boxes
    pub materials: Vec<Material>,
    /// Texture file names, referenced by index from texture maps
    pub textures: Vec<String>,
    /// Font file names, referenced by index from text boxes
    pub fonts: Vec<String>,
    /// Root of the panel tree
    pub root_panel: Option<Panel>,
    /// Root of the group tree
    pub root_group: Option<Group>,
    /// Empty resource tables to emit anyway
    pub empty_tables: EmptyTables,
}

impl Layout {
    /// Create an empty layout with the given canvas size.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Layout {
            size,
            ..Default::default()
        }
    }

    /// Load and decode a layout from disk. The file is memory-mapped for the duration of the
    /// decode.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be read, [`crate::Error::Empty`] for
    /// an empty file, or any decode error.
    pub fn from_file(file: &Path) -> Result<Self> {
        let input = File::from_file(file)?;
        Self::decode(input.data())
    }

    /// Decode a layout from an owned buffer.
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] for an empty buffer, or any decode error.
    pub fn from_mem(data: Vec<u8>) -> Result<Self> {
        let input = File::from_mem(data)?;
        Self::decode(input.data())
    }

    /// Decode a layout from a byte slice.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`], [`crate::Error::UnsupportedVersion`],
    /// [`crate::Error::Structural`] or [`crate::Error::OutOfBounds`] depending on what is wrong
    /// with the stream. No partially decoded layout is ever returned.
    pub fn decode(data: &[u8]) -> Result<Self> {
        decoder::decode(data)
    }

    /// Encode the layout into a CLYT stream.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if a name does not fit its fixed-width field or a count
    /// does not fit its on-disk field.
    pub fn encode(&self) -> Result<Vec<u8>> {
        encoder::encode(self)
    }

    /// Encode the layout and write it to `path`.
    ///
    /// # Errors
    /// Returns any encode error, or [`crate::Error::FileError`] if the file cannot be written.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let data = self.encode()?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Iterate over all panels in pre-order. Empty if the layout has no root panel.
    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.root_panel.iter().flat_map(Panel::iter)
    }

    /// Find the first panel named `name` in pre-order.
    #[must_use]
    pub fn find_panel(&self, name: &str) -> Option<&Panel> {
        self.root_panel.as_ref()?.find(name)
    }

    /// Find the first panel named `name` in pre-order, mutably.
    pub fn find_panel_mut(&mut self, name: &str) -> Option<&mut Panel> {
        self.root_panel.as_mut()?.find_mut(name)
    }

    /// Iterate over all groups in pre-order. Empty if the layout has no root group.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.root_group.iter().flat_map(Group::iter)
    }

    /// Resolve the panel names of `group` against the panel tree.
    ///
    /// # Errors
    /// Returns [`crate::Error::Reference`] naming the first member with no matching panel.
    pub fn group_panels(&self, group: &Group) -> Result<Vec<&Panel>> {
        group
            .panels
            .iter()
            .map(|name| {
                self.find_panel(name).ok_or_else(|| {
                    Error::Reference(format!(
                        "group '{}' references unknown panel '{}'",
                        group.name, name
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::sample_layout;

    #[test]
    fn panels_in_preorder() {
        let layout = sample_layout();
        let names: Vec<&str> = layout.panels().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["RootPane", "N_Header", "T_Title", "P_Icon", "W_Frame", "B_Touch"]
        );
        assert_eq!(Layout::default().panels().count(), 0);
    }

    #[test]
    fn group_resolution() {
        let layout = sample_layout();
        let group = layout.groups().find(|g| g.name == "G_Header").unwrap();
        let panels = layout.group_panels(group).unwrap();
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0].name, "T_Title");

        let broken = Group {
            name: "G_Broken".to_string(),
            panels: vec!["T_Title".to_string(), "N_Missing".to_string()],
            children: Vec::new(),
        };
        match layout.group_panels(&broken) {
            Err(Error::Reference(message)) => assert!(message.contains("N_Missing")),
            other => panic!("expected reference error, got {other:?}"),
        }
    }

    #[test]
    fn write_to_file_and_reload() {
        let layout = sample_layout();
        let temp = tempfile::NamedTempFile::new().unwrap();
        layout.write_to_file(temp.path()).unwrap();

        let reloaded = Layout::from_file(temp.path()).unwrap();
        assert_eq!(reloaded, layout);
    }
}
