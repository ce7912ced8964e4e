//! Structural dump: the editable geometry of a layout as a flat, serializable list.
//!
//! A [`LayoutDump`] lists every panel in pre-order with its kind, position, scale and size. It is
//! meant to be exported, edited by hand or by another tool, and applied back onto the layout it
//! came from with [`apply_dump`]. Entries are matched to panels by name; the kind is informative
//! only.
//!
//! # Examples
//!
//! ```rust
//! use bclyt::{dump, Layout, Panel, PanelKind, Size, Vector3};
//!
//! let mut layout = Layout::new(Size::new(400.0, 240.0));
//! layout.root_panel = Some(Panel::new("Root", PanelKind::Panel));
//!
//! let mut exported = dump::dump(&layout);
//! exported.panels[0].position = Vector3::new(10.0, 0.0, 0.0);
//!
//! let json = exported.to_json()?;
//! dump::apply_dump(&mut layout, &dump::LayoutDump::from_json(&json)?)?;
//! assert_eq!(layout.find_panel("Root").unwrap().translation.x, 10.0);
//! # Ok::<(), bclyt::Error>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    layout::{Layout, PanelType, Size, Vector2, Vector3},
    Error, Result,
};

/// The dumped geometry of one panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelDump {
    /// Panel name, the key used when applying the dump
    pub name: String,
    /// Panel kind
    pub kind: PanelType,
    /// Translation
    pub position: Vector3,
    /// Scale
    pub scale: Vector2,
    /// Width and height
    pub size: Size,
}

/// The dumped geometry of a whole layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDump {
    /// Canvas size
    pub layout: Size,
    /// Panels in pre-order
    pub panels: Vec<PanelDump>,
}

impl LayoutDump {
    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns [`crate::Error::Error`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON.
    ///
    /// # Errors
    /// Returns [`crate::Error::Error`] if `json` is not a valid dump.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Capture the canvas size and the geometry of every panel.
#[must_use]
pub fn dump(layout: &Layout) -> LayoutDump {
    LayoutDump {
        layout: layout.size,
        panels: layout
            .panels()
            .map(|panel| PanelDump {
                name: panel.name.clone(),
                kind: panel.panel_type(),
                position: panel.translation,
                scale: panel.scale,
                size: panel.size,
            })
            .collect(),
    }
}

/// Write the geometry in `dump` back onto `layout`.
///
/// Every panel of the layout takes the values of the first dump entry with the same name. Entries
/// naming no panel are ignored.
///
/// # Errors
/// Returns [`crate::Error::Reference`] if a panel has no entry in the dump. The layout is not
/// modified in that case.
pub fn apply_dump(layout: &mut Layout, dump: &LayoutDump) -> Result<()> {
    let find = |name: &str| dump.panels.iter().find(|entry| entry.name == name);

    if let Some(missing) = layout.panels().find(|panel| find(&panel.name).is_none()) {
        return Err(Error::Reference(format!(
            "panel '{}' has no entry in the dump",
            missing.name
        )));
    }

    layout.size = dump.layout;
    if let Some(root) = &mut layout.root_panel {
        root.visit_mut(&mut |panel| {
            if let Some(entry) = find(&panel.name) {
                panel.translation = entry.position;
                panel.scale = entry.scale;
                panel.size = entry.size;
            }
        });
    }

    Ok(())
}
