//! Translatable strings: extraction from and injection into text panels.
//!
//! Text panels are keyed by their panel name. [`extract_strings`] collects the text of every
//! non-empty text panel, [`inject_strings`] writes edited text back through
//! [`crate::TextSection::set_text`], so the engine's buffer capacity is never reduced. The
//! [`po`] module converts between these entries and gettext PO catalogs for translation tools.
//!
//! # Examples
//!
//! ```rust
//! use bclyt::{text::{extract_strings, inject_strings, TextEntry}, Layout, Panel, PanelKind, Size, TextSection};
//!
//! let mut layout = Layout::new(Size::new(400.0, 240.0));
//! let mut title = TextSection::default();
//! title.set_text("Start");
//! layout.root_panel = Some(Panel::new("T_Title", PanelKind::TextSection(title)));
//!
//! let mut entries = extract_strings(&layout);
//! assert_eq!(entries[0].text, "Start");
//!
//! entries[0].text = "Comenzar".to_string();
//! assert_eq!(inject_strings(&mut layout, &entries)?, 1);
//! # Ok::<(), bclyt::Error>(())
//! ```

pub mod po;

use serde::{Deserialize, Serialize};

use crate::{layout::Layout, Error, Result};

pub use po::{Catalog, CatalogEntry};

/// The text of one text panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEntry {
    /// Name of the text panel
    pub panel: String,
    /// Its text
    pub text: String,
}

/// Collect the text of every text panel with non-empty text, in pre-order.
#[must_use]
pub fn extract_strings(layout: &Layout) -> Vec<TextEntry> {
    layout
        .panels()
        .filter_map(|panel| {
            let text = panel.as_text()?;
            (!text.text.is_empty()).then(|| TextEntry {
                panel: panel.name.clone(),
                text: text.text.clone(),
            })
        })
        .collect()
}

/// Replace the text of the text panels named in `entries`.
///
/// Every text panel takes the text of the first entry with its name; panels without an entry keep
/// their text. Returns the number of text panels updated.
///
/// # Errors
/// Returns [`crate::Error::Reference`] if an entry names no text panel. The layout is not modified
/// in that case.
pub fn inject_strings(layout: &mut Layout, entries: &[TextEntry]) -> Result<usize> {
    for entry in entries {
        let resolved = layout
            .panels()
            .any(|panel| panel.name == entry.panel && panel.as_text().is_some());
        if !resolved {
            return Err(Error::Reference(format!(
                "no text panel named '{}'",
                entry.panel
            )));
        }
    }

    let mut updated = 0;
    if let Some(root) = &mut layout.root_panel {
        root.visit_mut(&mut |panel| {
            let Some(entry) = entries.iter().find(|entry| entry.panel == panel.name) else {
                return;
            };
            if let Some(text) = panel.as_text_mut() {
                text.set_text(entry.text.as_str());
                updated += 1;
            }
        });
    }

    log::debug!("Injected {} of {} strings", updated, entries.len());
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::sample_layout;

    #[test]
    fn extract_skips_empty_and_non_text() {
        let mut layout = sample_layout();
        let entries = extract_strings(&layout);
        assert_eq!(
            entries,
            [TextEntry {
                panel: "T_Title".to_string(),
                text: "Hello".to_string(),
            }]
        );

        layout
            .find_panel_mut("T_Title")
            .and_then(|p| p.as_text_mut())
            .unwrap()
            .set_text("");
        assert!(extract_strings(&layout).is_empty());
    }

    #[test]
    fn inject_keeps_capacity() {
        let mut layout = sample_layout();
        let before = layout
            .find_panel("T_Title")
            .and_then(|p| p.as_text())
            .unwrap()
            .capacity_bytes();

        let entries = [TextEntry {
            panel: "T_Title".to_string(),
            text: "Hi".to_string(),
        }];
        assert_eq!(inject_strings(&mut layout, &entries).unwrap(), 1);

        let title = layout.find_panel("T_Title").and_then(|p| p.as_text()).unwrap();
        assert_eq!(title.text, "Hi");
        assert_eq!(title.capacity_bytes(), before);

        let longer = [TextEntry {
            panel: "T_Title".to_string(),
            text: "Welcome back, traveller".to_string(),
        }];
        inject_strings(&mut layout, &longer).unwrap();
        let title = layout.find_panel("T_Title").and_then(|p| p.as_text()).unwrap();
        assert!(title.capacity_bytes() >= title.text_byte_len());
        assert!(title.capacity_bytes() > before);
    }

    #[test]
    fn unresolved_entry_is_rejected() {
        let mut layout = sample_layout();
        let entries = [
            TextEntry {
                panel: "T_Title".to_string(),
                text: "Changed".to_string(),
            },
            TextEntry {
                panel: "P_Icon".to_string(),
                text: "Not a text panel".to_string(),
            },
        ];

        match inject_strings(&mut layout, &entries) {
            Err(Error::Reference(message)) => assert!(message.contains("P_Icon")),
            other => panic!("expected reference error, got {other:?}"),
        }
        assert_eq!(layout, sample_layout());
    }
}
