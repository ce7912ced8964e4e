// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # bclyt
//!
//! Reading, editing and writing CLYT (`.bclyt`) layout files, the UI layout format of the
//! Nintendo 3DS `Layout` library.
//!
//! A CLYT file is a flat list of tagged sections. Panels and groups are stored one section each,
//! and their nesting is expressed with separate start/end marker sections. Materials, texture
//! names and font names sit in tables addressed through offset lists. `bclyt` turns all of this
//! into a plain owned tree, lets you edit it, and writes it back with every size, count and offset
//! recomputed.
//!
//! ## Features
//!
//! - **Lossless round trip** - decoding and re-encoding an unmodified file reproduces it byte for
//!   byte, including material records and window data this crate does not interpret
//! - **Owned tree model** - [`Layout`] owns its [`Panel`] tree outright, no lifetimes or parent
//!   pointers to manage
//! - **Strict validation** - header, section bounds, marker balance and trailing data are all
//!   checked, failures are typed [`Error`]s
//! - **Memory-mapped input** - files are mapped rather than read for decoding
//! - **Editing helpers** - a JSON structural dump ([`dump`]) and gettext PO string catalogs
//!   ([`text`]) for translation workflows
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bclyt::prelude::*;
//! use std::path::Path;
//!
//! let mut layout = Layout::from_file(Path::new("menu.bclyt"))?;
//! println!("{} x {}", layout.size.width, layout.size.height);
//!
//! for panel in layout.panels() {
//!     println!("{} ({})", panel.name, panel.panel_type());
//! }
//!
//! if let Some(title) = layout.find_panel_mut("T_Title").and_then(Panel::as_text_mut) {
//!     title.set_text("New title");
//! }
//!
//! layout.write_to_file(Path::new("menu_edited.bclyt"))?;
//! # Ok::<(), bclyt::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`layout`] - the model: [`Layout`], [`Panel`] and its kinds, [`Material`], [`Group`]
//! - [`codec`] - the decoder and encoder, section tags and the tree cursor
//! - [`dump`] - structural dump of panel geometry
//! - [`text`] - string extraction, injection and PO catalogs
//! - [`Error`] and [`Result`] - error handling
//!
//! ## Error Handling
//!
//! ```rust
//! use bclyt::{Error, Layout};
//!
//! match Layout::from_mem(vec![0u8; 8]) {
//!     Ok(_) => println!("decoded"),
//!     Err(Error::UnsupportedVersion(version)) => println!("version {version:#x}"),
//!     Err(Error::Malformed { message, .. }) => println!("malformed: {message}"),
//!     Err(e) => println!("other error: {e}"),
//! }
//! ```
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade. Unknown sections, which are
//! skipped rather than rejected, are reported at `warn` level, per-section tracing at `debug`.
//!
//! ## Fuzzing
//!
//! ```bash
//! cargo +nightly fuzz run decode --release
//! ```
#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust,no_run
/// use bclyt::prelude::*;
///
/// let layout = Layout::from_file("menu.bclyt".as_ref())?;
/// let texts = extract_strings(&layout);
/// # Ok::<(), bclyt::Error>(())
/// ```
pub mod prelude;

/// The CLYT binary codec
///
/// Decoding and encoding normally go through [`Layout::decode`] and [`Layout::encode`]; this
/// module exposes the pieces underneath: the section tags and container constants, and the
/// [`codec::cursor::TreeCursor`] that rebuilds trees from marker sections.
pub mod codec;

/// The layout model
///
/// # Key Types
///
/// - [`Layout`] - canvas definition, resource tables, panel and group trees
/// - [`Panel`], [`PanelKind`] - tree nodes and their type-specific payloads
/// - [`TextSection`] - text boxes with their buffer capacity
/// - [`Material`], [`MaterialFlags`] - materials and their packed flags word
/// - [`Group`] - named panel selections
pub mod layout;

pub mod dump;
pub mod text;

/// `bclyt` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always
/// [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

pub use error::Error;

pub use layout::{
    EmptyTables, Group, Layout, LayoutOrigin, MagnificationFlags, Material, MaterialFlags, Panel,
    PanelFlags, PanelKind, PanelType, Picture, Size, TexCoordSet, TextSection, TextureFilter,
    TextureMapEntry, TextureMatrixEntry, UndecodedStages, Vector2, Vector3, VertexColors, Window,
    WrapMode,
};

pub use file::{parser::Parser, File};
