//! # bclyt Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and functions
//! from the bclyt library. Import this module to get quick access to everything needed to load,
//! inspect, edit and write layouts.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all bclyt operations
pub use crate::Error;

/// The result type used throughout bclyt
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Decoded layout, the root of the model
pub use crate::Layout;

/// Low-level input and parsing utilities
pub use crate::{File, Parser};

// ================================================================================================
// Model
// ================================================================================================

/// Panel tree nodes and their payloads
pub use crate::layout::{
    MagnificationFlags, Panel, PanelFlags, PanelKind, PanelType, Picture, TextSection, Window,
};

/// Materials, groups and resource table presence
pub use crate::layout::{
    EmptyTables, Group, Material, MaterialFlags, TextureMapEntry, TextureMatrixEntry,
};

/// Value types
pub use crate::layout::{LayoutOrigin, Size, TextureFilter, Vector2, Vector3, WrapMode};

// ================================================================================================
// Editing Helpers
// ================================================================================================

/// Structural dump
pub use crate::dump::{apply_dump, dump, LayoutDump, PanelDump};

/// String extraction and PO catalogs
pub use crate::text::{extract_strings, inject_strings, Catalog, CatalogEntry, TextEntry};
