//! Small value types shared by every layout entity.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, FromRepr};

/// A 2D vector of 32-bit floats (scale, UV coordinates, texture matrix translation).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vector2 {
    /// Create a vector from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A 3D vector of 32-bit floats (panel translation and rotation).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vector3 {
    /// Create a vector from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// A width/height pair of 32-bit floats.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl Size {
    /// Create a size from its components.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Coordinate origin of the whole layout, stored as a `u32` in the `lyt1` section.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
    FromRepr,
    Serialize,
    Deserialize,
)]
#[repr(u32)]
pub enum LayoutOrigin {
    /// Origin at the top-left corner of the canvas
    #[default]
    Classic = 0,
    /// Origin at the center of the canvas
    Normal = 1,
}

/// How a texture is sampled outside the `[0, 1]` coordinate range.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, FromRepr,
)]
#[repr(u8)]
pub enum WrapMode {
    /// Clamp to the edge texel
    #[default]
    Clamp = 0,
    /// Repeat the texture
    Repeat = 1,
    /// Repeat the texture, mirroring every other tile
    Mirror = 2,
}

/// Texture sampling filter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, FromRepr,
)]
#[repr(u8)]
pub enum TextureFilter {
    /// Nearest-neighbour sampling
    #[default]
    Near = 0,
    /// Bilinear sampling
    Linear = 1,
}
