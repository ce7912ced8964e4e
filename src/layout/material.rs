//! Materials and the packed flags word that describes their record layout.
//!
//! A material record in `mat1` is a fixed 0x34-byte head (name, seven TEV constant colors, flags)
//! followed by a chain of optional sub-arrays whose presence and length are encoded in the flags
//! word. [`MaterialFlags`] is the decode/encode pair for that word, and also computes where each
//! sub-array starts:
//!
//! ```text
//! +0x00  name                    0x14 bytes
//! +0x14  TEV constant colors     7 x u32
//! +0x30  flags                   u32
//! +0x34  texture map entries     count x 4
//!        texture matrix entries  count x 0x14
//!        texcoord generators     count x 4
//!        TEV stages, alpha compare, blend modes, ...  (not decoded)
//! ```
//!
//! Only the first three sub-arrays are decoded. Whatever follows them is carried through
//! [`UndecodedStages`] as an opaque blob together with the flag bits that describe it.

use crate::{
    layout::types::{TextureFilter, Vector2, WrapMode},
    Result,
};

/// Width of a material's fixed name field in bytes.
pub const MATERIAL_NAME_SIZE: usize = 0x14;
/// Number of TEV constant colors in every material.
pub const TEV_CONSTANT_COLORS: usize = 7;
/// Offset of the first sub-array from the start of a material record.
pub const MATERIAL_HEAD_SIZE: usize = 0x34;
/// Size of one texture map entry.
pub const TEXTURE_MAP_ENTRY_SIZE: usize = 4;
/// Size of one texture matrix entry.
pub const TEXTURE_MATRIX_ENTRY_SIZE: usize = 0x14;
/// Size of one texture coordinate generator entry.
pub const TEXCOORD_GEN_ENTRY_SIZE: usize = 4;

/// One field of the flags word: bit offset and width.
struct BitRange {
    shift: u32,
    width: u32,
}

impl BitRange {
    const fn mask(&self) -> u32 {
        (1 << self.width) - 1
    }

    fn get(&self, bits: u32) -> u32 {
        (bits >> self.shift) & self.mask()
    }

    fn put(&self, bits: &mut u32, value: u32, field: &str) -> Result<()> {
        if value > self.mask() {
            return Err(malformed_error!(
                "Material {} value {} does not fit in {} bits",
                field,
                value,
                self.width
            ));
        }

        *bits |= value << self.shift;
        Ok(())
    }
}

const TEXTURE_MAPS: BitRange = BitRange { shift: 0, width: 2 };
const TEXTURE_MATRICES: BitRange = BitRange { shift: 2, width: 2 };
const TEXCOORD_GENS: BitRange = BitRange { shift: 4, width: 2 };
const TEV_STAGES: BitRange = BitRange { shift: 6, width: 3 };
const ALPHA_COMPARE: BitRange = BitRange { shift: 9, width: 1 };
const BLEND_MODE: BitRange = BitRange { shift: 10, width: 1 };
const TEXTURE_ONLY: BitRange = BitRange { shift: 11, width: 1 };
const SEPARATE_BLEND_MODE: BitRange = BitRange { shift: 12, width: 1 };
const INDIRECT_PARAM: BitRange = BitRange { shift: 13, width: 1 };
const PROJ_TEXGEN_PARAMS: BitRange = BitRange { shift: 14, width: 2 };
const FONT_SHADOW_PARAM: BitRange = BitRange { shift: 16, width: 1 };
const UNKNOWN_HIGH: BitRange = BitRange { shift: 17, width: 15 };

/// The unpacked material flags word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaterialFlags {
    /// Number of texture map entries (bits 0-1)
    pub texture_maps: u8,
    /// Number of texture matrix entries (bits 2-3)
    pub texture_matrices: u8,
    /// Number of texture coordinate generators (bits 4-5)
    pub texcoord_gens: u8,
    /// Number of TEV stages (bits 6-8)
    pub tev_stages: u8,
    /// An alpha compare record is present (bit 9)
    pub alpha_compare: bool,
    /// Blend mode records are present (bit 10)
    pub blend_mode: bool,
    /// Only the texture is used for color (bit 11)
    pub use_texture_only: bool,
    /// Color and alpha blend separately (bit 12)
    pub separate_blend_mode: bool,
    /// An indirect parameter record is present (bit 13)
    pub indirect_param: bool,
    /// Number of projection texgen parameters (bits 14-15)
    pub proj_texgen_params: u8,
    /// A font shadow parameter record is present (bit 16)
    pub font_shadow_param: bool,
    /// Bits 17-31, meaning unknown
    pub unknown_high: u16,
}

impl MaterialFlags {
    /// Unpack a flags word.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_bits(bits: u32) -> Self {
        MaterialFlags {
            texture_maps: TEXTURE_MAPS.get(bits) as u8,
            texture_matrices: TEXTURE_MATRICES.get(bits) as u8,
            texcoord_gens: TEXCOORD_GENS.get(bits) as u8,
            tev_stages: TEV_STAGES.get(bits) as u8,
            alpha_compare: ALPHA_COMPARE.get(bits) == 1,
            blend_mode: BLEND_MODE.get(bits) == 1,
            use_texture_only: TEXTURE_ONLY.get(bits) == 1,
            separate_blend_mode: SEPARATE_BLEND_MODE.get(bits) == 1,
            indirect_param: INDIRECT_PARAM.get(bits) == 1,
            proj_texgen_params: PROJ_TEXGEN_PARAMS.get(bits) as u8,
            font_shadow_param: FONT_SHADOW_PARAM.get(bits) == 1,
            unknown_high: UNKNOWN_HIGH.get(bits) as u16,
        }
    }

    /// Pack into a flags word.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if a count exceeds the width of its bit range.
    pub fn to_bits(&self) -> Result<u32> {
        let mut bits = 0;
        TEXTURE_MAPS.put(&mut bits, u32::from(self.texture_maps), "texture map count")?;
        TEXTURE_MATRICES.put(
            &mut bits,
            u32::from(self.texture_matrices),
            "texture matrix count",
        )?;
        TEXCOORD_GENS.put(&mut bits, u32::from(self.texcoord_gens), "texcoord gen count")?;
        TEV_STAGES.put(&mut bits, u32::from(self.tev_stages), "TEV stage count")?;
        ALPHA_COMPARE.put(&mut bits, u32::from(self.alpha_compare), "alpha compare")?;
        BLEND_MODE.put(&mut bits, u32::from(self.blend_mode), "blend mode")?;
        TEXTURE_ONLY.put(&mut bits, u32::from(self.use_texture_only), "texture only")?;
        SEPARATE_BLEND_MODE.put(
            &mut bits,
            u32::from(self.separate_blend_mode),
            "separate blend mode",
        )?;
        INDIRECT_PARAM.put(&mut bits, u32::from(self.indirect_param), "indirect param")?;
        PROJ_TEXGEN_PARAMS.put(
            &mut bits,
            u32::from(self.proj_texgen_params),
            "projection texgen count",
        )?;
        FONT_SHADOW_PARAM.put(
            &mut bits,
            u32::from(self.font_shadow_param),
            "font shadow param",
        )?;
        UNKNOWN_HIGH.put(&mut bits, u32::from(self.unknown_high), "high bits")?;
        Ok(bits)
    }

    /// Flags describing `material` as it is now: counts come from the actual list lengths, the
    /// undecoded bits from [`Material::undecoded`].
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if a list is longer than its count field can express.
    pub fn for_material(material: &Material) -> Result<Self> {
        let count = |len: usize, field: &str| {
            u8::try_from(len)
                .map_err(|_| malformed_error!("Material '{}' has {} {}", material.name, len, field))
        };

        Ok(MaterialFlags {
            texture_maps: count(material.texture_maps.len(), "texture maps")?,
            texture_matrices: count(material.texture_matrices.len(), "texture matrices")?,
            texcoord_gens: count(material.texcoord_gens.len(), "texcoord generators")?,
            tev_stages: material.undecoded.tev_stages,
            alpha_compare: material.undecoded.alpha_compare,
            blend_mode: material.undecoded.blend_mode,
            use_texture_only: material.use_texture_only,
            separate_blend_mode: material.undecoded.separate_blend_mode,
            indirect_param: material.undecoded.indirect_param,
            proj_texgen_params: material.undecoded.proj_texgen_params,
            font_shadow_param: material.undecoded.font_shadow_param,
            unknown_high: material.undecoded.unknown_high,
        })
    }

    /// Offset of the texture map entries from the record start.
    #[must_use]
    pub fn texture_map_offset(&self) -> usize {
        MATERIAL_HEAD_SIZE
    }

    /// Offset of the texture matrix entries from the record start.
    #[must_use]
    pub fn texture_matrix_offset(&self) -> usize {
        self.texture_map_offset() + usize::from(self.texture_maps) * TEXTURE_MAP_ENTRY_SIZE
    }

    /// Offset of the texture coordinate generators from the record start.
    #[must_use]
    pub fn texcoord_gen_offset(&self) -> usize {
        self.texture_matrix_offset()
            + usize::from(self.texture_matrices) * TEXTURE_MATRIX_ENTRY_SIZE
    }

    /// Offset of the first byte this crate does not decode (the TEV stages) from the record start.
    #[must_use]
    pub fn undecoded_offset(&self) -> usize {
        self.texcoord_gen_offset() + usize::from(self.texcoord_gens) * TEXCOORD_GEN_ENTRY_SIZE
    }
}

/// A texture reference with its sampling state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextureMapEntry {
    /// Index into [`crate::Layout::textures`]
    pub texture_index: u16,
    /// Horizontal wrap mode
    pub wrap_s: WrapMode,
    /// Vertical wrap mode
    pub wrap_t: WrapMode,
    /// Minification filter
    pub min_filter: TextureFilter,
    /// Magnification filter
    pub mag_filter: TextureFilter,
}

/// A 2D texture coordinate transform.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextureMatrixEntry {
    /// Translation
    pub translation: Vector2,
    /// Rotation in degrees
    pub rotation: f32,
    /// Scale
    pub scale: Vector2,
}

/// The part of a material record this crate does not interpret.
///
/// Holds the flag bits describing the TEV stage, alpha compare, blend mode, indirect, projection
/// and font shadow records, and the raw bytes of those records. Both are written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UndecodedStages {
    /// Number of TEV stages
    pub tev_stages: u8,
    /// An alpha compare record is present
    pub alpha_compare: bool,
    /// Blend mode records are present
    pub blend_mode: bool,
    /// Color and alpha blend separately
    pub separate_blend_mode: bool,
    /// An indirect parameter record is present
    pub indirect_param: bool,
    /// Number of projection texgen parameters
    pub proj_texgen_params: u8,
    /// A font shadow parameter record is present
    pub font_shadow_param: bool,
    /// Flag bits 17-31
    pub unknown_high: u16,
    /// Raw bytes from the end of the texcoord generators to the end of the record
    pub data: Vec<u8>,
}

impl UndecodedStages {
    /// Split the undecoded flag bits off `flags`, pairing them with the raw record bytes.
    #[must_use]
    pub fn from_flags(flags: &MaterialFlags, data: Vec<u8>) -> Self {
        UndecodedStages {
            tev_stages: flags.tev_stages,
            alpha_compare: flags.alpha_compare,
            blend_mode: flags.blend_mode,
            separate_blend_mode: flags.separate_blend_mode,
            indirect_param: flags.indirect_param,
            proj_texgen_params: flags.proj_texgen_params,
            font_shadow_param: flags.font_shadow_param,
            unknown_high: flags.unknown_high,
            data,
        }
    }
}

/// A rendering-state record referenced by index from pictures and text boxes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Material {
    /// Name, at most [`MATERIAL_NAME_SIZE`] UTF-8 bytes
    pub name: String,
    /// TEV constant colors as stored on disk
    // TODO: expose these as RGBA once the channel order is confirmed against a renderer
    pub tev_constant_colors: [u32; TEV_CONSTANT_COLORS],
    /// Only the texture contributes to the color
    pub use_texture_only: bool,
    /// Up to three texture references
    pub texture_maps: Vec<TextureMapEntry>,
    /// Up to three texture coordinate transforms
    pub texture_matrices: Vec<TextureMatrixEntry>,
    /// Up to three texture coordinate generators
    pub texcoord_gens: Vec<f32>,
    /// Records after the texcoord generators, kept verbatim
    pub undecoded: UndecodedStages,
}
