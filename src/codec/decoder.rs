//! CLYT stream to [`Layout`].
//!
//! The header is validated first, then each declared section is cut out of the stream and handed
//! to its handler as a [`Parser`] over exactly that section, positioned after the tag and length.
//! Handlers therefore address offsets relative to the section start, which is what every offset
//! field in the format is relative to, and cannot read into the following section. After a handler
//! returns, the outer parser jumps to the declared section end whatever the handler consumed.
//!
//! Only streams the encoder reproduces byte for byte are accepted. Known sections must be 4-byte
//! aligned and fixed-shape payloads may only be followed by zero padding. Offset tables must be
//! laid out contiguously. Resource tables appear at most once. Fixed-width names and text records
//! must be terminated and padded the one way the encoder writes them.

use crate::{
    codec::{
        cursor::TreeCursor, tag_name, SectionTag, BYTE_ORDER_MARK, HEADER_SIZE, MAGIC,
        SECTION_ALIGNMENT, SECTION_HEADER_SIZE, TEXT_OFFSET, VERSION,
    },
    file::parser::Parser,
    layout::{
        group::GROUP_NAME_SIZE,
        material::{
            MaterialFlags, TextureMapEntry, TextureMatrixEntry, UndecodedStages,
            MATERIAL_NAME_SIZE, TEV_CONSTANT_COLORS,
        },
        panel::PANEL_NAME_SIZE,
        EmptyTables, Group, Layout, LayoutOrigin, MagnificationFlags, Material, Panel, PanelFlags,
        PanelKind, Picture, Size, TexCoordSet, TextSection, TextureFilter, Vector2, Vector3,
        VertexColors, Window, WrapMode,
    },
    Error, Result,
};

/// Decode a complete CLYT stream.
///
/// # Errors
/// See [`Layout::decode`].
pub fn decode(data: &[u8]) -> Result<Layout> {
    let mut parser = Parser::new(data);
    let section_count = read_header(&mut parser)?;

    let mut decoder = Decoder::new();
    for index in 0..section_count {
        let start = parser.pos();
        if parser.len() - start < SECTION_HEADER_SIZE {
            return Err(malformed_error!(
                "Header declares {} sections, stream ends after {} at offset {:#x}",
                section_count,
                index,
                start
            ));
        }

        let tag = parser.read_tag()?;
        let length = parser.read_le::<u32>()? as usize;
        let Some(end) = start.checked_add(length) else {
            return Err(out_of_bounds_error!());
        };
        if length < SECTION_HEADER_SIZE || end > data.len() {
            return Err(malformed_error!(
                "Section '{}' at offset {:#x} declares invalid length {:#x}",
                tag_name(tag),
                start,
                length
            ));
        }

        match SectionTag::from_bytes(tag) {
            Some(known) => {
                log::debug!("{known} section at {start:#x}, {length:#x} bytes");
                if length % SECTION_ALIGNMENT != 0 {
                    return Err(malformed_error!(
                        "Section '{}' at offset {:#x} has unaligned length {:#x}",
                        known,
                        start,
                        length
                    ));
                }

                let mut section = Parser::new(&data[start..end]);
                section.seek(SECTION_HEADER_SIZE)?;
                decoder.section(known, &mut section, start)?;
            }
            None => log::warn!(
                "Skipping unknown section '{}' at offset {:#x} ({:#x} bytes)",
                tag_name(tag),
                start,
                length
            ),
        }

        parser.seek(end)?;
    }

    if parser.has_more_data() {
        return Err(malformed_error!(
            "{} bytes after the {} declared sections, section count does not match the stream",
            parser.len() - parser.pos(),
            section_count
        ));
    }

    decoder.finish()
}

/// Validate the container header and return the declared section count.
fn read_header(parser: &mut Parser) -> Result<u32> {
    if parser.len() < usize::from(HEADER_SIZE) {
        return Err(malformed_error!(
            "Stream of {} bytes is too short for a CLYT header",
            parser.len()
        ));
    }

    let magic = parser.read_tag()?;
    if magic != MAGIC {
        return Err(malformed_error!(
            "Invalid magic '{}', expected 'CLYT'",
            tag_name(magic)
        ));
    }

    let bom = parser.read_le::<u16>()?;
    if bom != BYTE_ORDER_MARK {
        return Err(malformed_error!(
            "Unexpected endianness marker {:#06x}",
            bom
        ));
    }

    let header_size = parser.read_le::<u16>()?;
    if header_size != HEADER_SIZE {
        return Err(malformed_error!(
            "Unexpected header size {:#x}, expected {:#x}",
            header_size,
            HEADER_SIZE
        ));
    }

    let version = parser.read_le::<u32>()?;
    if version != VERSION {
        return Err(Error::UnsupportedVersion(version));
    }

    let total_size = parser.read_le::<u32>()? as usize;
    if total_size != parser.len() {
        return Err(malformed_error!(
            "Size mismatch: header declares {:#x} bytes, stream has {:#x}",
            total_size,
            parser.len()
        ));
    }

    parser.read_le::<u32>()
}

/// Accumulated state while walking the sections.
struct Decoder {
    layout: Layout,
    panels: TreeCursor<Panel>,
    groups: TreeCursor<Group>,
    tables: Vec<SectionTag>,
    previous: Option<SectionTag>,
}

impl Decoder {
    fn new() -> Self {
        Decoder {
            layout: Layout::default(),
            panels: TreeCursor::new("panel"),
            groups: TreeCursor::new("group"),
            tables: Vec::new(),
            previous: None,
        }
    }

    /// Sections come in the order the encoder writes them, starting with `lyt1`.
    fn check_order(&self, tag: SectionTag, start: usize) -> Result<()> {
        match self.previous {
            None if tag != SectionTag::Layout => Err(malformed_error!(
                "First section at offset {:#x} is {}, expected lyt1",
                start,
                tag
            )),
            Some(previous) if tag.rank() < previous.rank() => Err(malformed_error!(
                "{} section at offset {:#x} follows {}",
                tag,
                start,
                previous
            )),
            Some(previous) if tag == SectionTag::UserData && !previous.is_panel() => {
                Err(malformed_error!(
                    "usd1 section at offset {:#x} follows {} instead of a panel",
                    start,
                    previous
                ))
            }
            _ => Ok(()),
        }
    }

    /// `lyt1` and the resource tables may appear once each.
    fn first_of(&mut self, tag: SectionTag, start: usize) -> Result<()> {
        if self.tables.contains(&tag) {
            return Err(malformed_error!(
                "Second {} section at offset {:#x}",
                tag,
                start
            ));
        }
        self.tables.push(tag);
        Ok(())
    }

    fn section(&mut self, tag: SectionTag, section: &mut Parser, start: usize) -> Result<()> {
        self.check_order(tag, start)?;
        self.previous = Some(tag);

        match tag {
            SectionTag::Layout => {
                self.first_of(tag, start)?;
                let origin = section.read_le::<u32>()?;
                self.layout.origin = LayoutOrigin::from_repr(origin).ok_or_else(|| {
                    malformed_error!("Unknown layout origin {} at offset {:#x}", origin, start)
                })?;
                self.layout.size = Size::new(section.read_le()?, section.read_le()?);
            }
            SectionTag::TextureList => {
                self.first_of(tag, start)?;
                self.layout.textures = read_name_table(section, tag, start)?;
                self.layout
                    .empty_tables
                    .set(EmptyTables::TEXTURES, self.layout.textures.is_empty());
            }
            SectionTag::FontList => {
                self.first_of(tag, start)?;
                self.layout.fonts = read_name_table(section, tag, start)?;
                self.layout
                    .empty_tables
                    .set(EmptyTables::FONTS, self.layout.fonts.is_empty());
            }
            SectionTag::Materials => {
                self.first_of(tag, start)?;
                self.layout.materials = read_materials(section, start)?;
                self.layout
                    .empty_tables
                    .set(EmptyTables::MATERIALS, self.layout.materials.is_empty());
            }
            SectionTag::Panel => {
                let panel = read_panel(section, PanelKind::Panel)?;
                self.panels.append(panel, start)?;
            }
            SectionTag::Boundary => {
                let panel = read_panel(section, PanelKind::Boundary)?;
                self.panels.append(panel, start)?;
            }
            SectionTag::Window => {
                let mut panel = read_panel(section, PanelKind::Panel)?;
                let data = section.read_bytes(section.len() - section.pos())?.to_vec();
                panel.kind = PanelKind::Window(Window { data });
                self.panels.append(panel, start)?;
            }
            SectionTag::Picture => {
                let mut panel = read_panel(section, PanelKind::Panel)?;
                panel.kind = PanelKind::Picture(read_picture(section)?);
                self.panels.append(panel, start)?;
            }
            SectionTag::Text => {
                let mut panel = read_panel(section, PanelKind::Panel)?;
                panel.kind = PanelKind::TextSection(read_text(section, start)?);
                self.panels.append(panel, start)?;
            }
            SectionTag::UserData => {
                let data = section.read_bytes(section.len() - section.pos())?.to_vec();
                self.panels.last_appended_mut(start)?.user_data = Some(data);
            }
            SectionTag::PanelStart => self.panels.start(start)?,
            SectionTag::PanelEnd => self.panels.end(start)?,
            SectionTag::Group => {
                let group = read_group(section)?;
                self.groups.append(group, start)?;
            }
            SectionTag::GroupStart => self.groups.start(start)?,
            SectionTag::GroupEnd => self.groups.end(start)?,
        }

        expect_padding(section, tag, start)
    }

    fn finish(self) -> Result<Layout> {
        if self.previous.is_none() {
            return Err(malformed_error!("Stream has no lyt1 section"));
        }

        let mut layout = self.layout;
        layout.root_panel = self.panels.finish()?;
        layout.root_group = self.groups.finish()?;
        Ok(layout)
    }
}

/// `txl1` / `fnl1`: a count, then offsets relative to the first offset slot, each pointing at a
/// null-terminated name. The names follow the table back to back, in table order.
fn read_name_table(section: &mut Parser, tag: SectionTag, start: usize) -> Result<Vec<String>> {
    let count = section.read_le::<u32>()?;
    let base = section.pos();

    let mut offsets = Vec::new();
    for _ in 0..count {
        offsets.push(section.read_le::<u32>()? as usize);
    }

    let mut names = Vec::with_capacity(offsets.len());
    for (index, offset) in offsets.into_iter().enumerate() {
        let expected = section.pos() - base;
        if offset != expected {
            return Err(malformed_error!(
                "{} entry {} in section at offset {:#x} points to {:#x}, expected {:#x}",
                tag,
                index,
                start,
                offset,
                expected
            ));
        }
        names.push(section.read_cstring()?);
    }

    Ok(names)
}

/// `mat1`: a count, then offsets relative to the section start, one per material record.
///
/// The first record starts right after the offset table and every record extends to the next
/// offset, the last one to the end of the section.
fn read_materials(section: &mut Parser, start: usize) -> Result<Vec<Material>> {
    let count = section.read_le::<u32>()?;

    let mut offsets = Vec::new();
    for _ in 0..count {
        offsets.push(section.read_le::<u32>()? as usize);
    }

    let data = section.data();
    let mut expected = section.pos();
    for (index, &offset) in offsets.iter().enumerate() {
        let in_order = if index == 0 { offset == expected } else { offset > expected };
        if !in_order || offset > data.len() {
            return Err(malformed_error!(
                "Material {} offset {:#x} in mat1 section at {:#x} is out of sequence",
                index,
                offset,
                start
            ));
        }
        expected = offset;
    }

    let mut materials = Vec::with_capacity(offsets.len());
    for (index, &offset) in offsets.iter().enumerate() {
        let end = offsets.get(index + 1).copied().unwrap_or(data.len());
        let mut record = Parser::new(&data[offset..end]);
        materials.push(read_material(&mut record, start + offset)?);
    }

    if !offsets.is_empty() {
        section.seek(data.len())?;
    }

    Ok(materials)
}

fn read_material(record: &mut Parser, at: usize) -> Result<Material> {
    let name = record.read_fixed_string(MATERIAL_NAME_SIZE)?;

    let mut tev_constant_colors = [0u32; TEV_CONSTANT_COLORS];
    for color in &mut tev_constant_colors {
        *color = record.read_le()?;
    }

    let flags = MaterialFlags::from_bits(record.read_le()?);

    record.seek(flags.texture_map_offset())?;
    let mut texture_maps = Vec::with_capacity(usize::from(flags.texture_maps));
    for _ in 0..flags.texture_maps {
        let texture_index = record.read_le::<u16>()?;
        let (wrap_s, min_filter) = split_sampler_byte(record.read_le()?, at)?;
        let (wrap_t, mag_filter) = split_sampler_byte(record.read_le()?, at)?;
        texture_maps.push(TextureMapEntry {
            texture_index,
            wrap_s,
            wrap_t,
            min_filter,
            mag_filter,
        });
    }

    record.seek(flags.texture_matrix_offset())?;
    let mut texture_matrices = Vec::with_capacity(usize::from(flags.texture_matrices));
    for _ in 0..flags.texture_matrices {
        texture_matrices.push(TextureMatrixEntry {
            translation: Vector2::new(record.read_le()?, record.read_le()?),
            rotation: record.read_le()?,
            scale: Vector2::new(record.read_le()?, record.read_le()?),
        });
    }

    record.seek(flags.texcoord_gen_offset())?;
    let mut texcoord_gens = Vec::with_capacity(usize::from(flags.texcoord_gens));
    for _ in 0..flags.texcoord_gens {
        texcoord_gens.push(record.read_le()?);
    }

    record.seek(flags.undecoded_offset())?;
    let tail = record.read_bytes(record.len() - record.pos())?.to_vec();

    Ok(Material {
        name,
        tev_constant_colors,
        use_texture_only: flags.use_texture_only,
        texture_maps,
        texture_matrices,
        texcoord_gens,
        undecoded: UndecodedStages::from_flags(&flags, tail),
    })
}

/// Bits 0-1 hold the wrap mode, bits 2-3 the filter. Anything above is not a valid sampler.
fn split_sampler_byte(value: u8, at: usize) -> Result<(WrapMode, TextureFilter)> {
    let wrap = WrapMode::from_repr(value & 0x3);
    let filter = TextureFilter::from_repr((value >> 2) & 0x3);

    match (wrap, filter) {
        (Some(wrap), Some(filter)) if value >> 4 == 0 => Ok((wrap, filter)),
        _ => Err(malformed_error!(
            "Invalid texture sampler byte {:#04x} in material at offset {:#x}",
            value,
            at
        )),
    }
}

/// The 0x44 bytes every panel section starts with.
fn read_panel(section: &mut Parser, kind: PanelKind) -> Result<Panel> {
    let flags = PanelFlags::from_bits_retain(section.read_le()?);
    let origin = section.read_le()?;
    let alpha = section.read_le()?;
    let magnification = MagnificationFlags::from_bits_retain(section.read_le()?);
    let name = section.read_fixed_string(PANEL_NAME_SIZE)?;

    Ok(Panel {
        flags,
        origin,
        alpha,
        magnification,
        name,
        translation: Vector3::new(section.read_le()?, section.read_le()?, section.read_le()?),
        rotation: Vector3::new(section.read_le()?, section.read_le()?, section.read_le()?),
        scale: Vector2::new(section.read_le()?, section.read_le()?),
        size: Size::new(section.read_le()?, section.read_le()?),
        user_data: None,
        kind,
        children: Vec::new(),
    })
}

fn read_picture(section: &mut Parser) -> Result<Picture> {
    let vertex_colors = VertexColors {
        top_left: section.read_le()?,
        top_right: section.read_le()?,
        bottom_left: section.read_le()?,
        bottom_right: section.read_le()?,
    };
    let material_index = section.read_le()?;
    let count = section.read_le::<u16>()?;

    let mut tex_coords = Vec::new();
    for _ in 0..count {
        tex_coords.push(TexCoordSet {
            top_left: Vector2::new(section.read_le()?, section.read_le()?),
            top_right: Vector2::new(section.read_le()?, section.read_le()?),
            bottom_left: Vector2::new(section.read_le()?, section.read_le()?),
            bottom_right: Vector2::new(section.read_le()?, section.read_le()?),
        });
    }

    Ok(Picture {
        vertex_colors,
        material_index,
        tex_coords,
    })
}

/// The fixed `txt1` fields, then the text at [`TEXT_OFFSET`].
///
/// Stored text is UTF-16LE with one terminating null unit, or no bytes at all when empty. The
/// capacity covers the text and whole UTF-16 units of slack.
fn read_text(section: &mut Parser, start: usize) -> Result<TextSection> {
    let capacity = section.read_le::<u16>()?;
    let text_bytes = section.read_le::<u16>()?;
    if capacity < text_bytes {
        return Err(malformed_error!(
            "Text section at offset {:#x} declares {} text bytes but capacity {}",
            start,
            text_bytes,
            capacity
        ));
    }
    if capacity % 2 != 0 || text_bytes % 2 != 0 {
        return Err(malformed_error!(
            "Text section at offset {:#x} declares odd sizes, {} text bytes in capacity {}",
            start,
            text_bytes,
            capacity
        ));
    }

    let mut text = TextSection {
        material_index: section.read_le()?,
        font_index: section.read_le()?,
        unknown_bytes: [section.read_le()?, section.read_le()?],
        reserved: section.read_le()?,
        ..Default::default()
    };

    let text_offset = section.read_le::<u32>()?;
    text.unknown_words = [section.read_le()?, section.read_le()?];
    text.unknown_vector = Vector2::new(section.read_le()?, section.read_le()?);
    text.unknown_floats = [section.read_le()?, section.read_le()?];

    if text_offset != TEXT_OFFSET {
        return Err(malformed_error!(
            "Text section at offset {:#x} stores its text at {:#x}, expected {:#x}",
            start,
            text_offset,
            TEXT_OFFSET
        ));
    }

    match text_bytes {
        0 => {}
        2 => {
            return Err(malformed_error!(
                "Text section at offset {:#x} stores empty text with a terminator",
                start
            ));
        }
        _ => {
            text.text = section.read_utf16(usize::from(text_bytes) - 2)?;
            if section.read_le::<u16>()? != 0 {
                return Err(malformed_error!(
                    "Text in section at offset {:#x} is not null-terminated",
                    start
                ));
            }
        }
    }
    text.set_capacity_bytes(usize::from(capacity));

    Ok(text)
}

fn read_group(section: &mut Parser) -> Result<Group> {
    let name = section.read_fixed_string(GROUP_NAME_SIZE)?;
    let count = section.read_le::<u32>()?;

    let mut panels = Vec::new();
    for _ in 0..count {
        panels.push(section.read_fixed_string(GROUP_NAME_SIZE)?);
    }

    Ok(Group {
        name,
        panels,
        children: Vec::new(),
    })
}

/// After a section's payload only zero padding up to the next 4-byte boundary may follow.
fn expect_padding(section: &Parser, tag: SectionTag, start: usize) -> Result<()> {
    let rest = &section.data()[section.pos()..];
    if rest.len() >= SECTION_ALIGNMENT || rest.iter().any(|&b| b != 0) {
        return Err(malformed_error!(
            "{} section at offset {:#x} has {} bytes of unexpected trailing data",
            tag,
            start,
            rest.len()
        ));
    }

    Ok(())
}
