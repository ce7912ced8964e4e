//! [`Layout`] to CLYT stream.
//!
//! Every size, count and offset in the output is computed here, never taken from the model: the
//! header and each section are written with zeroed placeholders that are patched once the real
//! value is known. Offset tables are patched slot by slot, right before the entry they point at is
//! appended.

use widestring::U16String;

use crate::{
    codec::{
        SectionTag, BYTE_ORDER_MARK, HEADER_SECTION_COUNT_OFFSET, HEADER_SIZE,
        HEADER_TOTAL_SIZE_OFFSET, MAGIC, SECTION_ALIGNMENT, TEXT_OFFSET, VERSION,
    },
    file::writer::Writer,
    layout::{
        group::GROUP_NAME_SIZE,
        material::{MaterialFlags, MATERIAL_NAME_SIZE},
        panel::PANEL_NAME_SIZE,
        EmptyTables, Group, Layout, Material, Panel, PanelKind, Picture, TextSection,
        TextureMapEntry,
    },
    Result,
};

/// Encode `layout` into a complete CLYT stream.
///
/// # Errors
/// See [`Layout::encode`].
pub fn encode(layout: &Layout) -> Result<Vec<u8>> {
    let mut encoder = Encoder {
        writer: Writer::new(),
        sections: 0,
    };

    encoder.header();

    encoder.section(SectionTag::Layout, |writer, _| {
        writer.write_le(layout.origin as u32);
        writer.write_le(layout.size.width);
        writer.write_le(layout.size.height);
        Ok(())
    })?;

    let empty = layout.empty_tables;

    if !layout.textures.is_empty() || empty.contains(EmptyTables::TEXTURES) {
        encoder.section(SectionTag::TextureList, |writer, _| {
            write_name_table(writer, &layout.textures)
        })?;
    }

    if !layout.fonts.is_empty() || empty.contains(EmptyTables::FONTS) {
        encoder.section(SectionTag::FontList, |writer, _| {
            write_name_table(writer, &layout.fonts)
        })?;
    }

    if !layout.materials.is_empty() || empty.contains(EmptyTables::MATERIALS) {
        encoder.section(SectionTag::Materials, |writer, start| {
            write_materials(writer, &layout.materials, start)
        })?;
    }

    if let Some(root) = &layout.root_panel {
        encoder.panel(root)?;
    }

    if let Some(root) = &layout.root_group {
        encoder.group(root)?;
    }

    encoder.finish()
}

struct Encoder {
    writer: Writer,
    sections: u32,
}

impl Encoder {
    fn header(&mut self) {
        self.writer.write_bytes(&MAGIC);
        self.writer.write_le(BYTE_ORDER_MARK);
        self.writer.write_le(HEADER_SIZE);
        self.writer.write_le(VERSION);
        // total size and section count, patched in finish()
        self.writer.write_le(0u32);
        self.writer.write_le(0u32);
    }

    /// Write one section: tag, placeholder length, body, padding, then patch the length.
    ///
    /// `body` receives the writer and the absolute offset of the section start.
    fn section<F>(&mut self, tag: SectionTag, body: F) -> Result<()>
    where
        F: FnOnce(&mut Writer, usize) -> Result<()>,
    {
        let start = self.writer.pos();
        self.writer.write_bytes(&tag.as_bytes());
        self.writer.write_le(0u32);

        body(&mut self.writer, start)?;
        self.writer.pad_to(SECTION_ALIGNMENT);

        let length = to_u32(self.writer.pos() - start, "section length")?;
        self.writer.patch_le(start + 4, length)?;
        self.sections += 1;
        Ok(())
    }

    fn marker(&mut self, tag: SectionTag) -> Result<()> {
        self.section(tag, |_, _| Ok(()))
    }

    fn panel(&mut self, panel: &Panel) -> Result<()> {
        let tag = match &panel.kind {
            PanelKind::Panel => SectionTag::Panel,
            PanelKind::Window(_) => SectionTag::Window,
            PanelKind::Picture(_) => SectionTag::Picture,
            PanelKind::TextSection(_) => SectionTag::Text,
            PanelKind::Boundary => SectionTag::Boundary,
        };

        self.section(tag, |writer, start| {
            write_panel_fields(writer, panel)?;
            match &panel.kind {
                PanelKind::Window(window) => writer.write_bytes(&window.data),
                PanelKind::Picture(picture) => write_picture(writer, picture)?,
                PanelKind::TextSection(text) => write_text(writer, text, start)?,
                PanelKind::Panel | PanelKind::Boundary => {}
            }
            Ok(())
        })?;

        if let Some(data) = &panel.user_data {
            self.section(SectionTag::UserData, |writer, _| {
                writer.write_bytes(data);
                Ok(())
            })?;
        }

        if !panel.children.is_empty() {
            self.marker(SectionTag::PanelStart)?;
            for child in &panel.children {
                self.panel(child)?;
            }
            self.marker(SectionTag::PanelEnd)?;
        }

        Ok(())
    }

    fn group(&mut self, group: &Group) -> Result<()> {
        self.section(SectionTag::Group, |writer, _| {
            writer.write_fixed_string(&group.name, GROUP_NAME_SIZE)?;
            writer.write_le(to_u32(group.panels.len(), "group panel count")?);
            for panel in &group.panels {
                writer.write_fixed_string(panel, GROUP_NAME_SIZE)?;
            }
            Ok(())
        })?;

        if !group.children.is_empty() {
            self.marker(SectionTag::GroupStart)?;
            for child in &group.children {
                self.group(child)?;
            }
            self.marker(SectionTag::GroupEnd)?;
        }

        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        let total = to_u32(self.writer.len(), "stream length")?;
        self.writer.patch_le(HEADER_TOTAL_SIZE_OFFSET, total)?;
        self.writer
            .patch_le(HEADER_SECTION_COUNT_OFFSET, self.sections)?;

        log::debug!("Encoded {} sections, {:#x} bytes", self.sections, total);
        Ok(self.writer.into_inner())
    }
}

fn to_u32(value: usize, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| malformed_error!("{} {} does not fit in 32 bits", what, value))
}

fn to_u16(value: usize, what: &str) -> Result<u16> {
    u16::try_from(value).map_err(|_| malformed_error!("{} {} does not fit in 16 bits", what, value))
}

/// Count, offset slots relative to the first slot, then the null-terminated names.
fn write_name_table(writer: &mut Writer, names: &[String]) -> Result<()> {
    writer.write_le(to_u32(names.len(), "name count")?);
    let base = writer.pos();
    writer.write_zeros(names.len() * 4);

    for (index, name) in names.iter().enumerate() {
        let offset = to_u32(writer.pos() - base, "name offset")?;
        writer.patch_le(base + index * 4, offset)?;
        writer.write_cstring(name);
    }

    Ok(())
}

/// Count, offset slots relative to the section start, then the material records.
fn write_materials(writer: &mut Writer, materials: &[Material], start: usize) -> Result<()> {
    writer.write_le(to_u32(materials.len(), "material count")?);
    let table = writer.pos();
    writer.write_zeros(materials.len() * 4);

    for (index, material) in materials.iter().enumerate() {
        let offset = to_u32(writer.pos() - start, "material offset")?;
        writer.patch_le(table + index * 4, offset)?;
        write_material(writer, material)?;
    }

    Ok(())
}

fn write_material(writer: &mut Writer, material: &Material) -> Result<()> {
    let flags = MaterialFlags::for_material(material)?.to_bits()?;

    writer.write_fixed_string(&material.name, MATERIAL_NAME_SIZE)?;
    for color in material.tev_constant_colors {
        writer.write_le(color);
    }
    writer.write_le(flags);

    for entry in &material.texture_maps {
        write_texture_map(writer, entry);
    }

    for entry in &material.texture_matrices {
        writer.write_le(entry.translation.x);
        writer.write_le(entry.translation.y);
        writer.write_le(entry.rotation);
        writer.write_le(entry.scale.x);
        writer.write_le(entry.scale.y);
    }

    for value in &material.texcoord_gens {
        writer.write_le(*value);
    }

    writer.write_bytes(&material.undecoded.data);
    Ok(())
}

fn write_texture_map(writer: &mut Writer, entry: &TextureMapEntry) {
    writer.write_le(entry.texture_index);
    writer.write_le(entry.wrap_s as u8 | (entry.min_filter as u8) << 2);
    writer.write_le(entry.wrap_t as u8 | (entry.mag_filter as u8) << 2);
}

fn write_panel_fields(writer: &mut Writer, panel: &Panel) -> Result<()> {
    writer.write_le(panel.flags.bits());
    writer.write_le(panel.origin);
    writer.write_le(panel.alpha);
    writer.write_le(panel.magnification.bits());
    writer.write_fixed_string(&panel.name, PANEL_NAME_SIZE)?;

    for value in [
        panel.translation.x,
        panel.translation.y,
        panel.translation.z,
        panel.rotation.x,
        panel.rotation.y,
        panel.rotation.z,
        panel.scale.x,
        panel.scale.y,
        panel.size.width,
        panel.size.height,
    ] {
        writer.write_le(value);
    }

    Ok(())
}

fn write_picture(writer: &mut Writer, picture: &Picture) -> Result<()> {
    let colors = &picture.vertex_colors;
    writer.write_le(colors.top_left);
    writer.write_le(colors.top_right);
    writer.write_le(colors.bottom_left);
    writer.write_le(colors.bottom_right);
    writer.write_le(picture.material_index);
    writer.write_le(to_u16(picture.tex_coords.len(), "texture coordinate count")?);

    for set in &picture.tex_coords {
        for corner in [set.top_left, set.top_right, set.bottom_left, set.bottom_right] {
            writer.write_le(corner.x);
            writer.write_le(corner.y);
        }
    }

    Ok(())
}

fn write_text(writer: &mut Writer, text: &TextSection, start: usize) -> Result<()> {
    writer.write_le(to_u16(text.capacity_bytes(), "text capacity")?);
    writer.write_le(to_u16(text.text_byte_len(), "text length")?);
    writer.write_le(text.material_index);
    writer.write_le(text.font_index);
    writer.write_le(text.unknown_bytes[0]);
    writer.write_le(text.unknown_bytes[1]);
    writer.write_le(text.reserved);
    writer.write_le(TEXT_OFFSET);
    for word in text.unknown_words {
        writer.write_le(word);
    }
    writer.write_le(text.unknown_vector.x);
    writer.write_le(text.unknown_vector.y);
    for value in text.unknown_floats {
        writer.write_le(value);
    }

    debug_assert_eq!(writer.pos() - start, TEXT_OFFSET as usize);

    if !text.text.is_empty() {
        for unit in U16String::from_str(&text.text).as_slice() {
            writer.write_le(*unit);
        }
        writer.write_le(0u16);
    }

    Ok(())
}
