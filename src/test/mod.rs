//! Shared fixtures for unit tests.


use crate::{
    codec::{BYTE_ORDER_MARK, HEADER_SIZE, MAGIC, TEXT_OFFSET, VERSION},
    layout::{
        EmptyTables, Group, Layout, LayoutOrigin, Material, Panel, PanelKind, Picture, Size,
        TexCoordSet, TextSection, TextureFilter, TextureMapEntry, TextureMatrixEntry,
        UndecodedStages, Vector2, Vector3, VertexColors, Window, WrapMode,
    },
};

// Helper function to frame a payload as a section, padded to 4 bytes
pub fn section(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut data = tag.to_vec();
    let padded = payload.len().next_multiple_of(4);
    data.extend_from_slice(&((8 + padded) as u32).to_le_bytes());
    data.extend_from_slice(payload);
    data.resize(8 + padded, 0);
    data
}

// Helper function to wrap sections in a valid container header
pub fn container(sections: &[Vec<u8>]) -> Vec<u8> {
    let body: usize = sections.iter().map(Vec::len).sum();

    let mut data = MAGIC.to_vec();
    data.extend_from_slice(&BYTE_ORDER_MARK.to_le_bytes());
    data.extend_from_slice(&HEADER_SIZE.to_le_bytes());
    data.extend_from_slice(&VERSION.to_le_bytes());
    data.extend_from_slice(&((usize::from(HEADER_SIZE) + body) as u32).to_le_bytes());
    data.extend_from_slice(&(sections.len() as u32).to_le_bytes());
    for section in sections {
        data.extend_from_slice(section);
    }
    data
}

// Helper function to create a lyt1 section: centered origin, 400x240 canvas
pub fn lyt1() -> Vec<u8> {
    let mut payload = 1u32.to_le_bytes().to_vec();
    payload.extend_from_slice(&400.0f32.to_le_bytes());
    payload.extend_from_slice(&240.0f32.to_le_bytes());
    section(b"lyt1", &payload)
}

// Helper function to create the 0x44 bytes shared by every panel section
pub fn panel_fields(name: &str) -> Vec<u8> {
    let mut data = vec![0x01, 0x04, 0xFF, 0x00];
    let mut field = [0u8; 0x18];
    field[..name.len()].copy_from_slice(name.as_bytes());
    data.extend_from_slice(&field);
    for value in [1.0f32, -2.0, 0.0, 0.0, 0.0, 90.0, 1.0, 1.0, 64.0, 32.0] {
        data.extend_from_slice(&value.to_le_bytes());
    }
    data
}

// Helper function to create a pan1 section
pub fn pan1(name: &str) -> Vec<u8> {
    section(b"pan1", &panel_fields(name))
}

// Helper function to create a txt1 section with the given size fields, text offset and raw text
pub fn txt1(name: &str, capacity: u16, text_bytes: u16, text_offset: u32, text: &[u8]) -> Vec<u8> {
    let mut payload = panel_fields(name);
    payload.extend_from_slice(&capacity.to_le_bytes());
    payload.extend_from_slice(&text_bytes.to_le_bytes());
    payload.extend_from_slice(&2u16.to_le_bytes());
    payload.extend_from_slice(&0u16.to_le_bytes());
    payload.extend_from_slice(&[0x11, 0x02]);
    payload.extend_from_slice(&0u16.to_le_bytes());
    payload.extend_from_slice(&text_offset.to_le_bytes());
    payload.extend_from_slice(&[0u8; 8]);
    for value in [0.5f32, 0.5, 16.0, 16.0] {
        payload.extend_from_slice(&value.to_le_bytes());
    }
    debug_assert_eq!(8 + payload.len(), TEXT_OFFSET as usize);

    payload.extend_from_slice(text);
    section(b"txt1", &payload)
}

// Helper function to encode text as UTF-16LE with a terminating null
pub fn utf16z(text: &str) -> Vec<u8> {
    text.encode_utf16()
        .chain([0])
        .flat_map(u16::to_le_bytes)
        .collect()
}

// Helper function to create a txl1/fnl1 section laid out back to back after the offset table
pub fn name_table(tag: &[u8; 4], names: &[&str]) -> Vec<u8> {
    let mut payload = (names.len() as u32).to_le_bytes().to_vec();
    let mut offset = names.len() * 4;
    for name in names {
        payload.extend_from_slice(&(offset as u32).to_le_bytes());
        offset += name.len() + 1;
    }
    for name in names {
        payload.extend_from_slice(name.as_bytes());
        payload.push(0);
    }
    section(tag, &payload)
}

// Helper function to create a mat1 section from raw records
pub fn mat1(records: &[Vec<u8>]) -> Vec<u8> {
    let mut payload = (records.len() as u32).to_le_bytes().to_vec();
    let mut offset = 8 + 4 + records.len() * 4;
    for record in records {
        payload.extend_from_slice(&(offset as u32).to_le_bytes());
        offset += record.len();
    }
    for record in records {
        payload.extend_from_slice(record);
    }
    section(b"mat1", &payload)
}

// Helper function to create a material record: name, constant colors, flags, then `body`
pub fn material_record(name: &str, flags: u32, body: &[u8]) -> Vec<u8> {
    let mut data = vec![0u8; 0x14];
    data[..name.len()].copy_from_slice(name.as_bytes());
    for color in 0..7u32 {
        data.extend_from_slice(&(0x1010_10FF * color).to_le_bytes());
    }
    data.extend_from_slice(&flags.to_le_bytes());
    data.extend_from_slice(body);
    data
}

// Helper function to create a layout touching every section type
//
// RootPane
// ├── N_Header      (user data)
// │   ├── T_Title
// │   └── P_Icon
// ├── W_Frame
// └── B_Touch
pub fn sample_layout() -> Layout {
    let title = Panel {
        translation: Vector3::new(0.0, 40.0, 0.0),
        size: Size::new(200.0, 24.0),
        ..Panel::new(
            "T_Title",
            PanelKind::TextSection(TextSection {
                text: "Hello".to_string(),
                additional_chars: 4,
                material_index: 0,
                font_index: 0,
                unknown_bytes: [0x11, 0x02],
                reserved: 0,
                unknown_words: [0, 1],
                unknown_vector: Vector2::new(1.5, -2.0),
                unknown_floats: [12.0, 16.0],
            }),
        )
    };

    let icon = Panel {
        translation: Vector3::new(-150.0, 40.0, 0.0),
        size: Size::new(32.0, 32.0),
        ..Panel::new(
            "P_Icon",
            PanelKind::Picture(Picture {
                vertex_colors: VertexColors {
                    top_left: 0xFFFF_FFFF,
                    top_right: 0xFFFF_FFFF,
                    bottom_left: 0x8080_80FF,
                    bottom_right: 0x8080_80FF,
                },
                material_index: 1,
                tex_coords: vec![TexCoordSet {
                    top_left: Vector2::new(0.0, 1.0),
                    top_right: Vector2::new(1.0, 1.0),
                    bottom_left: Vector2::new(0.0, 0.0),
                    bottom_right: Vector2::new(1.0, 0.0),
                }],
            }),
        )
    };

    let mut header = Panel::new("N_Header", PanelKind::Panel);
    header.user_data = Some(vec![0x01, 0x00, 0x00, 0x00]);
    header.children = vec![title, icon];

    let frame = Panel {
        size: Size::new(400.0, 240.0),
        ..Panel::new(
            "W_Frame",
            PanelKind::Window(Window {
                data: vec![0xAB; 12],
            }),
        )
    };

    let touch = Panel {
        size: Size::new(320.0, 200.0),
        ..Panel::new("B_Touch", PanelKind::Boundary)
    };

    let mut root = Panel::new("RootPane", PanelKind::Panel);
    root.size = Size::new(400.0, 240.0);
    root.children = vec![header, frame, touch];

    let mut groups = Group::new("RootGroup");
    groups.children = vec![
        Group {
            name: "G_Header".to_string(),
            panels: vec!["T_Title".to_string(), "P_Icon".to_string()],
            children: Vec::new(),
        },
        Group {
            name: "G_Touch".to_string(),
            panels: vec!["B_Touch".to_string()],
            children: Vec::new(),
        },
    ];

    Layout {
        origin: LayoutOrigin::Normal,
        size: Size::new(400.0, 240.0),
        materials: vec![
            Material {
                name: "M_Title".to_string(),
                tev_constant_colors: [0x0000_00FF; 7],
                use_texture_only: false,
                texture_maps: vec![TextureMapEntry {
                    texture_index: 0,
                    wrap_s: WrapMode::Repeat,
                    wrap_t: WrapMode::Mirror,
                    min_filter: TextureFilter::Linear,
                    mag_filter: TextureFilter::Near,
                }],
                texture_matrices: vec![TextureMatrixEntry {
                    translation: Vector2::new(0.0, 0.0),
                    rotation: 0.0,
                    scale: Vector2::new(1.0, 1.0),
                }],
                texcoord_gens: vec![0.0],
                undecoded: UndecodedStages {
                    tev_stages: 1,
                    blend_mode: true,
                    data: vec![0x02, 0x00, 0x00, 0x00, 0xE4, 0x00, 0x00, 0x00],
                    ..Default::default()
                },
            },
            Material {
                name: "M_Icon".to_string(),
                use_texture_only: true,
                texture_maps: vec![TextureMapEntry {
                    texture_index: 1,
                    ..Default::default()
                }],
                ..Default::default()
            },
        ],
        textures: vec!["tex_title.bclim".to_string(), "tex_icon.bclim".to_string()],
        fonts: vec!["cbf_std.bcfnt".to_string()],
        root_panel: Some(root),
        root_group: Some(groups),
        empty_tables: EmptyTables::empty(),
    }
}
