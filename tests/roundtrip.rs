//! Encode/decode round trips through the public API.

use bclyt::{
    EmptyTables, Group, Layout, LayoutOrigin, Material, MaterialFlags, Panel, PanelKind, PanelType,
    Picture, Size, TexCoordSet, TextSection, TextureFilter, TextureMapEntry, UndecodedStages,
    Vector2, Vector3, Window, WrapMode,
};

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
}

fn text_panel(name: &str, text: &str, slack: u16) -> Panel {
    Panel::new(
        name,
        PanelKind::TextSection(TextSection {
            text: text.to_string(),
            additional_chars: slack,
            ..Default::default()
        }),
    )
}

// Title menu with every panel kind, two materials and a nested group tree
//
// RootPane
// ├── N_Title
// │   ├── T_Title
// │   └── T_Subtitle  (user data)
// ├── P_Logo
// ├── W_Window
// │   └── T_Press
// └── B_Hit
fn menu_layout() -> Layout {
    let mut title = Panel::new("N_Title", PanelKind::Panel);
    title.translation = Vector3::new(0.0, 60.0, 0.0);
    let mut subtitle = text_panel("T_Subtitle", "Deluxe Edition", 2);
    subtitle.user_data = Some(vec![0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x01, 0x02, 0x03]);
    title.children = vec![text_panel("T_Title", "Title", 0), subtitle];

    let logo = Panel {
        size: Size::new(128.0, 64.0),
        rotation: Vector3::new(0.0, 0.0, 12.5),
        ..Panel::new(
            "P_Logo",
            PanelKind::Picture(Picture {
                material_index: 0,
                tex_coords: vec![
                    TexCoordSet {
                        top_left: Vector2::new(0.0, 1.0),
                        top_right: Vector2::new(1.0, 1.0),
                        bottom_left: Vector2::new(0.0, 0.0),
                        bottom_right: Vector2::new(1.0, 0.0),
                    },
                    TexCoordSet::default(),
                ],
                ..Default::default()
            }),
        )
    };

    let mut window = Panel::new(
        "W_Window",
        PanelKind::Window(Window {
            data: (0u8..24).collect(),
        }),
    );
    window.children = vec![text_panel("T_Press", "Press START", 8)];

    let mut root = Panel::new("RootPane", PanelKind::Panel);
    root.size = Size::new(320.0, 240.0);
    root.children = vec![
        title,
        logo,
        window,
        Panel::new("B_Hit", PanelKind::Boundary),
    ];

    let mut inner = Group::new("G_Text");
    inner.panels = vec!["T_Title".to_string(), "T_Subtitle".to_string()];
    let mut outer = Group::new("G_Title");
    outer.panels = vec!["N_Title".to_string()];
    outer.children = vec![inner];
    let mut groups = Group::new("RootGroup");
    groups.children = vec![outer, Group::new("G_Empty")];

    Layout {
        origin: LayoutOrigin::Classic,
        size: Size::new(320.0, 240.0),
        materials: vec![
            Material {
                name: "M_Logo".to_string(),
                texture_maps: vec![TextureMapEntry {
                    texture_index: 0,
                    wrap_s: WrapMode::Clamp,
                    wrap_t: WrapMode::Repeat,
                    min_filter: TextureFilter::Linear,
                    mag_filter: TextureFilter::Linear,
                }],
                undecoded: UndecodedStages {
                    tev_stages: 2,
                    alpha_compare: true,
                    font_shadow_param: true,
                    unknown_high: 0x4001,
                    data: vec![0x11; 12],
                    ..Default::default()
                },
                ..Default::default()
            },
            Material {
                name: "M_Text".to_string(),
                tev_constant_colors: [0xFFFF_FFFF; 7],
                ..Default::default()
            },
        ],
        textures: vec!["logo.bclim".to_string()],
        fonts: vec!["cbf_std.bcfnt".to_string(), "cbf_title.bcfnt".to_string()],
        root_panel: Some(root),
        root_group: Some(groups),
        empty_tables: EmptyTables::empty(),
    }
}

#[test]
fn minimal_root_only() {
    let mut layout = Layout::new(Size::new(400.0, 240.0));
    layout.root_panel = Some(Panel::new("Root", PanelKind::Panel));

    let data = layout.encode().unwrap();
    assert_eq!(data.len(), 0x74);
    assert_eq!(read_u32(&data, 0x10), 2);

    let decoded = Layout::decode(&data).unwrap();
    assert_eq!(decoded, layout);
    assert!(decoded.materials.is_empty());
    assert!(decoded.root_group.is_none());
}

#[test]
fn decode_encode_is_byte_identical() {
    let first = menu_layout().encode().unwrap();
    let decoded = Layout::decode(&first).unwrap();
    assert_eq!(decoded, menu_layout());

    let second = decoded.encode().unwrap();
    assert_eq!(first, second);
}

#[test]
fn tree_shape_survives() {
    let layout = Layout::decode(&menu_layout().encode().unwrap()).unwrap();

    let names: Vec<&str> = layout.panels().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "RootPane",
            "N_Title",
            "T_Title",
            "T_Subtitle",
            "P_Logo",
            "W_Window",
            "T_Press",
            "B_Hit"
        ]
    );

    let kinds: Vec<PanelType> = layout.panels().map(Panel::panel_type).collect();
    assert_eq!(kinds[4], PanelType::Picture);
    assert_eq!(kinds[5], PanelType::Window);
    assert_eq!(kinds[7], PanelType::Boundary);

    let groups: Vec<&str> = layout.groups().map(|g| g.name.as_str()).collect();
    assert_eq!(groups, ["RootGroup", "G_Title", "G_Text", "G_Empty"]);

    let g_text = layout.groups().find(|g| g.name == "G_Text").unwrap();
    let members = layout.group_panels(g_text).unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[1].user_data.as_deref().map(<[u8]>::len), Some(8));
}

#[test]
fn picture_without_coordinates() {
    let mut layout = Layout::new(Size::new(400.0, 240.0));
    layout.root_panel = Some(Panel::new(
        "P_Flat",
        PanelKind::Picture(Picture::default()),
    ));

    let decoded = Layout::decode(&layout.encode().unwrap()).unwrap();
    let picture = match &decoded.root_panel.as_ref().unwrap().kind {
        PanelKind::Picture(picture) => picture,
        other => panic!("expected a picture, got {other:?}"),
    };
    assert!(picture.tex_coords.is_empty());
}

#[test]
fn material_flags_are_preserved() {
    let original = menu_layout();
    let data = original.encode().unwrap();
    let decoded = Layout::decode(&data).unwrap();

    let logo = &decoded.materials[0];
    let flags = MaterialFlags::for_material(logo).unwrap();
    assert_eq!(flags.texture_maps, 1);
    assert_eq!(flags.tev_stages, 2);
    assert!(flags.alpha_compare);
    assert!(flags.font_shadow_param);
    assert_eq!(flags.unknown_high, 0x4001);
    assert_eq!(
        flags.to_bits().unwrap(),
        MaterialFlags::for_material(&original.materials[0])
            .unwrap()
            .to_bits()
            .unwrap()
    );
    assert_eq!(logo.undecoded.data, vec![0x11; 12]);
    assert_eq!(logo.texture_maps[0].wrap_s, WrapMode::Clamp);
}

#[test]
fn text_capacity_is_kept() {
    let mut layout = menu_layout();
    let text = layout
        .find_panel_mut("T_Press")
        .and_then(Panel::as_text_mut)
        .unwrap();
    let capacity = text.capacity_bytes();
    text.set_text("Go");

    let decoded = Layout::decode(&layout.encode().unwrap()).unwrap();
    let text = decoded.find_panel("T_Press").unwrap().as_text().unwrap();
    assert_eq!(text.text, "Go");
    assert_eq!(text.capacity_bytes(), capacity);
}

#[test]
fn file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("menu.bclyt");
    menu_layout().write_to_file(&path).unwrap();

    assert_eq!(Layout::from_file(&path).unwrap(), menu_layout());
    assert_eq!(
        Layout::from_mem(std::fs::read(&path).unwrap()).unwrap(),
        menu_layout()
    );
}
