use std::path::Path;

use bclyt::{Layout, PanelType};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::load_layout,
    output::{print_output, print_table},
};

#[derive(Debug, Serialize)]
pub struct LayoutInfo {
    pub origin: String,
    pub width: f32,
    pub height: f32,
    pub panel_count: usize,
    pub group_count: usize,
    pub panels_by_type: Vec<TypeCount>,
    pub textures: Vec<String>,
    pub fonts: Vec<String>,
    pub materials: Vec<MaterialInfo>,
}

#[derive(Debug, Serialize)]
pub struct TypeCount {
    pub kind: PanelType,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct MaterialInfo {
    pub name: String,
    pub textures: Vec<String>,
    pub texture_only: bool,
    pub tev_stages: u8,
}

/// Panel counts per type, in first-seen pre-order.
fn count_by_type(layout: &Layout) -> Vec<TypeCount> {
    let mut counts: Vec<TypeCount> = Vec::new();
    for panel in layout.panels() {
        let kind = panel.panel_type();
        match counts.iter_mut().find(|c| c.kind == kind) {
            Some(entry) => entry.count += 1,
            None => counts.push(TypeCount { kind, count: 1 }),
        }
    }
    counts
}

fn layout_info(layout: &Layout) -> LayoutInfo {
    let texture_name = |index: u16| {
        layout
            .textures
            .get(usize::from(index))
            .cloned()
            .unwrap_or_else(|| format!("<missing #{index}>"))
    };

    LayoutInfo {
        origin: layout.origin.to_string(),
        width: layout.size.width,
        height: layout.size.height,
        panel_count: layout.panels().count(),
        group_count: layout.groups().count(),
        panels_by_type: count_by_type(layout),
        textures: layout.textures.clone(),
        fonts: layout.fonts.clone(),
        materials: layout
            .materials
            .iter()
            .map(|material| MaterialInfo {
                name: material.name.clone(),
                textures: material
                    .texture_maps
                    .iter()
                    .map(|map| texture_name(map.texture_index))
                    .collect(),
                texture_only: material.use_texture_only,
                tev_stages: material.undecoded.tev_stages,
            })
            .collect(),
    }
}

pub fn run(path: &Path, opts: &GlobalOptions) -> anyhow::Result<()> {
    let layout = load_layout(path)?;
    let info = layout_info(&layout);

    print_output(&info, opts, |info| {
        println!("Origin:     {}", info.origin);
        println!("Canvas:     {} x {}", info.width, info.height);
        println!("Panels:     {}", info.panel_count);
        for entry in &info.panels_by_type {
            println!("  {:<12}{}", entry.kind.to_string(), entry.count);
        }
        println!("Groups:     {}", info.group_count);
        println!("Textures:   {}", info.textures.len());
        println!("Fonts:      {}", info.fonts.len());
        println!("Materials:  {}", info.materials.len());

        if !info.textures.is_empty() || !info.fonts.is_empty() {
            println!("\nResources:");
            let textures = info.textures.iter().map(|name| ("texture", name));
            let fonts = info.fonts.iter().map(|name| ("font", name));
            let rows = textures
                .chain(fonts)
                .map(|(kind, name)| vec![kind.to_string(), name.clone()])
                .collect();
            print_table(&["Kind", "Name"], &[], rows);
        }

        if !info.materials.is_empty() {
            println!("\nMaterials:");
            let rows = info
                .materials
                .iter()
                .map(|material| {
                    vec![
                        material.name.clone(),
                        material.tev_stages.to_string(),
                        material.textures.join(", "),
                    ]
                })
                .collect();
            print_table(&["Name", "TEV", "Textures"], &[1], rows);
        }
    })
}

#[cfg(test)]
mod tests {
    use bclyt::{Material, Panel, PanelKind, Size, TextureMapEntry};

    use super::*;

    #[test]
    fn counts_and_texture_names() {
        let mut root = Panel::new("RootPane", PanelKind::Panel);
        root.children = vec![
            Panel::new("B_A", PanelKind::Boundary),
            Panel::new("N_B", PanelKind::Panel),
            Panel::new("B_C", PanelKind::Boundary),
        ];
        let mut layout = Layout::new(Size::new(400.0, 240.0));
        layout.root_panel = Some(root);
        layout.textures = vec!["a.bclim".to_string()];
        layout.materials = vec![Material {
            name: "M_A".to_string(),
            texture_maps: vec![
                TextureMapEntry::default(),
                TextureMapEntry {
                    texture_index: 3,
                    ..Default::default()
                },
            ],
            ..Default::default()
        }];

        let info = layout_info(&layout);
        assert_eq!(info.panel_count, 4);
        let counts: Vec<(PanelType, usize)> = info
            .panels_by_type
            .iter()
            .map(|c| (c.kind, c.count))
            .collect();
        assert_eq!(counts, [(PanelType::Panel, 2), (PanelType::Boundary, 2)]);
        assert_eq!(info.materials[0].textures, ["a.bclim", "<missing #3>"]);
    }
}
