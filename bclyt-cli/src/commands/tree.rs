use std::path::Path;

use bclyt::{Group, Panel, PanelType};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::load_layout,
    output::{float, print_output},
};

#[derive(Debug, Serialize)]
struct PanelNode {
    name: String,
    kind: PanelType,
    visible: bool,
    position: [f32; 3],
    size: [f32; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<PanelNode>,
}

#[derive(Debug, Serialize)]
struct GroupNode {
    name: String,
    panels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<GroupNode>,
}

#[derive(Debug, Serialize)]
struct TreeInfo {
    panels: Option<PanelNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    groups: Option<GroupNode>,
}

fn panel_node(panel: &Panel) -> PanelNode {
    PanelNode {
        name: panel.name.clone(),
        kind: panel.panel_type(),
        visible: panel.flags.contains(bclyt::PanelFlags::VISIBLE),
        position: [
            panel.translation.x,
            panel.translation.y,
            panel.translation.z,
        ],
        size: [panel.size.width, panel.size.height],
        text: panel.as_text().map(|text| text.text.clone()),
        children: panel.children.iter().map(panel_node).collect(),
    }
}

fn group_node(group: &Group) -> GroupNode {
    GroupNode {
        name: group.name.clone(),
        panels: group.panels.clone(),
        children: group.children.iter().map(group_node).collect(),
    }
}

fn print_panel(node: &PanelNode, depth: usize) {
    let hidden = if node.visible { "" } else { " (hidden)" };
    let text = node
        .text
        .as_ref()
        .map(|t| format!(" {:?}", t))
        .unwrap_or_default();
    println!(
        "{:indent$}{} [{}] at ({}, {}) size {} x {}{hidden}{text}",
        "",
        node.name,
        node.kind,
        float(node.position[0]),
        float(node.position[1]),
        float(node.size[0]),
        float(node.size[1]),
        indent = depth * 2
    );
    for child in &node.children {
        print_panel(child, depth + 1);
    }
}

fn print_group(node: &GroupNode, depth: usize) {
    println!(
        "{:indent$}{} [{}]",
        "",
        node.name,
        node.panels.join(", "),
        indent = depth * 2
    );
    for child in &node.children {
        print_group(child, depth + 1);
    }
}

pub fn run(path: &Path, groups: bool, opts: &GlobalOptions) -> anyhow::Result<()> {
    let layout = load_layout(path)?;

    let info = TreeInfo {
        panels: layout.root_panel.as_ref().map(panel_node),
        groups: if groups {
            layout.root_group.as_ref().map(group_node)
        } else {
            None
        },
    };

    print_output(&info, opts, |info| {
        match &info.panels {
            Some(root) => print_panel(root, 0),
            None => println!("(no panels)"),
        }
        if let Some(root) = &info.groups {
            println!();
            print_group(root, 0);
        }
    })
}
