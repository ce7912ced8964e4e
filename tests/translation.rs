//! Structural dump and string catalog workflows end to end, through files on disk.

use bclyt::{
    dump::{apply_dump, dump, LayoutDump},
    text::{extract_strings, inject_strings, Catalog},
    Error, Layout, Panel, PanelKind, Size, TextSection, Vector3,
};

fn dialog() -> Layout {
    let mut greeting = TextSection {
        additional_chars: 10,
        ..Default::default()
    };
    greeting.set_text("Welcome back!");
    let mut hint = TextSection::default();
    hint.set_text("Line one\nLine \"two\"");

    let mut root = Panel::new("RootPane", PanelKind::Panel);
    root.children = vec![
        Panel::new("T_Greeting", PanelKind::TextSection(greeting)),
        Panel::new("T_Hint", PanelKind::TextSection(hint)),
        Panel::new("T_Empty", PanelKind::TextSection(TextSection::default())),
        Panel::new("B_Hit", PanelKind::Boundary),
    ];

    let mut layout = Layout::new(Size::new(320.0, 240.0));
    layout.root_panel = Some(root);
    layout
}

#[test]
fn dump_edit_apply() {
    let dir = tempfile::tempdir().unwrap();
    let bclyt = dir.path().join("dialog.bclyt");
    let json = dir.path().join("dialog.json");
    dialog().write_to_file(&bclyt).unwrap();

    let layout = Layout::from_file(&bclyt).unwrap();
    std::fs::write(&json, dump(&layout).to_json().unwrap()).unwrap();

    let mut edited = LayoutDump::from_json(&std::fs::read_to_string(&json).unwrap()).unwrap();
    let hit = edited.panels.iter_mut().find(|p| p.name == "B_Hit").unwrap();
    hit.position = Vector3::new(-20.0, 35.5, 0.0);
    hit.size = Size::new(64.0, 32.0);

    let mut layout = Layout::from_file(&bclyt).unwrap();
    apply_dump(&mut layout, &edited).unwrap();
    layout.write_to_file(&bclyt).unwrap();

    let reloaded = Layout::from_file(&bclyt).unwrap();
    let hit = reloaded.find_panel("B_Hit").unwrap();
    assert_eq!(hit.translation, Vector3::new(-20.0, 35.5, 0.0));
    assert_eq!(hit.size, Size::new(64.0, 32.0));
    assert_eq!(dump(&reloaded), edited);
}

#[test]
fn dump_missing_a_panel_changes_nothing() {
    let mut layout = dialog();
    let mut partial = dump(&layout);
    partial.panels.retain(|p| p.name != "T_Hint");
    partial.panels[0].position = Vector3::new(99.0, 99.0, 0.0);

    assert!(matches!(
        apply_dump(&mut layout, &partial),
        Err(Error::Reference(_))
    ));
    assert_eq!(layout, dialog());
}

#[test]
fn catalog_translate_inject() {
    let dir = tempfile::tempdir().unwrap();
    let po_path = dir.path().join("dialog.po");

    let strings = extract_strings(&dialog());
    assert_eq!(strings.len(), 2);
    std::fs::write(&po_path, Catalog::from_entries(&strings).to_po()).unwrap();

    let mut catalog = Catalog::from_po(&std::fs::read_to_string(&po_path).unwrap()).unwrap();
    assert_eq!(catalog.entries[1].original, "Line one\nLine \"two\"");
    catalog.entries[0].translation = "Bon retour !".to_string();
    std::fs::write(&po_path, catalog.to_po()).unwrap();

    let catalog = Catalog::from_po(&std::fs::read_to_string(&po_path).unwrap()).unwrap();
    let mut layout = dialog();
    assert_eq!(inject_strings(&mut layout, &catalog.to_entries()).unwrap(), 2);

    let layout = Layout::decode(&layout.encode().unwrap()).unwrap();
    let greeting = layout.find_panel("T_Greeting").unwrap().as_text().unwrap();
    assert_eq!(greeting.text, "Bon retour !");
    // never shrinks the buffer the original text box was given
    let original = dialog();
    let before = original.find_panel("T_Greeting").unwrap().as_text().unwrap();
    assert_eq!(greeting.capacity_bytes(), before.capacity_bytes());

    let hint = layout.find_panel("T_Hint").unwrap().as_text().unwrap();
    assert_eq!(hint.text, "Line one\nLine \"two\"");
}

#[test]
fn catalog_for_unknown_panel_is_rejected() {
    let po = "msgctxt \"T_Missing\"\nmsgid \"x\"\nmsgstr \"y\"\n";
    let catalog = Catalog::from_po(po).unwrap();

    let mut layout = dialog();
    assert!(matches!(
        inject_strings(&mut layout, &catalog.to_entries()),
        Err(Error::Reference(_))
    ));
    assert_eq!(layout, dialog());
}
