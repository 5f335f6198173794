use std::io::{Cursor, Read as _};

use mca_core::model::{AddonType, ContentItem, PackKind, Project};

fn read_entry(archive: &mut zip::ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
    let mut s = String::new();
    archive
        .by_name(name)
        .unwrap_or_else(|_| panic!("missing entry {}", name))
        .read_to_string(&mut s)
        .unwrap();
    s
}

fn open_archive(project: &Project) -> zip::ZipArchive<Cursor<Vec<u8>>> {
    let bytes = mca_core::build_archive(project).expect("build archive");
    zip::ZipArchive::new(Cursor::new(bytes)).expect("read archive")
}

const ZOMBIE_BEHAVIOR: &str = r#"{"format_version":"1.20.0","minecraft:entity":{"description":{"identifier":"my_addon:zombie_king"},"components":{"minecraft:health":{"value":40}}}}"#;

fn zombie_project() -> Project {
    let mut project = Project::new();
    project.manifest.name = "Test Pack".to_string();
    project.manifest.version = [1, 0, 0];
    let id = project.add_item(AddonType::Entity).id.clone();
    let mut item = project.item(&id).unwrap().clone();
    item.name = "Zombie King".to_string();
    item.behavior_json = ZOMBIE_BEHAVIOR.to_string();
    item.resource_json = "{}".to_string();
    project.update_item(item);
    project
}

#[test]
fn new_uuid_shape_and_uniqueness() {
    let a = mca_core::new_uuid();
    let b = mca_core::new_uuid();
    assert_ne!(a, b);
    assert_eq!(a.len(), 36);
    for (i, ch) in a.chars().enumerate() {
        if matches!(i, 8 | 13 | 18 | 23) {
            assert_eq!(ch, '-');
        } else {
            assert!(ch.is_ascii_hexdigit());
        }
    }
    assert_eq!(a.as_bytes()[14], b'4');
}

#[test]
fn new_items_have_parseable_skeletons() {
    for ty in AddonType::ALL {
        let item = ContentItem::new(ty);
        assert_eq!(item.name, format!("New {}", ty));
        assert_eq!(item.resource_json, "{}");
        let preview = mca_core::extract(&item.behavior_json);
        assert!(preview.parsed_ok, "skeleton for {} must parse", ty);
        assert_eq!(preview.root_key, ty.behavior_root_key());
        assert!(preview.identifier.starts_with("my_addon:"));
        assert!(preview.components.is_empty());
    }
}

#[test]
fn update_item_is_idempotent_by_id() {
    let mut project = Project::new();
    let id = project.add_item(AddonType::Item).id.clone();
    let mut edited = project.item(&id).unwrap().clone();
    edited.name = "Ruby Sword".to_string();

    project.update_item(edited.clone());
    let once = project.clone();
    project.update_item(edited);
    assert_eq!(project.items.len(), once.items.len());
    assert_eq!(project.item(&id).unwrap().name, "Ruby Sword");

    // Unknown id leaves the project untouched.
    let mut stray = ContentItem::new(AddonType::Block);
    stray.name = "Never Stored".to_string();
    project.update_item(stray);
    assert_eq!(project.items.len(), 1);
    assert_eq!(project.item(&id).unwrap().name, "Ruby Sword");
}

#[test]
fn remove_item_noop_on_unknown_id() {
    let mut project = Project::new();
    let id = project.add_item(AddonType::Recipe).id.clone();
    project.remove_item("not-an-id");
    assert_eq!(project.items.len(), 1);
    project.remove_item(&id);
    assert!(project.items.is_empty());
    project.remove_item(&id);
    assert!(project.items.is_empty());
}

#[test]
fn regenerate_pack_id_touches_only_that_field() {
    let mut project = Project::new();
    let before = project.manifest.clone();
    project.regenerate_pack_id(PackKind::Behavior);
    assert_ne!(project.manifest.uuid_bp, before.uuid_bp);
    assert_eq!(project.manifest.uuid_rp, before.uuid_rp);
    assert_eq!(project.manifest.name, before.name);
    assert_eq!(project.manifest.version, before.version);

    let bp = project.manifest.uuid_bp.clone();
    project.regenerate_pack_id(PackKind::Resource);
    assert_eq!(project.manifest.uuid_bp, bp);
    assert_ne!(project.manifest.uuid_rp, before.uuid_rp);
}

#[test]
fn slugify_collapses_whitespace_runs() {
    assert_eq!(mca_core::slugify("Zombie King"), "zombie_king");
    assert_eq!(mca_core::slugify("A  B\tC"), "a_b_c");
    assert_eq!(mca_core::slugify("UPPER"), "upper");
    assert_eq!(mca_core::slugify(" pad "), "_pad_");
    assert_eq!(mca_core::slugify(""), "");
}

#[test]
fn suggested_file_name_uses_manifest_slug() {
    let mut project = Project::new();
    project.manifest.name = "Test Pack".to_string();
    assert_eq!(
        mca_core::suggested_file_name(&project.manifest),
        "test_pack.mcaddon"
    );
}

#[test]
fn export_round_trip_zombie_king() {
    let project = zombie_project();
    let mut archive = open_archive(&project);

    let behavior = read_entry(&mut archive, "Test Pack BP/entities/zombie_king.json");
    assert_eq!(behavior, ZOMBIE_BEHAVIOR);

    let bp: serde_json::Value =
        serde_json::from_str(&read_entry(&mut archive, "Test Pack BP/manifest.json")).unwrap();
    assert_eq!(bp["format_version"], 2);
    assert_eq!(bp["header"]["name"], "Test Pack BP");
    assert_eq!(bp["header"]["uuid"], project.manifest.uuid_bp.as_str());
    assert_eq!(bp["header"]["version"], serde_json::json!([1, 0, 0]));
    assert_eq!(bp["header"]["min_engine_version"], serde_json::json!([1, 20, 0]));
    assert_eq!(bp["modules"][0]["type"], "data");

    let rp: serde_json::Value =
        serde_json::from_str(&read_entry(&mut archive, "Test Pack RP/manifest.json")).unwrap();
    assert_eq!(rp["header"]["uuid"], project.manifest.uuid_rp.as_str());
    assert_eq!(rp["modules"][0]["type"], "resources");

    // resource_json was the empty object, so the RP holds only its manifest.
    let names: Vec<String> = archive.file_names().map(|n| n.to_string()).collect();
    assert!(!names.iter().any(|n| n.starts_with("Test Pack RP/entities")));
    let manifests = names.iter().filter(|n| n.ends_with("manifest.json")).count();
    assert_eq!(manifests, 2);
}

#[test]
fn export_empty_project_has_only_manifests() {
    let mut project = Project::new();
    project.manifest.name = "Empty Pack".to_string();
    let archive = open_archive(&project);
    let files: Vec<&str> = archive.file_names().filter(|n| !n.ends_with('/')).collect();
    assert_eq!(files.len(), 2);
    assert!(files.contains(&"Empty Pack BP/manifest.json"));
    assert!(files.contains(&"Empty Pack RP/manifest.json"));
}

#[test]
fn inclusion_rule_is_independent_per_pack() {
    let mut project = Project::new();
    project.manifest.name = "Pack".to_string();

    let id = project.add_item(AddonType::Item).id.clone();
    let mut item = project.item(&id).unwrap().clone();
    item.name = "Both".to_string();
    item.behavior_json = r#"{"a":1}"#.to_string();
    item.resource_json = r#"{"b":2}"#.to_string();
    project.update_item(item);

    let id = project.add_item(AddonType::Item).id.clone();
    let mut item = project.item(&id).unwrap().clone();
    item.name = "Neither".to_string();
    item.behavior_json = "  {}  ".to_string();
    item.resource_json = String::new();
    project.update_item(item);

    let archive = open_archive(&project);
    let names: Vec<&str> = archive.file_names().collect();
    assert!(names.contains(&"Pack BP/items/both.json"));
    assert!(names.contains(&"Pack RP/items/both.json"));
    assert!(!names.iter().any(|n| n.contains("neither")));
}

#[test]
fn module_uuids_are_fresh_per_export() {
    let project = zombie_project();
    let mut first = open_archive(&project);
    let mut second = open_archive(&project);
    let a: serde_json::Value =
        serde_json::from_str(&read_entry(&mut first, "Test Pack BP/manifest.json")).unwrap();
    let b: serde_json::Value =
        serde_json::from_str(&read_entry(&mut second, "Test Pack BP/manifest.json")).unwrap();
    assert_ne!(a["modules"][0]["uuid"], b["modules"][0]["uuid"]);
    // While the header UUID stays the project's own.
    assert_eq!(a["header"]["uuid"], b["header"]["uuid"]);
}

#[test]
fn extract_never_fails_on_garbage() {
    for text in ["", "not json {{{", "[1,2,3", "\"str", "}{"] {
        let p = mca_core::extract(text);
        assert!(!p.parsed_ok, "{:?} must not parse", text);
        assert_eq!(p.identifier, "unknown");
        assert!(p.root_key.is_empty());
        assert!(p.components.is_empty());
    }
}

#[test]
fn extract_degrades_on_partial_structures() {
    // No minecraft:-prefixed root key.
    let p = mca_core::extract(r#"{"foo":{"description":{"identifier":"x"}}}"#);
    assert!(p.parsed_ok);
    assert!(p.root_key.is_empty());
    assert_eq!(p.identifier, "unknown");

    // Description present but wrong-typed.
    let p = mca_core::extract(r#"{"minecraft:entity":{"description":5}}"#);
    assert!(p.parsed_ok);
    assert_eq!(p.root_key, "minecraft:entity");
    assert_eq!(p.identifier, "unknown");

    // Identifier not a string.
    let p = mca_core::extract(r#"{"minecraft:entity":{"description":{"identifier":7}}}"#);
    assert_eq!(p.identifier, "unknown");

    // Components wrong-typed.
    let p = mca_core::extract(r#"{"minecraft:entity":{"components":[1,2]}}"#);
    assert!(p.components.is_empty());

    // Non-object root document.
    let p = mca_core::extract("[1,2,3]");
    assert!(p.parsed_ok);
    assert_eq!(p.identifier, "unknown");
    assert!(p.components.is_empty());
}

#[test]
fn preview_reports_zombie_king_facts() {
    let p = mca_core::extract(ZOMBIE_BEHAVIOR);
    assert!(p.parsed_ok);
    assert_eq!(p.identifier, "my_addon:zombie_king");
    assert_eq!(p.health(), Some(40.0));
    assert_eq!(p.movement_speed(), None);
    assert_eq!(p.component_keys(4), vec!["minecraft:health"]);
}

#[test]
fn preview_health_falls_back_to_max() {
    let p = mca_core::extract(
        r#"{"minecraft:entity":{"components":{"minecraft:health":{"max":20}}}}"#,
    );
    assert_eq!(p.health(), Some(20.0));
    let p = mca_core::extract(r#"{"minecraft:entity":{"components":{"minecraft:health":{}}}}"#);
    assert_eq!(p.health(), None);
}

#[test]
fn preview_item_badges() {
    let p = mca_core::extract(
        r#"{"minecraft:item":{"components":{"minecraft:hand_equipped":true,"minecraft:food":{"nutrition":4}}}}"#,
    );
    assert!(p.is_tool());
    assert!(p.is_consumable());
    let p = mca_core::extract(r#"{"minecraft:item":{"components":{}}}"#);
    assert!(!p.is_tool());
    assert!(!p.is_consumable());
}

#[test]
fn project_json_round_trips() {
    let project = zombie_project();
    let text = serde_json::to_string_pretty(&project).unwrap();
    let back: Project = serde_json::from_str(&text).unwrap();
    assert_eq!(back.manifest.uuid_bp, project.manifest.uuid_bp);
    assert_eq!(back.items.len(), 1);
    assert_eq!(back.items[0].content_type, AddonType::Entity);
    assert_eq!(back.items[0].behavior_json, ZOMBIE_BEHAVIOR);
}

#[test]
fn pack_addon_dir_zips_existing_tree() {
    use std::io::Write as _;
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("My Addon");
    std::fs::create_dir_all(dir.join("My Addon BP/entities")).unwrap();
    let mut f = std::fs::File::create(dir.join("My Addon BP/manifest.json")).unwrap();
    writeln!(&mut f, "{{}}").unwrap();

    let dest = mca_core::pack_addon_dir(&dir).unwrap();
    assert_eq!(
        dest.file_name().and_then(|s| s.to_str()),
        Some("my_addon.mcaddon")
    );
    let file = std::fs::File::open(&dest).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    assert!(archive.by_name("My Addon BP/manifest.json").is_ok());
}

#[test]
fn generation_response_parsing() {
    let reply = serde_json::json!({
        "candidates": [{
            "content": {
                "parts": [{
                    "text": "{\"behavior_json\":\"{\\\"a\\\":1}\",\"resource_json\":\"{}\",\"explanation\":\"demo\"}"
                }]
            }
        }]
    });
    let text = mca_core::generate::candidate_text(&reply).expect("candidate text");
    let generated = mca_core::generate::parse_generated(text).expect("payload");
    assert_eq!(generated.behavior_json, "{\"a\":1}");
    assert_eq!(generated.resource_json, "{}");
    assert_eq!(generated.explanation.as_deref(), Some("demo"));

    // Both JSON fields are required.
    assert!(mca_core::generate::parse_generated(r#"{"behavior_json":"{}"}"#).is_err());
    assert!(mca_core::generate::parse_generated("nope").is_err());
    assert!(mca_core::generate::candidate_text(&serde_json::json!({"candidates": []})).is_none());
}
