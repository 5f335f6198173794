use std::fs;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};

use serde_json::json;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::FileOptions;

use crate::model::{Manifest, PackKind, Project, new_uuid};

/// File extension Bedrock associates with a packaged add-on.
pub const PACK_EXTENSION: &str = "mcaddon";

/// Filesystem-safe name: lowercased, each whitespace run collapsed to one
/// underscore. Leading/trailing runs collapse too, so " A  B " -> "_a_b_".
/// Two items slugging to the same name in the same type folder are not
/// deduplicated; the later entry wins when the archive is read back.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_ws = false;
    for ch in name.to_lowercase().chars() {
        if ch.is_whitespace() {
            if !prev_ws {
                out.push('_');
            }
            prev_ws = true;
        } else {
            out.push(ch);
            prev_ws = false;
        }
    }
    out
}

pub fn suggested_file_name(manifest: &Manifest) -> String {
    format!("{}.{}", slugify(&manifest.name), PACK_EXTENSION)
}

// Content contributes a pack file only when it is more than the empty-object
// literal. The text itself is emitted verbatim, never validated.
fn is_trivial_json(text: &str) -> bool {
    let t = text.trim();
    t.is_empty() || t == "{}"
}

fn pack_manifest(manifest: &Manifest, kind: PackKind) -> serde_json::Value {
    let (suffix, module_type, uuid) = match kind {
        PackKind::Behavior => ("BP", "data", &manifest.uuid_bp),
        PackKind::Resource => ("RP", "resources", &manifest.uuid_rp),
    };
    json!({
        "format_version": 2,
        "header": {
            "name": format!("{} {}", manifest.name, suffix),
            "description": manifest.description,
            "uuid": uuid,
            "version": manifest.version,
            "min_engine_version": [1, 20, 0],
        },
        // Module UUIDs are generated fresh at export time on purpose, so two
        // exports of the same project differ here.
        "modules": [{
            "type": module_type,
            "uuid": new_uuid(),
            "version": [1, 0, 0],
        }],
    })
}

/// Package a project snapshot into .mcaddon archive bytes.
///
/// Layout: `"<name> BP"` and `"<name> RP"` sibling folders, one generated
/// manifest.json each, plus `<type-folder>/<slug>.json` per item whose JSON
/// text is non-trivial (checked independently per pack).
pub fn build_archive(project: &Project) -> io::Result<Vec<u8>> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    let bp_dir = format!("{} BP", project.manifest.name);
    let rp_dir = format!("{} RP", project.manifest.name);

    zip.add_directory(bp_dir.as_str(), options)?;
    zip.start_file(format!("{}/manifest.json", bp_dir), options)?;
    let bp = serde_json::to_string_pretty(&pack_manifest(&project.manifest, PackKind::Behavior))?;
    zip.write_all(bp.as_bytes())?;

    zip.add_directory(rp_dir.as_str(), options)?;
    zip.start_file(format!("{}/manifest.json", rp_dir), options)?;
    let rp = serde_json::to_string_pretty(&pack_manifest(&project.manifest, PackKind::Resource))?;
    zip.write_all(rp.as_bytes())?;

    for item in &project.items {
        let folder = item.content_type.type_folder();
        let slug = slugify(&item.name);
        if !is_trivial_json(&item.behavior_json) {
            zip.start_file(format!("{}/{}/{}.json", bp_dir, folder, slug), options)?;
            zip.write_all(item.behavior_json.as_bytes())?;
        }
        if !is_trivial_json(&item.resource_json) {
            zip.start_file(format!("{}/{}/{}.json", rp_dir, folder, slug), options)?;
            zip.write_all(item.resource_json.as_bytes())?;
        }
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

pub fn export_to_file(project: &Project, path: &Path) -> io::Result<()> {
    let bytes = build_archive(project)?;
    fs::write(path, bytes)
}

/// Zip an already-unpacked add-on directory (one holding the BP/RP trees)
/// into a sibling `<slug>.mcaddon`. Non-destructive.
pub fn pack_addon_dir(dir: &Path) -> io::Result<PathBuf> {
    if !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a directory",
        ));
    }
    let parent = dir.parent().unwrap_or(Path::new("."));
    let name = dir.file_name().and_then(|s| s.to_str()).unwrap_or("addon");
    let dest = parent.join(format!("{}.{}", slugify(name), PACK_EXTENSION));

    let file = fs::File::create(&dest)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| io::Error::other(e.to_string()))?;
        let path = entry.path();
        let rel = path.strip_prefix(dir).unwrap();
        if rel.as_os_str().is_empty() {
            continue;
        }
        let name = rel.to_string_lossy().replace('\\', "/");
        if path.is_dir() {
            zip.add_directory(name, options)?;
        } else {
            zip.start_file(name, options)?;
            let data = fs::read(path)?;
            zip.write_all(&data)?;
        }
    }
    zip.finish()?;
    Ok(dest)
}
