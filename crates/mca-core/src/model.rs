use std::fmt::Write as _;

use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Random v4-style UUID string (hyphenated, lowercase hex).
///
/// Used for pack header UUIDs, module UUIDs, and content item ids. Uniqueness
/// is probabilistic; collisions within a session are not a concern at 122 bits.
pub fn new_uuid() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes[6] = (bytes[6] & 0x0f) | 0x40; // version 4
    bytes[8] = (bytes[8] & 0x3f) | 0x80; // RFC 4122 variant
    let mut out = String::with_capacity(36);
    for (i, b) in bytes.iter().enumerate() {
        if matches!(i, 4 | 6 | 8 | 10) {
            out.push('-');
        }
        write!(&mut out, "{:02x}", b).ok();
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddonType {
    Entity,
    Item,
    Block,
    Recipe,
}

impl AddonType {
    pub const ALL: [AddonType; 4] = [
        AddonType::Entity,
        AddonType::Item,
        AddonType::Block,
        AddonType::Recipe,
    ];

    /// Subfolder this kind of content lives under inside a pack.
    pub fn type_folder(&self) -> &'static str {
        match self {
            AddonType::Entity => "entities",
            AddonType::Item => "items",
            AddonType::Block => "blocks",
            AddonType::Recipe => "recipes",
        }
    }

    /// Root key of the behavior JSON skeleton for this kind of content.
    pub fn behavior_root_key(&self) -> &'static str {
        match self {
            AddonType::Entity => "minecraft:entity",
            AddonType::Item => "minecraft:item",
            AddonType::Block => "minecraft:block",
            AddonType::Recipe => "minecraft:recipe_shaped",
        }
    }
}

impl core::fmt::Display for AddonType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            AddonType::Entity => "entity",
            AddonType::Item => "item",
            AddonType::Block => "block",
            AddonType::Recipe => "recipe",
        };
        f.write_str(s)
    }
}

/// Which half of the add-on a pack-level operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackKind {
    Behavior,
    Resource,
}

/// Pack-level metadata for the whole add-on. Exactly one per project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub description: String,
    pub version: [u32; 3],
    pub uuid_bp: String,
    pub uuid_rp: String,
}

impl Manifest {
    pub fn new() -> Self {
        Self {
            name: "My Epic Addon".to_string(),
            description: "Created with MCAddon Studio".to_string(),
            version: [1, 0, 0],
            uuid_bp: new_uuid(),
            uuid_rp: new_uuid(),
        }
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

/// One user-authored unit of add-on content.
///
/// `behavior_json` and `resource_json` are opaque text: the model never
/// requires them to be valid JSON. Only the preview extractor and the
/// exporter's trivial-content check look inside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: AddonType,
    pub description: String,
    pub behavior_json: String,
    pub resource_json: String,
}

impl ContentItem {
    /// Fresh item with a type-appropriate behavior skeleton. The skeleton is
    /// guaranteed to parse under [`crate::preview::extract`].
    pub fn new(ty: AddonType) -> Self {
        Self {
            id: new_uuid(),
            name: format!("New {}", ty),
            content_type: ty,
            description: String::new(),
            behavior_json: default_behavior_json(ty),
            resource_json: "{}".to_string(),
        }
    }
}

pub fn default_behavior_json(ty: AddonType) -> String {
    format!(
        "{{\n  \"format_version\": \"1.20.0\",\n  \"{}\": {{\n    \"description\": {{\n      \"identifier\": \"my_addon:new_{}\"\n    }},\n    \"components\": {{}}\n  }}\n}}",
        ty.behavior_root_key(),
        ty
    )
}

/// The whole in-memory project for one session: one manifest plus an ordered
/// item list. Item order is insertion order; export does not depend on it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    pub manifest: Manifest,
    #[serde(default)]
    pub items: Vec<ContentItem>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(&self, id: &str) -> Option<&ContentItem> {
        self.items.iter().find(|c| c.id == id)
    }

    pub fn add_item(&mut self, ty: AddonType) -> &ContentItem {
        self.items.push(ContentItem::new(ty));
        &self.items[self.items.len() - 1]
    }

    /// Replace the stored item with matching id by full value. Silent no-op
    /// when no item has that id: updates are idempotent keyed by id.
    pub fn update_item(&mut self, updated: ContentItem) {
        if let Some(slot) = self.items.iter_mut().find(|c| c.id == updated.id) {
            *slot = updated;
        }
    }

    /// Remove the item with matching id. No-op if absent.
    pub fn remove_item(&mut self, id: &str) {
        self.items.retain(|c| c.id != id);
    }

    /// Replace one of the manifest pack UUIDs with a fresh value. Everything
    /// else in the manifest is untouched.
    pub fn regenerate_pack_id(&mut self, kind: PackKind) {
        match kind {
            PackKind::Behavior => self.manifest.uuid_bp = new_uuid(),
            PackKind::Resource => self.manifest.uuid_rp = new_uuid(),
        }
    }
}
