use serde_json::Value;

/// Display facts derived from one item's behavior JSON.
///
/// Every field degrades to a default instead of failing: `extract` accepts
/// arbitrarily malformed text and partial structures at every level.
#[derive(Debug, Clone)]
pub struct Preview {
    pub parsed_ok: bool,
    /// First top-level key with a `minecraft:` prefix, empty if none.
    pub root_key: String,
    pub identifier: String,
    pub components: serde_json::Map<String, Value>,
}

impl Default for Preview {
    fn default() -> Self {
        Self {
            parsed_ok: false,
            root_key: String::new(),
            identifier: "unknown".to_string(),
            components: serde_json::Map::new(),
        }
    }
}

/// Best-effort extraction over behavior JSON text. Never fails; malformed
/// input yields the all-defaults bundle with `parsed_ok == false`.
pub fn extract(behavior_json: &str) -> Preview {
    let Ok(doc) = serde_json::from_str::<Value>(behavior_json) else {
        return Preview::default();
    };
    let root_key = doc
        .as_object()
        .and_then(|m| m.keys().find(|k| k.starts_with("minecraft:")))
        .cloned()
        .unwrap_or_default();
    let root = doc.get(root_key.as_str());
    let identifier = root
        .and_then(|r| r.get("description"))
        .and_then(|d| d.get("identifier"))
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    let components = root
        .and_then(|r| r.get("components"))
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    Preview {
        parsed_ok: true,
        root_key,
        identifier,
        components,
    }
}

impl Preview {
    pub fn has_component(&self, key: &str) -> bool {
        self.components.contains_key(key)
    }

    fn component_number(&self, key: &str, field: &str) -> Option<f64> {
        self.components.get(key)?.get(field)?.as_f64()
    }

    /// Health from the health component's `value`, else its `max`.
    pub fn health(&self) -> Option<f64> {
        self.component_number("minecraft:health", "value")
            .or_else(|| self.component_number("minecraft:health", "max"))
    }

    pub fn movement_speed(&self) -> Option<f64> {
        self.component_number("minecraft:movement", "value")
    }

    pub fn is_tool(&self) -> bool {
        self.has_component("minecraft:hand_equipped")
    }

    pub fn is_consumable(&self) -> bool {
        self.has_component("minecraft:food")
    }

    /// Up to `limit` component keys, in document order, for generic display.
    pub fn component_keys(&self, limit: usize) -> Vec<&str> {
        self.components
            .keys()
            .take(limit)
            .map(String::as_str)
            .collect()
    }
}
