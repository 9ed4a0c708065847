//! Player record shapes handed to and returned from the façade.
//!
//! Field names serialize in camelCase, which is also the layout of the local fallback store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Data type holding player settings.
pub const SETTINGS_DATA_TYPE: &str = "settings";
/// Data type holding the player profile.
pub const PROFILE_DATA_TYPE: &str = "profile";
/// Data type holding notes.
pub const NOTES_DATA_TYPE: &str = "notes";
/// Default slot within a data type.
pub const MAIN_DATA_KEY: &str = "main";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Identifier of the player owning a record.
pub struct UserId(String);

impl UserId {
    /// Wraps a raw identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// String form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Opaque identifier of a started game session.
pub struct SessionId(String);

impl SessionId {
    /// Wraps a backend-issued identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// String form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Progress on one mission.
pub struct MissionProgress {
    /// Mission category.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mission_type: Option<String>,
    /// Free-form status (`in_progress`, `completed`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Completion percentage.
    #[serde(default)]
    pub progress: u32,
    /// Attempts so far.
    #[serde(default)]
    pub attempts: u32,
    /// Best completion time in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_time: Option<u64>,
    /// Credits earned.
    #[serde(default)]
    pub reward_earned: i64,
    /// First start (unix ms).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<u64>,
    /// Completion (unix ms).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One owned item.
pub struct InventoryItem {
    /// Item identifier; stores overwrite it with the key passed to `save_inventory_item`.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Item kind (`tool`, `exploit`, ...).
    #[serde(rename = "type", default)]
    pub item_type: String,
    /// Owned quantity.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Price paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<i64>,
    /// Purchase time (unix ms).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchased_at: Option<u64>,
    /// Last use (unix ms).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<u64>,
}

fn default_quantity() -> u32 {
    1
}

/// Item kind marking installable terminal tools.
pub const TOOL_ITEM_TYPE: &str = "tool";

impl InventoryItem {
    /// Single item with no purchase metadata.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        item_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            item_type: item_type.into(),
            quantity: 1,
            purchase_price: None,
            purchased_at: None,
            last_used_at: None,
        }
    }

    /// Sets the purchase price.
    pub fn with_price(mut self, price: i64) -> Self {
        self.purchase_price = Some(price);
        self
    }

    /// Returns `true` for installable tools.
    pub fn is_tool(&self) -> bool {
        self.item_type == TOOL_ITEM_TYPE
    }

    /// Applies the save-time defaults: quantity at least one, purchase time stamped.
    pub(crate) fn normalized(&self, id: &str, now_ms: u64) -> Self {
        Self {
            id: id.to_string(),
            quantity: self.quantity.max(1),
            purchased_at: self.purchased_at.or(Some(now_ms)),
            ..self.clone()
        }
    }

    /// Overlays `update` onto `self`; optional fields absent from `update` are kept.
    pub(crate) fn merged_with(&self, update: Self) -> Self {
        Self {
            id: update.id,
            name: update.name,
            item_type: update.item_type,
            quantity: update.quantity,
            purchase_price: update.purchase_price.or(self.purchase_price),
            purchased_at: update.purchased_at.or(self.purchased_at),
            last_used_at: update.last_used_at.or(self.last_used_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One unlocked achievement.
pub struct Achievement {
    /// Achievement identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Display description.
    #[serde(default)]
    pub description: String,
    /// First unlock time (unix ms).
    #[serde(default)]
    pub unlocked_at: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Closing figures recorded when a game session ends.
pub struct SessionStats {
    /// Seconds played.
    pub playtime: u64,
    /// Missions completed during the session.
    pub missions_completed: u32,
    /// Credits earned during the session.
    pub credits_earned: i64,
}

/// Statistic values keyed by name.
pub type Statistics = BTreeMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Aggregate returned by
/// [`DatabaseManager::load_complete_profile`](crate::DatabaseManager::load_complete_profile).
pub struct CompleteProfile {
    /// Every `settings` record keyed by slot.
    pub settings: BTreeMap<String, Value>,
    /// Mission progress keyed by mission id.
    pub mission_progress: BTreeMap<String, MissionProgress>,
    /// Owned items.
    pub inventory: Vec<InventoryItem>,
    /// Statistics keyed by name.
    pub statistics: Statistics,
    /// Unlocked achievements.
    pub achievements: Vec<Achievement>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn inventory_item_uses_camel_case_layout() {
        let item = InventoryItem::new("nmap", "Nmap", "tool").with_price(1500);
        assert_eq!(
            serde_json::to_value(&item).expect("serialize"),
            json!({
                "id": "nmap",
                "name": "Nmap",
                "type": "tool",
                "quantity": 1,
                "purchasePrice": 1500
            })
        );
    }

    #[test]
    fn normalized_defaults_quantity_and_purchase_time() {
        let mut item = InventoryItem::new("x", "X", "tool");
        item.quantity = 0;
        let normalized = item.normalized("renamed", 42);
        assert_eq!(normalized.id, "renamed");
        assert_eq!(normalized.quantity, 1);
        assert_eq!(normalized.purchased_at, Some(42));

        let stamped = InventoryItem {
            purchased_at: Some(7),
            ..item
        };
        assert_eq!(stamped.normalized("x", 42).purchased_at, Some(7));
    }

    #[test]
    fn merge_keeps_optional_fields_missing_from_update() {
        let existing = InventoryItem {
            last_used_at: Some(5),
            ..InventoryItem::new("x", "Old", "tool").with_price(100)
        };
        let update = InventoryItem {
            quantity: 3,
            ..InventoryItem::new("x", "New", "tool")
        };
        let merged = existing.merged_with(update);
        assert_eq!(merged.name, "New");
        assert_eq!(merged.quantity, 3);
        assert_eq!(merged.purchase_price, Some(100));
        assert_eq!(merged.last_used_at, Some(5));
    }

    #[test]
    fn sparse_mission_progress_decodes_with_defaults() {
        let progress: MissionProgress =
            serde_json::from_value(json!({"status": "in_progress"})).expect("decode");
        assert_eq!(progress.status.as_deref(), Some("in_progress"));
        assert_eq!(progress.attempts, 0);
        assert_eq!(progress.mission_type, None);
    }
}
