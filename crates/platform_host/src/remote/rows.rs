//! Typed row shapes for each [`RemoteTable`](super::RemoteTable).
//!
//! Column names match the backend schema. Timestamps are unix milliseconds in Rust and ISO-8601
//! strings on the wire (see [`timestamp`](super::timestamp)).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::timestamp::option_rfc3339;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// `player_data` row.
pub struct PlayerDataRow {
    /// Owning user.
    pub user_id: String,
    /// Record group (for example `settings`).
    pub data_type: String,
    /// Slot within the group (for example `main`).
    pub data_key: String,
    /// Arbitrary payload.
    #[serde(default)]
    pub data_value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// `mission_progress` row.
pub struct MissionProgressRow {
    /// Owning user.
    pub user_id: String,
    /// Mission identifier.
    pub mission_id: String,
    /// Mission category.
    #[serde(default)]
    pub mission_type: Option<String>,
    /// Free-form status (`available`, `in_progress`, `completed`, ...).
    #[serde(default)]
    pub status: Option<String>,
    /// Completion percentage.
    #[serde(default)]
    pub progress_percentage: u32,
    /// Number of attempts.
    #[serde(default)]
    pub attempts: u32,
    /// Best completion time in seconds.
    #[serde(default)]
    pub best_time: Option<u64>,
    /// Credits earned.
    #[serde(default)]
    pub reward_earned: i64,
    /// First start time.
    #[serde(default, with = "option_rfc3339")]
    pub started_at: Option<u64>,
    /// Completion time.
    #[serde(default, with = "option_rfc3339")]
    pub completed_at: Option<u64>,
    /// Stamped on every save.
    #[serde(default, with = "option_rfc3339")]
    pub last_attempt_at: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// `player_inventory` row.
pub struct InventoryRow {
    /// Owning user.
    pub user_id: String,
    /// Item identifier.
    pub item_id: String,
    /// Display name.
    #[serde(default)]
    pub item_name: Option<String>,
    /// Item kind (`tool`, `exploit`, ...).
    #[serde(default)]
    pub item_type: Option<String>,
    /// Owned quantity.
    #[serde(default)]
    pub quantity: u32,
    /// Price paid.
    #[serde(default)]
    pub purchase_price: Option<i64>,
    /// Purchase time.
    #[serde(default, with = "option_rfc3339")]
    pub purchased_at: Option<u64>,
    /// Last use time.
    #[serde(default, with = "option_rfc3339")]
    pub last_used_at: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// `player_statistics` row.
pub struct StatisticRow {
    /// Owning user.
    pub user_id: String,
    /// Statistic name.
    pub stat_name: String,
    /// Current value.
    pub stat_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// `game_sessions` row.
pub struct GameSessionRow {
    /// Backend-generated identifier; absent on insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owning user.
    pub user_id: String,
    /// Session start.
    #[serde(default, with = "option_rfc3339")]
    pub session_start: Option<u64>,
    /// Session end, set by the closing update.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "option_rfc3339")]
    pub session_end: Option<u64>,
    /// Client user agent when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Seconds played.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_playtime: Option<u64>,
    /// Missions completed during the session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missions_completed_in_session: Option<u32>,
    /// Credits earned during the session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits_earned_in_session: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// `achievements` row.
pub struct AchievementRow {
    /// Owning user.
    pub user_id: String,
    /// Achievement identifier.
    pub achievement_id: String,
    /// Display name.
    #[serde(default)]
    pub achievement_name: String,
    /// Display description.
    #[serde(default)]
    pub achievement_description: String,
    /// Unlock time.
    #[serde(default, with = "option_rfc3339")]
    pub unlocked_at: Option<u64>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn game_session_insert_omits_generated_and_closing_columns() {
        let row = GameSessionRow {
            id: None,
            user_id: "u1".to_string(),
            session_start: Some(10),
            session_end: None,
            user_agent: None,
            total_playtime: None,
            missions_completed_in_session: None,
            credits_earned_in_session: None,
        };
        assert_eq!(
            serde_json::to_value(&row).expect("serialize"),
            json!({"user_id": "u1", "session_start": "1970-01-01T00:00:00.010Z"})
        );
    }

    #[test]
    fn sparse_rows_decode_with_defaults() {
        let row: InventoryRow =
            serde_json::from_value(json!({"user_id": "u1", "item_id": "nmap"})).expect("decode");
        assert_eq!(row.quantity, 0);
        assert_eq!(row.item_type, None);
    }

    #[test]
    fn server_stamped_timestamps_decode_to_millis() {
        let row: AchievementRow = serde_json::from_value(json!({
            "user_id": "u1",
            "achievement_id": "first-hack",
            "unlocked_at": "2024-05-01T12:00:00.123456+00:00"
        }))
        .expect("decode");
        assert_eq!(row.unlocked_at, Some(1_714_564_800_123));

        let row: InventoryRow = serde_json::from_value(
            json!({"user_id": "u1", "item_id": "nmap", "purchased_at": null, "last_used_at": 5}),
        )
        .expect("decode");
        assert_eq!(row.purchased_at, None);
        assert_eq!(row.last_used_at, Some(5));
    }

    #[test]
    fn malformed_timestamp_is_a_decode_error() {
        let decoded = serde_json::from_value::<AchievementRow>(json!({
            "user_id": "u1",
            "achievement_id": "a",
            "unlocked_at": "not a date"
        }));
        assert!(decoded.is_err());
    }
}
