//! Remote table strategy.

use std::{collections::BTreeMap, rc::Rc};

use platform_host::{
    insert_row_with, rfc3339_from_ms, select_rows_with, upsert_row_with, AchievementRow, Clock,
    Filter, GameSessionRow, InventoryRow, MissionProgressRow, PlayerDataRow, RemoteError,
    RemoteTable, RemoteTables, StatisticRow, SystemClock,
};
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::StorageError,
    records::{
        Achievement, InventoryItem, MissionProgress, SessionId, SessionStats, Statistics, UserId,
    },
    store::{AchievementUnlock, PlayerStore, PlayerStoreFuture, StoreBackend},
};

/// [`PlayerStore`] over any [`RemoteTables`] backend.
pub struct RemotePlayerStore<R> {
    remote: R,
    clock: Rc<dyn Clock>,
}

impl<R: RemoteTables> RemotePlayerStore<R> {
    /// Creates a store stamping rows with the system clock.
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            clock: Rc::new(SystemClock),
        }
    }

    /// Replaces the clock used for row stamps.
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Underlying table backend.
    pub fn remote(&self) -> &R {
        &self.remote
    }

    async fn save_player_data_now(
        &self,
        user: &UserId,
        data_type: &str,
        data_key: &str,
        value: Value,
    ) -> Result<(), StorageError> {
        let row = PlayerDataRow {
            user_id: user.to_string(),
            data_type: data_type.to_string(),
            data_key: data_key.to_string(),
            data_value: value,
        };
        upsert_row_with(&self.remote, RemoteTable::PlayerData, &row).await?;
        Ok(())
    }

    async fn load_player_data_now(
        &self,
        user: &UserId,
        data_type: &str,
        data_key: &str,
    ) -> Result<Option<Value>, StorageError> {
        let filters = [
            Filter::eq("user_id", user.as_str()),
            Filter::eq("data_type", data_type),
            Filter::eq("data_key", data_key),
        ];
        let rows: Vec<PlayerDataRow> =
            select_rows_with(&self.remote, RemoteTable::PlayerData, &filters).await?;
        Ok(rows.into_iter().next().map(|row| row.data_value))
    }

    async fn load_player_data_all_now(
        &self,
        user: &UserId,
        data_type: &str,
    ) -> Result<BTreeMap<String, Value>, StorageError> {
        let filters = [
            Filter::eq("user_id", user.as_str()),
            Filter::eq("data_type", data_type),
        ];
        let rows: Vec<PlayerDataRow> =
            select_rows_with(&self.remote, RemoteTable::PlayerData, &filters).await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.data_key, row.data_value))
            .collect())
    }

    async fn save_mission_progress_now(
        &self,
        user: &UserId,
        mission_id: &str,
        progress: &MissionProgress,
    ) -> Result<(), StorageError> {
        let row = MissionProgressRow {
            user_id: user.to_string(),
            mission_id: mission_id.to_string(),
            mission_type: progress.mission_type.clone(),
            status: progress.status.clone(),
            progress_percentage: progress.progress,
            attempts: progress.attempts,
            best_time: progress.best_time,
            reward_earned: progress.reward_earned,
            started_at: progress.started_at,
            completed_at: progress.completed_at,
            last_attempt_at: Some(self.clock.now_ms()),
        };
        self.upsert_sparse(RemoteTable::MissionProgress, &row).await
    }

    async fn load_mission_progress_now(
        &self,
        user: &UserId,
    ) -> Result<BTreeMap<String, MissionProgress>, StorageError> {
        let filters = [Filter::eq("user_id", user.as_str())];
        let rows: Vec<MissionProgressRow> =
            select_rows_with(&self.remote, RemoteTable::MissionProgress, &filters).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let progress = MissionProgress {
                    mission_type: row.mission_type,
                    status: row.status,
                    progress: row.progress_percentage,
                    attempts: row.attempts,
                    best_time: row.best_time,
                    reward_earned: row.reward_earned,
                    started_at: row.started_at,
                    completed_at: row.completed_at,
                };
                (row.mission_id, progress)
            })
            .collect())
    }

    async fn save_inventory_item_now(
        &self,
        user: &UserId,
        item_id: &str,
        item: &InventoryItem,
    ) -> Result<(), StorageError> {
        let item = item.normalized(item_id, self.clock.now_ms());
        let row = InventoryRow {
            user_id: user.to_string(),
            item_id: item.id,
            item_name: Some(item.name),
            item_type: Some(item.item_type),
            quantity: item.quantity,
            purchase_price: item.purchase_price,
            purchased_at: item.purchased_at,
            last_used_at: item.last_used_at,
        };
        self.upsert_sparse(RemoteTable::PlayerInventory, &row).await
    }

    async fn load_inventory_now(&self, user: &UserId) -> Result<Vec<InventoryItem>, StorageError> {
        let filters = [Filter::eq("user_id", user.as_str())];
        let rows: Vec<InventoryRow> =
            select_rows_with(&self.remote, RemoteTable::PlayerInventory, &filters).await?;
        Ok(rows
            .into_iter()
            .map(|row| InventoryItem {
                id: row.item_id,
                name: row.item_name.unwrap_or_default(),
                item_type: row.item_type.unwrap_or_default(),
                quantity: row.quantity.max(1),
                purchase_price: row.purchase_price,
                purchased_at: row.purchased_at,
                last_used_at: row.last_used_at,
            })
            .collect())
    }

    async fn update_statistic_now(
        &self,
        user: &UserId,
        stat_name: &str,
        value: f64,
    ) -> Result<(), StorageError> {
        let row = StatisticRow {
            user_id: user.to_string(),
            stat_name: stat_name.to_string(),
            stat_value: value,
        };
        upsert_row_with(&self.remote, RemoteTable::PlayerStatistics, &row).await?;
        Ok(())
    }

    async fn load_statistics_now(&self, user: &UserId) -> Result<Statistics, StorageError> {
        let filters = [Filter::eq("user_id", user.as_str())];
        let rows: Vec<StatisticRow> =
            select_rows_with(&self.remote, RemoteTable::PlayerStatistics, &filters).await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.stat_name, row.stat_value))
            .collect())
    }

    async fn start_game_session_now(
        &self,
        user: &UserId,
    ) -> Result<Option<SessionId>, StorageError> {
        let row = GameSessionRow {
            id: None,
            user_id: user.to_string(),
            session_start: Some(self.clock.now_ms()),
            session_end: None,
            user_agent: None,
            total_playtime: None,
            missions_completed_in_session: None,
            credits_earned_in_session: None,
        };
        let stored: GameSessionRow =
            insert_row_with(&self.remote, RemoteTable::GameSessions, &row).await?;
        match stored.id {
            Some(id) => Ok(Some(SessionId::new(id))),
            None => Err(RemoteError::new("game_sessions: insert returned no id").into()),
        }
    }

    async fn end_game_session_now(
        &self,
        session: &SessionId,
        stats: &SessionStats,
    ) -> Result<(), StorageError> {
        let filters = [Filter::eq("id", session.as_str())];
        let patch = serde_json::json!({
            "session_end": rfc3339_from_ms(self.clock.now_ms()),
            "total_playtime": stats.playtime,
            "missions_completed_in_session": stats.missions_completed,
            "credits_earned_in_session": stats.credits_earned,
        });
        self.remote
            .update(RemoteTable::GameSessions, &filters, patch)
            .await?;
        Ok(())
    }

    async fn unlock_achievement_now(
        &self,
        user: &UserId,
        unlock: &AchievementUnlock<'_>,
    ) -> Result<(), StorageError> {
        let row = AchievementRow {
            user_id: user.to_string(),
            achievement_id: unlock.id.to_string(),
            achievement_name: unlock.name.to_string(),
            achievement_description: unlock.description.to_string(),
            unlocked_at: Some(self.clock.now_ms()),
        };
        match insert_row_with::<_, _, Value>(&self.remote, RemoteTable::Achievements, &row).await {
            Ok(_) => Ok(()),
            Err(err) if err.is_unique_violation() => {
                log::debug!("achievement {} already unlocked for {user}", unlock.id);
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn load_achievements_now(&self, user: &UserId) -> Result<Vec<Achievement>, StorageError> {
        let filters = [Filter::eq("user_id", user.as_str())];
        let rows: Vec<AchievementRow> =
            select_rows_with(&self.remote, RemoteTable::Achievements, &filters).await?;
        Ok(rows
            .into_iter()
            .map(|row| Achievement {
                id: row.achievement_id,
                name: row.achievement_name,
                description: row.achievement_description,
                unlocked_at: row.unlocked_at.unwrap_or_default(),
            })
            .collect())
    }

    /// Upserts `row` without its null columns so an update keeps values it does not mention.
    async fn upsert_sparse<T: Serialize>(
        &self,
        table: RemoteTable,
        row: &T,
    ) -> Result<(), StorageError> {
        let mut value = serde_json::to_value(row).map_err(StorageError::codec)?;
        if let Some(object) = value.as_object_mut() {
            object.retain(|_, column| !column.is_null());
        }
        upsert_row_with(&self.remote, table, &value).await?;
        Ok(())
    }
}

impl<R: RemoteTables> PlayerStore for RemotePlayerStore<R> {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Remote
    }

    fn save_player_data<'a>(
        &'a self,
        user: &'a UserId,
        data_type: &'a str,
        data_key: &'a str,
        value: Value,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(self.save_player_data_now(user, data_type, data_key, value))
    }

    fn load_player_data<'a>(
        &'a self,
        user: &'a UserId,
        data_type: &'a str,
        data_key: &'a str,
    ) -> PlayerStoreFuture<'a, Result<Option<Value>, StorageError>> {
        Box::pin(self.load_player_data_now(user, data_type, data_key))
    }

    fn load_player_data_all<'a>(
        &'a self,
        user: &'a UserId,
        data_type: &'a str,
    ) -> PlayerStoreFuture<'a, Result<BTreeMap<String, Value>, StorageError>> {
        Box::pin(self.load_player_data_all_now(user, data_type))
    }

    fn save_mission_progress<'a>(
        &'a self,
        user: &'a UserId,
        mission_id: &'a str,
        progress: &'a MissionProgress,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(self.save_mission_progress_now(user, mission_id, progress))
    }

    fn load_mission_progress<'a>(
        &'a self,
        user: &'a UserId,
    ) -> PlayerStoreFuture<'a, Result<BTreeMap<String, MissionProgress>, StorageError>> {
        Box::pin(self.load_mission_progress_now(user))
    }

    fn save_inventory_item<'a>(
        &'a self,
        user: &'a UserId,
        item_id: &'a str,
        item: &'a InventoryItem,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(self.save_inventory_item_now(user, item_id, item))
    }

    fn load_inventory<'a>(
        &'a self,
        user: &'a UserId,
    ) -> PlayerStoreFuture<'a, Result<Vec<InventoryItem>, StorageError>> {
        Box::pin(self.load_inventory_now(user))
    }

    fn update_statistic<'a>(
        &'a self,
        user: &'a UserId,
        stat_name: &'a str,
        value: f64,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(self.update_statistic_now(user, stat_name, value))
    }

    fn load_statistics<'a>(
        &'a self,
        user: &'a UserId,
    ) -> PlayerStoreFuture<'a, Result<Statistics, StorageError>> {
        Box::pin(self.load_statistics_now(user))
    }

    fn start_game_session<'a>(
        &'a self,
        user: &'a UserId,
    ) -> PlayerStoreFuture<'a, Result<Option<SessionId>, StorageError>> {
        Box::pin(self.start_game_session_now(user))
    }

    fn end_game_session<'a>(
        &'a self,
        session: &'a SessionId,
        stats: &'a SessionStats,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(self.end_game_session_now(session, stats))
    }

    fn unlock_achievement<'a>(
        &'a self,
        user: &'a UserId,
        achievement: AchievementUnlock<'a>,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async move { self.unlock_achievement_now(user, &achievement).await })
    }

    fn load_achievements<'a>(
        &'a self,
        user: &'a UserId,
    ) -> PlayerStoreFuture<'a, Result<Vec<Achievement>, StorageError>> {
        Box::pin(self.load_achievements_now(user))
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::{ManualClock, MemoryRemoteTables};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn store() -> (RemotePlayerStore<MemoryRemoteTables>, MemoryRemoteTables, ManualClock) {
        let tables = MemoryRemoteTables::default();
        let clock = ManualClock::at(5_000);
        let store = RemotePlayerStore::new(tables.clone()).with_clock(Rc::new(clock.clone()));
        (store, tables, clock)
    }

    #[test]
    fn player_data_is_scoped_by_user() {
        let (store, tables, _) = store();
        let alice = UserId::new("alice");
        let bob = UserId::new("bob");
        block_on(store.save_player_data(&alice, "settings", "main", json!({"theme": "matrix"})))
            .expect("alice");
        block_on(store.save_player_data(&bob, "settings", "main", json!({"theme": "amber"})))
            .expect("bob");
        block_on(store.save_player_data(&alice, "settings", "main", json!({"theme": "ice"})))
            .expect("overwrite");

        assert_eq!(tables.rows(RemoteTable::PlayerData).len(), 2);
        assert_eq!(
            block_on(store.load_player_data(&alice, "settings", "main")).expect("load"),
            Some(json!({"theme": "ice"}))
        );
        assert_eq!(
            block_on(store.load_player_data(&bob, "settings", "other")).expect("missing"),
            None
        );
    }

    #[test]
    fn mission_saves_stamp_last_attempt() {
        let (store, tables, _) = store();
        let user = UserId::new("u");
        let progress = MissionProgress {
            progress: 40,
            attempts: 2,
            ..MissionProgress::default()
        };
        block_on(store.save_mission_progress(&user, "m1", &progress)).expect("save");

        let rows = tables.rows(RemoteTable::MissionProgress);
        assert_eq!(rows[0]["progress_percentage"], json!(40));
        assert_eq!(rows[0]["last_attempt_at"], json!("1970-01-01T00:00:05.000Z"));
        assert_eq!(
            block_on(store.load_mission_progress(&user)).expect("load").get("m1"),
            Some(&progress)
        );
    }

    #[test]
    fn inventory_update_keeps_unmentioned_columns() {
        let (store, _, _) = store();
        let user = UserId::new("u");
        block_on(store.save_inventory_item(
            &user,
            "nmap",
            &InventoryItem::new("nmap", "Nmap", "tool").with_price(1500),
        ))
        .expect("buy");
        let mut used = InventoryItem::new("nmap", "Nmap", "tool");
        used.last_used_at = Some(9_000);
        block_on(store.save_inventory_item(&user, "nmap", &used)).expect("use");

        let inventory = block_on(store.load_inventory(&user)).expect("load");
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory[0].purchase_price, Some(1500));
        assert_eq!(inventory[0].purchased_at, Some(5_000));
        assert_eq!(inventory[0].last_used_at, Some(9_000));
    }

    #[test]
    fn sessions_round_trip_through_generated_ids() {
        let (store, tables, clock) = store();
        let user = UserId::new("u");
        let session = block_on(store.start_game_session(&user))
            .expect("start")
            .expect("remote tracks sessions");
        clock.advance(60_000);
        let stats = SessionStats {
            playtime: 60,
            missions_completed: 1,
            credits_earned: 250,
        };
        block_on(store.end_game_session(&session, &stats)).expect("end");

        let rows = tables.rows(RemoteTable::GameSessions);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], json!(session.as_str()));
        assert_eq!(rows[0]["session_start"], json!("1970-01-01T00:00:05.000Z"));
        assert_eq!(rows[0]["session_end"], json!("1970-01-01T00:01:05.000Z"));
        assert_eq!(rows[0]["credits_earned_in_session"], json!(250));
    }

    #[test]
    fn duplicate_unlock_is_not_an_error() {
        let (store, tables, clock) = store();
        let user = UserId::new("u");
        let unlock = AchievementUnlock {
            id: "first-hack",
            name: "First Hack",
            description: "Complete a mission",
        };
        block_on(store.unlock_achievement(&user, unlock.clone())).expect("unlock");
        clock.advance(1);
        block_on(store.unlock_achievement(&user, unlock)).expect("duplicate swallowed");

        assert_eq!(tables.rows(RemoteTable::Achievements).len(), 1);
        let achievements = block_on(store.load_achievements(&user)).expect("load");
        assert_eq!(achievements[0].unlocked_at, 5_000);
    }

    #[test]
    fn server_stamped_rows_load_as_millis() {
        let (store, tables, _) = store();
        let user = UserId::new("u");
        block_on(tables.insert(
            RemoteTable::Achievements,
            json!({
                "user_id": "u",
                "achievement_id": "night-owl",
                "achievement_name": "Night Owl",
                "unlocked_at": "2024-05-01T12:00:00.123456+00:00"
            }),
        ))
        .expect("seed");
        block_on(tables.upsert(
            RemoteTable::PlayerInventory,
            json!({
                "user_id": "u",
                "item_id": "nmap",
                "quantity": 1,
                "purchased_at": "2024-05-01T12:00:00Z"
            }),
        ))
        .expect("seed");

        let achievements = block_on(store.load_achievements(&user)).expect("load");
        assert_eq!(achievements[0].unlocked_at, 1_714_564_800_123);
        let inventory = block_on(store.load_inventory(&user)).expect("load");
        assert_eq!(inventory[0].purchased_at, Some(1_714_564_800_000));
    }

    #[test]
    fn offline_backend_surfaces_remote_errors() {
        let (store, tables, _) = store();
        tables.set_offline(true);
        let err = block_on(store.load_statistics(&UserId::new("u"))).expect_err("offline");
        assert!(matches!(err, StorageError::Remote(_)));
    }
}
