//! Local fallback strategy (demo mode).
//!
//! Layout under the key prefix (default `hacksim`):
//! - `{prefix}-{type}-{key}`: one generic player-data payload;
//! - `{prefix}-missions`: JSON map of mission id to progress;
//! - `{prefix}-inventory`: JSON array of items, merged by id;
//! - `{prefix}-stats`: JSON map of statistic name to value;
//! - `{prefix}-achievements`: JSON array of unlocked achievements.
//!
//! The browser store is already scoped to one player, so the user id is not part of the keys.

use std::{collections::BTreeMap, rc::Rc};

use platform_host::{
    keys_with_prefix, load_local_json, save_local_json, Clock, LocalStore, SystemClock,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    error::StorageError,
    records::{
        Achievement, InventoryItem, MissionProgress, SessionId, SessionStats, Statistics, UserId,
    },
    store::{AchievementUnlock, PlayerStore, PlayerStoreFuture, StoreBackend},
};

/// Default application key prefix.
pub const DEFAULT_LOCAL_PREFIX: &str = "hacksim";

/// [`PlayerStore`] over a synchronous [`LocalStore`].
pub struct LocalPlayerStore<L> {
    local: L,
    prefix: String,
    clock: Rc<dyn Clock>,
}

impl<L: LocalStore> LocalPlayerStore<L> {
    /// Creates a store using [`DEFAULT_LOCAL_PREFIX`] and the system clock.
    pub fn new(local: L) -> Self {
        Self {
            local,
            prefix: DEFAULT_LOCAL_PREFIX.to_string(),
            clock: Rc::new(SystemClock),
        }
    }

    /// Replaces the key prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Replaces the clock used for unlock and purchase stamps.
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Underlying local store.
    pub fn local(&self) -> &L {
        &self.local
    }

    /// Key of one generic player-data payload.
    pub fn data_key(&self, data_type: &str, data_key: &str) -> String {
        format!("{}-{data_type}-{data_key}", self.prefix)
    }

    fn collection_key(&self, name: &str) -> String {
        format!("{}-{name}", self.prefix)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        load_local_json(&self.local, key).map_err(StorageError::Local)
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        save_local_json(&self.local, key, value).map_err(StorageError::Local)
    }

    fn save_player_data_now(
        &self,
        data_type: &str,
        data_key: &str,
        value: &Value,
    ) -> Result<(), StorageError> {
        self.write(&self.data_key(data_type, data_key), value)
    }

    fn load_player_data_now(
        &self,
        data_type: &str,
        data_key: &str,
    ) -> Result<Option<Value>, StorageError> {
        self.read(&self.data_key(data_type, data_key))
    }

    fn load_player_data_all_now(
        &self,
        data_type: &str,
    ) -> Result<BTreeMap<String, Value>, StorageError> {
        let prefix = format!("{}-{data_type}-", self.prefix);
        let keys = keys_with_prefix(&self.local, &prefix).map_err(StorageError::Local)?;
        let mut all = BTreeMap::new();
        for key in keys {
            match self.read::<Value>(&key) {
                Ok(Some(value)) => {
                    all.insert(key[prefix.len()..].to_string(), value);
                }
                Ok(None) => {}
                Err(err) => log::warn!("skipping unreadable local record {key}: {err}"),
            }
        }
        Ok(all)
    }

    fn save_mission_progress_now(
        &self,
        mission_id: &str,
        progress: &MissionProgress,
    ) -> Result<(), StorageError> {
        let key = self.collection_key("missions");
        let mut missions: BTreeMap<String, MissionProgress> = self.read(&key)?.unwrap_or_default();
        missions.insert(mission_id.to_string(), progress.clone());
        self.write(&key, &missions)
    }

    fn load_mission_progress_now(&self) -> Result<BTreeMap<String, MissionProgress>, StorageError> {
        Ok(self.read(&self.collection_key("missions"))?.unwrap_or_default())
    }

    fn save_inventory_item_now(
        &self,
        item_id: &str,
        item: &InventoryItem,
    ) -> Result<(), StorageError> {
        let key = self.collection_key("inventory");
        let mut inventory: Vec<InventoryItem> = self.read(&key)?.unwrap_or_default();
        let now = self.clock.now_ms();
        match inventory.iter_mut().find(|existing| existing.id == item_id) {
            Some(existing) => {
                *existing = existing.merged_with(item.clone()).normalized(item_id, now)
            }
            None => inventory.push(item.normalized(item_id, now)),
        }
        self.write(&key, &inventory)
    }

    fn load_inventory_now(&self) -> Result<Vec<InventoryItem>, StorageError> {
        Ok(self.read(&self.collection_key("inventory"))?.unwrap_or_default())
    }

    fn update_statistic_now(&self, stat_name: &str, value: f64) -> Result<(), StorageError> {
        let key = self.collection_key("stats");
        let mut stats: Statistics = self.read(&key)?.unwrap_or_default();
        stats.insert(stat_name.to_string(), value);
        self.write(&key, &stats)
    }

    fn load_statistics_now(&self) -> Result<Statistics, StorageError> {
        Ok(self.read(&self.collection_key("stats"))?.unwrap_or_default())
    }

    fn unlock_achievement_now(&self, unlock: &AchievementUnlock<'_>) -> Result<(), StorageError> {
        let key = self.collection_key("achievements");
        let mut achievements: Vec<Achievement> = self.read(&key)?.unwrap_or_default();
        if achievements.iter().any(|a| a.id == unlock.id) {
            return Ok(());
        }
        achievements.push(Achievement {
            id: unlock.id.to_string(),
            name: unlock.name.to_string(),
            description: unlock.description.to_string(),
            unlocked_at: self.clock.now_ms(),
        });
        self.write(&key, &achievements)
    }

    fn load_achievements_now(&self) -> Result<Vec<Achievement>, StorageError> {
        Ok(self
            .read(&self.collection_key("achievements"))?
            .unwrap_or_default())
    }
}

impl<L: LocalStore> PlayerStore for LocalPlayerStore<L> {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Local
    }

    fn save_player_data<'a>(
        &'a self,
        _user: &'a UserId,
        data_type: &'a str,
        data_key: &'a str,
        value: Value,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async move { self.save_player_data_now(data_type, data_key, &value) })
    }

    fn load_player_data<'a>(
        &'a self,
        _user: &'a UserId,
        data_type: &'a str,
        data_key: &'a str,
    ) -> PlayerStoreFuture<'a, Result<Option<Value>, StorageError>> {
        Box::pin(async move { self.load_player_data_now(data_type, data_key) })
    }

    fn load_player_data_all<'a>(
        &'a self,
        _user: &'a UserId,
        data_type: &'a str,
    ) -> PlayerStoreFuture<'a, Result<BTreeMap<String, Value>, StorageError>> {
        Box::pin(async move { self.load_player_data_all_now(data_type) })
    }

    fn save_mission_progress<'a>(
        &'a self,
        _user: &'a UserId,
        mission_id: &'a str,
        progress: &'a MissionProgress,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async move { self.save_mission_progress_now(mission_id, progress) })
    }

    fn load_mission_progress<'a>(
        &'a self,
        _user: &'a UserId,
    ) -> PlayerStoreFuture<'a, Result<BTreeMap<String, MissionProgress>, StorageError>> {
        Box::pin(async move { self.load_mission_progress_now() })
    }

    fn save_inventory_item<'a>(
        &'a self,
        _user: &'a UserId,
        item_id: &'a str,
        item: &'a InventoryItem,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async move { self.save_inventory_item_now(item_id, item) })
    }

    fn load_inventory<'a>(
        &'a self,
        _user: &'a UserId,
    ) -> PlayerStoreFuture<'a, Result<Vec<InventoryItem>, StorageError>> {
        Box::pin(async move { self.load_inventory_now() })
    }

    fn update_statistic<'a>(
        &'a self,
        _user: &'a UserId,
        stat_name: &'a str,
        value: f64,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async move { self.update_statistic_now(stat_name, value) })
    }

    fn load_statistics<'a>(
        &'a self,
        _user: &'a UserId,
    ) -> PlayerStoreFuture<'a, Result<Statistics, StorageError>> {
        Box::pin(async move { self.load_statistics_now() })
    }

    fn start_game_session<'a>(
        &'a self,
        _user: &'a UserId,
    ) -> PlayerStoreFuture<'a, Result<Option<SessionId>, StorageError>> {
        Box::pin(async { Ok(None) })
    }

    fn end_game_session<'a>(
        &'a self,
        _session: &'a SessionId,
        _stats: &'a SessionStats,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async { Ok(()) })
    }

    fn unlock_achievement<'a>(
        &'a self,
        _user: &'a UserId,
        achievement: AchievementUnlock<'a>,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async move { self.unlock_achievement_now(&achievement) })
    }

    fn load_achievements<'a>(
        &'a self,
        _user: &'a UserId,
    ) -> PlayerStoreFuture<'a, Result<Vec<Achievement>, StorageError>> {
        Box::pin(async move { self.load_achievements_now() })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::{ManualClock, MemoryLocalStore};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn store() -> (LocalPlayerStore<MemoryLocalStore>, MemoryLocalStore, ManualClock) {
        let local = MemoryLocalStore::default();
        let clock = ManualClock::at(1_000);
        let store = LocalPlayerStore::new(local.clone()).with_clock(Rc::new(clock.clone()));
        (store, local, clock)
    }

    fn user() -> UserId {
        UserId::new("demo")
    }

    #[test]
    fn player_data_lands_under_prefixed_type_and_key() {
        let (store, local, _) = store();
        block_on(store.save_player_data(&user(), "settings", "main", json!({"theme": "matrix"})))
            .expect("save");

        assert_eq!(
            local.get_item("hacksim-settings-main").expect("get"),
            Some(r#"{"theme":"matrix"}"#.to_string())
        );
    }

    #[test]
    fn load_all_returns_only_keys_of_the_requested_type() {
        let (store, local, _) = store();
        let user = user();
        block_on(store.save_player_data(&user, "notes", "a", json!(1))).expect("a");
        block_on(store.save_player_data(&user, "notes", "b", json!({"x": 2}))).expect("b");
        block_on(store.save_player_data(&user, "profile", "main", json!(3))).expect("other");
        local.set_item("hacksim-notes-broken", "{oops").expect("corrupt entry");

        let all = block_on(store.load_player_data_all(&user, "notes")).expect("load all");
        assert_eq!(
            all,
            BTreeMap::from([("a".to_string(), json!(1)), ("b".to_string(), json!({"x": 2}))])
        );
    }

    #[test]
    fn inventory_merges_by_id_and_appends_new_items() {
        let (store, _, clock) = store();
        let user = user();
        block_on(store.save_inventory_item(
            &user,
            "nmap",
            &InventoryItem::new("ignored", "Nmap", "tool").with_price(1500),
        ))
        .expect("first");
        clock.advance(10);
        let mut upgrade = InventoryItem::new("nmap", "Nmap Pro", "tool");
        upgrade.quantity = 2;
        block_on(store.save_inventory_item(&user, "nmap", &upgrade)).expect("update");
        let sqlmap = InventoryItem::new("s", "SQLMap", "exploit");
        block_on(store.save_inventory_item(&user, "sqlmap", &sqlmap)).expect("append");

        let inventory = block_on(store.load_inventory(&user)).expect("load");
        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory[0].id, "nmap");
        assert_eq!(inventory[0].name, "Nmap Pro");
        assert_eq!(inventory[0].quantity, 2);
        assert_eq!(inventory[0].purchase_price, Some(1500));
        assert_eq!(inventory[0].purchased_at, Some(1_000));
        assert_eq!(inventory[1].id, "sqlmap");
        assert_eq!(inventory[1].purchased_at, Some(1_010));
    }

    #[test]
    fn recording_last_use_keeps_the_purchase_time() {
        let (store, _, clock) = store();
        let user = user();
        let nmap = InventoryItem::new("nmap", "Nmap", "tool");
        block_on(store.save_inventory_item(&user, "nmap", &nmap)).expect("purchase");
        clock.advance(60_000);
        let mut used = InventoryItem::new("nmap", "Nmap", "tool");
        used.last_used_at = Some(clock.now_ms());
        block_on(store.save_inventory_item(&user, "nmap", &used)).expect("use");

        let inventory = block_on(store.load_inventory(&user)).expect("load");
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory[0].purchased_at, Some(1_000));
        assert_eq!(inventory[0].last_used_at, Some(61_000));
    }

    #[test]
    fn achievements_are_unlocked_once_with_first_timestamp() {
        let (store, _, clock) = store();
        let user = user();
        let unlock = AchievementUnlock {
            id: "first-hack",
            name: "First Hack",
            description: "Complete a mission",
        };
        block_on(store.unlock_achievement(&user, unlock.clone())).expect("unlock");
        clock.advance(500);
        block_on(store.unlock_achievement(&user, unlock)).expect("unlock again");

        let achievements = block_on(store.load_achievements(&user)).expect("load");
        assert_eq!(achievements.len(), 1);
        assert_eq!(achievements[0].unlocked_at, 1_000);
    }

    #[test]
    fn sessions_are_not_tracked_locally() {
        let (store, local, _) = store();
        assert_eq!(block_on(store.start_game_session(&user())).expect("start"), None);
        block_on(store.end_game_session(&SessionId::new("x"), &SessionStats::default()))
            .expect("end");
        assert!(local.is_empty());
    }

    #[test]
    fn missions_and_statistics_share_single_collection_keys() {
        let (store, local, _) = store();
        let user = user();
        let progress = MissionProgress {
            status: Some("completed".to_string()),
            progress: 100,
            ..MissionProgress::default()
        };
        block_on(store.save_mission_progress(&user, "m1", &progress)).expect("m1");
        block_on(store.save_mission_progress(&user, "m2", &MissionProgress::default()))
            .expect("m2");
        block_on(store.update_statistic(&user, "hacks", 3.0)).expect("stat");
        block_on(store.update_statistic(&user, "hacks", 4.0)).expect("stat again");

        assert_eq!(
            local.keys().expect("keys"),
            vec!["hacksim-missions".to_string(), "hacksim-stats".to_string()]
        );
        let missions = block_on(store.load_mission_progress(&user)).expect("missions");
        assert_eq!(missions.get("m1"), Some(&progress));
        assert_eq!(missions.len(), 2);
        assert_eq!(
            block_on(store.load_statistics(&user)).expect("stats").get("hacks"),
            Some(&4.0)
        );
    }

    #[test]
    fn custom_prefix_namespaces_every_key() {
        let local = MemoryLocalStore::default();
        let store = LocalPlayerStore::new(local.clone()).with_prefix("test");
        block_on(store.update_statistic(&user(), "x", 1.0)).expect("stat");
        assert_eq!(store.data_key("a", "b"), "test-a-b");
        assert_eq!(local.keys().expect("keys"), vec!["test-stats".to_string()]);
    }
}
