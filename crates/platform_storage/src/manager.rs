//! Error-absorbing persistence façade.

use std::{collections::BTreeMap, fmt, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    error::StorageError,
    records::{
        Achievement, CompleteProfile, InventoryItem, MissionProgress, SessionId, SessionStats,
        Statistics, UserId, SETTINGS_DATA_TYPE,
    },
    store::{AchievementUnlock, PlayerStore, StoreBackend},
};

/// Per-user save/load API over the strategy chosen at construction.
///
/// Every failure is logged and degraded to a benign default (`None`, an empty collection, or a
/// no-op), so callers never branch on backend availability. A failed remote call does not fall
/// back to the local store. Callers that need to tell "no data" apart from "load failed" go
/// through [`DatabaseManager::checked`].
#[derive(Clone)]
pub struct DatabaseManager {
    user_id: UserId,
    store: Rc<dyn PlayerStore>,
}

impl fmt::Debug for DatabaseManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseManager")
            .field("user_id", &self.user_id)
            .field("backend", &self.store.backend())
            .finish()
    }
}

fn absorb<T: Default>(operation: &str, result: Result<T, StorageError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            log::error!("{operation} failed: {err}");
            T::default()
        }
    }
}

impl DatabaseManager {
    /// Wraps an already selected strategy.
    pub fn new(user_id: UserId, store: impl PlayerStore + 'static) -> Self {
        Self::with_store(user_id, Rc::new(store))
    }

    /// Wraps a shared strategy.
    pub fn with_store(user_id: UserId, store: Rc<dyn PlayerStore>) -> Self {
        Self { user_id, store }
    }

    /// Player the façade reads and writes for.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Backing store kind selected at construction.
    pub fn backend(&self) -> StoreBackend {
        self.store.backend()
    }

    /// Underlying strategy with its `Result` channel intact.
    pub fn checked(&self) -> &dyn PlayerStore {
        self.store.as_ref()
    }

    /// Upserts `value` under `(data_type, data_key)`.
    pub async fn save_player_data(&self, data_type: &str, data_key: &str, value: Value) {
        absorb(
            "save_player_data",
            self.store
                .save_player_data(&self.user_id, data_type, data_key, value)
                .await,
        )
    }

    /// Loads one payload; `None` when absent or unreadable.
    pub async fn load_player_data(&self, data_type: &str, data_key: &str) -> Option<Value> {
        absorb(
            "load_player_data",
            self.store
                .load_player_data(&self.user_id, data_type, data_key)
                .await,
        )
    }

    /// Loads every payload under `data_type`, keyed by data key.
    pub async fn load_player_data_all(&self, data_type: &str) -> BTreeMap<String, Value> {
        absorb(
            "load_player_data_all",
            self.store
                .load_player_data_all(&self.user_id, data_type)
                .await,
        )
    }

    /// Serializes `value` and saves it under `(data_type, data_key)`.
    pub async fn save_typed<T: Serialize + ?Sized>(
        &self,
        data_type: &str,
        data_key: &str,
        value: &T,
    ) {
        match serde_json::to_value(value) {
            Ok(value) => self.save_player_data(data_type, data_key, value).await,
            Err(err) => log::error!("save_typed {data_type}/{data_key} failed: {err}"),
        }
    }

    /// Loads and decodes one payload; `None` when absent or not a `T`.
    pub async fn load_typed<T: DeserializeOwned>(
        &self,
        data_type: &str,
        data_key: &str,
    ) -> Option<T> {
        let value = self.load_player_data(data_type, data_key).await?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                log::warn!("discarding undecodable {data_type}/{data_key}: {err}");
                None
            }
        }
    }

    /// Upserts progress for `mission_id`.
    pub async fn save_mission_progress(&self, mission_id: &str, progress: &MissionProgress) {
        absorb(
            "save_mission_progress",
            self.store
                .save_mission_progress(&self.user_id, mission_id, progress)
                .await,
        )
    }

    /// Loads progress for every mission.
    pub async fn load_mission_progress(&self) -> BTreeMap<String, MissionProgress> {
        absorb(
            "load_mission_progress",
            self.store.load_mission_progress(&self.user_id).await,
        )
    }

    /// Upserts an owned item under `item_id`.
    pub async fn save_inventory_item(&self, item_id: &str, item: &InventoryItem) {
        absorb(
            "save_inventory_item",
            self.store
                .save_inventory_item(&self.user_id, item_id, item)
                .await,
        )
    }

    /// Loads every owned item.
    pub async fn load_inventory(&self) -> Vec<InventoryItem> {
        absorb("load_inventory", self.store.load_inventory(&self.user_id).await)
    }

    /// Sets statistic `stat_name` to `value`.
    pub async fn update_statistic(&self, stat_name: &str, value: f64) {
        absorb(
            "update_statistic",
            self.store
                .update_statistic(&self.user_id, stat_name, value)
                .await,
        )
    }

    /// Loads every statistic.
    pub async fn load_statistics(&self) -> Statistics {
        absorb("load_statistics", self.store.load_statistics(&self.user_id).await)
    }

    /// Starts a game session; `None` in demo mode or when the backend is unreachable.
    pub async fn start_game_session(&self) -> Option<SessionId> {
        absorb(
            "start_game_session",
            self.store.start_game_session(&self.user_id).await,
        )
    }

    /// Records closing figures for `session`.
    pub async fn end_game_session(&self, session: &SessionId, stats: &SessionStats) {
        absorb(
            "end_game_session",
            self.store.end_game_session(session, stats).await,
        )
    }

    /// Records an achievement unless it is already unlocked.
    pub async fn unlock_achievement(&self, id: &str, name: &str, description: &str) {
        let unlock = AchievementUnlock {
            id,
            name,
            description,
        };
        absorb(
            "unlock_achievement",
            self.store.unlock_achievement(&self.user_id, unlock).await,
        )
    }

    /// Loads every unlocked achievement.
    pub async fn load_achievements(&self) -> Vec<Achievement> {
        absorb(
            "load_achievements",
            self.store.load_achievements(&self.user_id).await,
        )
    }

    /// Loads settings, missions, inventory, statistics and achievements concurrently.
    ///
    /// Each part degrades to its empty default on its own.
    pub async fn load_complete_profile(&self) -> CompleteProfile {
        let (settings, mission_progress, inventory, statistics, achievements) = futures::join!(
            self.load_player_data_all(SETTINGS_DATA_TYPE),
            self.load_mission_progress(),
            self.load_inventory(),
            self.load_statistics(),
            self.load_achievements(),
        );
        CompleteProfile {
            settings,
            mission_progress,
            inventory,
            statistics,
            achievements,
        }
    }
}
