//! Player-store strategy contract.

use std::{collections::BTreeMap, future::Future, pin::Pin};

use serde_json::Value;

use crate::{
    error::StorageError,
    records::{
        Achievement, InventoryItem, MissionProgress, SessionId, SessionStats, Statistics, UserId,
    },
};

/// Object-safe boxed future used by [`PlayerStore`] async methods.
pub type PlayerStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Which backing store a strategy writes to.
pub enum StoreBackend {
    /// Remote table backend.
    Remote,
    /// Browser-local fallback (demo mode).
    Local,
}

impl StoreBackend {
    /// Stable string token for logs and diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Achievement metadata supplied when unlocking.
pub struct AchievementUnlock<'a> {
    /// Achievement identifier.
    pub id: &'a str,
    /// Display name.
    pub name: &'a str,
    /// Display description.
    pub description: &'a str,
}

/// Storage strategy behind [`DatabaseManager`](crate::DatabaseManager).
///
/// One implementation per backing store; the façade picks one at construction and never branches
/// on configuration again. Methods report failures as [`StorageError`]; "not found" is `Ok` with an
/// empty value.
pub trait PlayerStore {
    /// Backing store kind.
    fn backend(&self) -> StoreBackend;

    /// Upserts the payload stored under `(user, data_type, data_key)`.
    fn save_player_data<'a>(
        &'a self,
        user: &'a UserId,
        data_type: &'a str,
        data_key: &'a str,
        value: Value,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>>;

    /// Loads one payload.
    fn load_player_data<'a>(
        &'a self,
        user: &'a UserId,
        data_type: &'a str,
        data_key: &'a str,
    ) -> PlayerStoreFuture<'a, Result<Option<Value>, StorageError>>;

    /// Loads every payload under `data_type`, keyed by data key.
    fn load_player_data_all<'a>(
        &'a self,
        user: &'a UserId,
        data_type: &'a str,
    ) -> PlayerStoreFuture<'a, Result<BTreeMap<String, Value>, StorageError>>;

    /// Upserts progress for `mission_id`.
    fn save_mission_progress<'a>(
        &'a self,
        user: &'a UserId,
        mission_id: &'a str,
        progress: &'a MissionProgress,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>>;

    /// Loads progress for every mission.
    fn load_mission_progress<'a>(
        &'a self,
        user: &'a UserId,
    ) -> PlayerStoreFuture<'a, Result<BTreeMap<String, MissionProgress>, StorageError>>;

    /// Upserts `item` under `item_id`.
    fn save_inventory_item<'a>(
        &'a self,
        user: &'a UserId,
        item_id: &'a str,
        item: &'a InventoryItem,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>>;

    /// Loads every owned item.
    fn load_inventory<'a>(
        &'a self,
        user: &'a UserId,
    ) -> PlayerStoreFuture<'a, Result<Vec<InventoryItem>, StorageError>>;

    /// Sets statistic `stat_name` to `value`.
    fn update_statistic<'a>(
        &'a self,
        user: &'a UserId,
        stat_name: &'a str,
        value: f64,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>>;

    /// Loads every statistic.
    fn load_statistics<'a>(
        &'a self,
        user: &'a UserId,
    ) -> PlayerStoreFuture<'a, Result<Statistics, StorageError>>;

    /// Starts a game session; `None` when the store does not track sessions.
    fn start_game_session<'a>(
        &'a self,
        user: &'a UserId,
    ) -> PlayerStoreFuture<'a, Result<Option<SessionId>, StorageError>>;

    /// Closes a session started by [`PlayerStore::start_game_session`].
    fn end_game_session<'a>(
        &'a self,
        session: &'a SessionId,
        stats: &'a SessionStats,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>>;

    /// Records an achievement unless it is already unlocked.
    fn unlock_achievement<'a>(
        &'a self,
        user: &'a UserId,
        achievement: AchievementUnlock<'a>,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>>;

    /// Loads every unlocked achievement.
    fn load_achievements<'a>(
        &'a self,
        user: &'a UserId,
    ) -> PlayerStoreFuture<'a, Result<Vec<Achievement>, StorageError>>;
}
