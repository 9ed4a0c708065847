use std::collections::BTreeMap;

use platform_host::BackendConfig;
use platform_host_web::{RestRemoteTables, WebLocalStore};
use serde_json::Value;

use crate::{
    error::StorageError,
    local::LocalPlayerStore,
    manager::DatabaseManager,
    records::{
        Achievement, InventoryItem, MissionProgress, SessionId, SessionStats, Statistics, UserId,
    },
    remote::RemotePlayerStore,
    store::{AchievementUnlock, PlayerStore, PlayerStoreFuture, StoreBackend},
};

/// Browser strategy selected once from [`BackendConfig`].
pub(crate) enum PlayerStoreAdapter {
    Remote(RemotePlayerStore<RestRemoteTables>),
    Local(LocalPlayerStore<WebLocalStore>),
}

impl PlayerStore for PlayerStoreAdapter {
    fn backend(&self) -> StoreBackend {
        match self {
            Self::Remote(store) => store.backend(),
            Self::Local(store) => store.backend(),
        }
    }

    fn save_player_data<'a>(
        &'a self,
        user: &'a UserId,
        data_type: &'a str,
        data_key: &'a str,
        value: Value,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>> {
        match self {
            Self::Remote(store) => store.save_player_data(user, data_type, data_key, value),
            Self::Local(store) => store.save_player_data(user, data_type, data_key, value),
        }
    }

    fn load_player_data<'a>(
        &'a self,
        user: &'a UserId,
        data_type: &'a str,
        data_key: &'a str,
    ) -> PlayerStoreFuture<'a, Result<Option<Value>, StorageError>> {
        match self {
            Self::Remote(store) => store.load_player_data(user, data_type, data_key),
            Self::Local(store) => store.load_player_data(user, data_type, data_key),
        }
    }

    fn load_player_data_all<'a>(
        &'a self,
        user: &'a UserId,
        data_type: &'a str,
    ) -> PlayerStoreFuture<'a, Result<BTreeMap<String, Value>, StorageError>> {
        match self {
            Self::Remote(store) => store.load_player_data_all(user, data_type),
            Self::Local(store) => store.load_player_data_all(user, data_type),
        }
    }

    fn save_mission_progress<'a>(
        &'a self,
        user: &'a UserId,
        mission_id: &'a str,
        progress: &'a MissionProgress,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>> {
        match self {
            Self::Remote(store) => store.save_mission_progress(user, mission_id, progress),
            Self::Local(store) => store.save_mission_progress(user, mission_id, progress),
        }
    }

    fn load_mission_progress<'a>(
        &'a self,
        user: &'a UserId,
    ) -> PlayerStoreFuture<'a, Result<BTreeMap<String, MissionProgress>, StorageError>> {
        match self {
            Self::Remote(store) => store.load_mission_progress(user),
            Self::Local(store) => store.load_mission_progress(user),
        }
    }

    fn save_inventory_item<'a>(
        &'a self,
        user: &'a UserId,
        item_id: &'a str,
        item: &'a InventoryItem,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>> {
        match self {
            Self::Remote(store) => store.save_inventory_item(user, item_id, item),
            Self::Local(store) => store.save_inventory_item(user, item_id, item),
        }
    }

    fn load_inventory<'a>(
        &'a self,
        user: &'a UserId,
    ) -> PlayerStoreFuture<'a, Result<Vec<InventoryItem>, StorageError>> {
        match self {
            Self::Remote(store) => store.load_inventory(user),
            Self::Local(store) => store.load_inventory(user),
        }
    }

    fn update_statistic<'a>(
        &'a self,
        user: &'a UserId,
        stat_name: &'a str,
        value: f64,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>> {
        match self {
            Self::Remote(store) => store.update_statistic(user, stat_name, value),
            Self::Local(store) => store.update_statistic(user, stat_name, value),
        }
    }

    fn load_statistics<'a>(
        &'a self,
        user: &'a UserId,
    ) -> PlayerStoreFuture<'a, Result<Statistics, StorageError>> {
        match self {
            Self::Remote(store) => store.load_statistics(user),
            Self::Local(store) => store.load_statistics(user),
        }
    }

    fn start_game_session<'a>(
        &'a self,
        user: &'a UserId,
    ) -> PlayerStoreFuture<'a, Result<Option<SessionId>, StorageError>> {
        match self {
            Self::Remote(store) => store.start_game_session(user),
            Self::Local(store) => store.start_game_session(user),
        }
    }

    fn end_game_session<'a>(
        &'a self,
        session: &'a SessionId,
        stats: &'a SessionStats,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>> {
        match self {
            Self::Remote(store) => store.end_game_session(session, stats),
            Self::Local(store) => store.end_game_session(session, stats),
        }
    }

    fn unlock_achievement<'a>(
        &'a self,
        user: &'a UserId,
        achievement: AchievementUnlock<'a>,
    ) -> PlayerStoreFuture<'a, Result<(), StorageError>> {
        match self {
            Self::Remote(store) => store.unlock_achievement(user, achievement),
            Self::Local(store) => store.unlock_achievement(user, achievement),
        }
    }

    fn load_achievements<'a>(
        &'a self,
        user: &'a UserId,
    ) -> PlayerStoreFuture<'a, Result<Vec<Achievement>, StorageError>> {
        match self {
            Self::Remote(store) => store.load_achievements(user),
            Self::Local(store) => store.load_achievements(user),
        }
    }
}

pub(crate) fn player_store_for(config: &BackendConfig) -> PlayerStoreAdapter {
    match RestRemoteTables::from_config(config) {
        Some(remote) => PlayerStoreAdapter::Remote(RemotePlayerStore::new(remote)),
        None => PlayerStoreAdapter::Local(LocalPlayerStore::new(WebLocalStore)),
    }
}

impl DatabaseManager {
    /// Builds the façade for the browser host, choosing the remote strategy when `config` carries
    /// credentials and the `localStorage` fallback otherwise.
    pub fn for_host(user_id: UserId, config: &BackendConfig) -> Self {
        let store = player_store_for(config);
        log::debug!("player store for {user_id}: {}", store.backend().as_str());
        Self::new(user_id, store)
    }
}
