//! Player persistence façade with a remote table backend and a browser-local fallback.
//!
//! Every caller goes through [`DatabaseManager`], which delegates to one [`PlayerStore`] strategy
//! chosen at construction: [`RemotePlayerStore`] when backend credentials are configured,
//! [`LocalPlayerStore`] otherwise. The façade never surfaces errors; it logs them and degrades to
//! an empty result.
//!
//! # Example
//!
//! ```rust
//! use futures::executor::block_on;
//! use platform_storage::{DatabaseManager, LocalPlayerStore, MemoryLocalStore, UserId};
//!
//! let manager = DatabaseManager::new(
//!     UserId::new("demo"),
//!     LocalPlayerStore::new(MemoryLocalStore::default()),
//! );
//! block_on(manager.save_player_data("notes", "main", serde_json::json!({"title": "x"})));
//! assert_eq!(
//!     block_on(manager.load_player_data("notes", "main")),
//!     Some(serde_json::json!({"title": "x"}))
//! );
//! ```

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod error;
mod host_adapters;
mod local;
mod manager;
pub mod polling;
mod records;
mod remote;
mod store;

pub use error::StorageError;
pub use local::{LocalPlayerStore, DEFAULT_LOCAL_PREFIX};
pub use manager::DatabaseManager;
pub use platform_host::{
    unix_time_ms_now, BackendConfig, Clock, LocalStore, ManualClock, MemoryLocalStore,
    MemoryRemoteTables, RemoteError, RemoteTables, SystemClock,
};
pub use polling::{LatestResponseGate, RequestTicket};
pub use records::{
    Achievement, CompleteProfile, InventoryItem, MissionProgress, SessionId, SessionStats,
    Statistics, UserId, MAIN_DATA_KEY, NOTES_DATA_TYPE, PROFILE_DATA_TYPE, SETTINGS_DATA_TYPE,
    TOOL_ITEM_TYPE,
};
pub use remote::RemotePlayerStore;
pub use store::{AchievementUnlock, PlayerStore, PlayerStoreFuture, StoreBackend};
