//! Typed host-domain contracts shared by the persistence layer and browser adapters.
//!
//! This crate is the API-first boundary for platform services. It exposes backend configuration
//! detection, clock helpers, the synchronous local key-value contract ([`LocalStore`]) and the
//! remote table contract ([`RemoteTables`]), together with in-memory implementations of both.
//! Concrete browser adapters live in `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod remote;
pub mod storage;
pub mod time;

pub use config::{BackendConfig, BACKEND_ANON_KEY_ENV, BACKEND_URL_ENV};
pub use remote::memory::MemoryRemoteTables;
pub use remote::rows::{
    AchievementRow, GameSessionRow, InventoryRow, MissionProgressRow, PlayerDataRow, StatisticRow,
};
pub use remote::timestamp::{ms_from_rfc3339, rfc3339_from_ms};
pub use remote::{
    insert_row_with, select_rows_with, upsert_row_with, Filter, RemoteError, RemoteFuture,
    RemoteTable, RemoteTables, UNIQUE_VIOLATION_CODE,
};
pub use storage::local::{
    keys_with_prefix, load_local_json, save_local_json, LocalStore, MemoryLocalStore,
};
pub use time::{unix_time_ms_now, Clock, ManualClock, SystemClock, DAY_MS, HOUR_MS};
