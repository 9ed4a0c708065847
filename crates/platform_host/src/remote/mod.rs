//! Remote table-store contract (PostgREST-style relations with upsert and equality filters).

pub mod memory;
pub mod rows;
pub mod timestamp;

use std::{future::Future, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Postgres error code reported for unique-constraint violations.
pub const UNIQUE_VIOLATION_CODE: &str = "23505";

/// Object-safe boxed future used by [`RemoteTables`] async methods.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Relations exposed by the remote backend.
pub enum RemoteTable {
    /// Generic `(user, type, key) -> value` records.
    PlayerData,
    /// Per-mission progress rows.
    MissionProgress,
    /// Owned items.
    PlayerInventory,
    /// Scalar statistics by name.
    PlayerStatistics,
    /// Play sessions with start and end stamps.
    GameSessions,
    /// Unlocked achievements.
    Achievements,
}

impl RemoteTable {
    /// Every relation, in schema order.
    pub const ALL: [RemoteTable; 6] = [
        Self::PlayerData,
        Self::MissionProgress,
        Self::PlayerInventory,
        Self::PlayerStatistics,
        Self::GameSessions,
        Self::Achievements,
    ];

    /// Relation name on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Self::PlayerData => "player_data",
            Self::MissionProgress => "mission_progress",
            Self::PlayerInventory => "player_inventory",
            Self::PlayerStatistics => "player_statistics",
            Self::GameSessions => "game_sessions",
            Self::Achievements => "achievements",
        }
    }

    /// Natural key columns; upserts resolve conflicts on these and inserts reject duplicates.
    pub fn key_columns(self) -> &'static [&'static str] {
        match self {
            Self::PlayerData => &["user_id", "data_type", "data_key"],
            Self::MissionProgress => &["user_id", "mission_id"],
            Self::PlayerInventory => &["user_id", "item_id"],
            Self::PlayerStatistics => &["user_id", "stat_name"],
            Self::GameSessions => &["id"],
            Self::Achievements => &["user_id", "achievement_id"],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Equality filter on one column.
pub struct Filter {
    /// Column name.
    pub column: &'static str,
    /// Value the column must equal.
    pub value: Value,
}

impl Filter {
    /// `column = value`.
    pub fn eq(column: &'static str, value: impl Into<Value>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }

    /// Returns `true` when `row` satisfies the filter.
    pub fn matches(&self, row: &Value) -> bool {
        row.get(self.column) == Some(&self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
/// Failure reported by the remote backend or its transport.
pub struct RemoteError {
    /// Backend error code when one was reported (for example `23505`).
    pub code: Option<String>,
    /// Human-readable message.
    pub message: String,
}

impl RemoteError {
    /// Error without a backend code (transport or decode failures).
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    /// Error carrying a backend code.
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// Unique-constraint violation on `table`.
    pub fn unique_violation(table: RemoteTable) -> Self {
        Self::with_code(
            UNIQUE_VIOLATION_CODE,
            format!("duplicate key value violates unique constraint on {}", table.name()),
        )
    }

    /// Returns `true` for unique-constraint violations.
    pub fn is_unique_violation(&self) -> bool {
        self.code.as_deref() == Some(UNIQUE_VIOLATION_CODE)
    }
}

/// Remote table API consumed by the persistence layer.
///
/// Rows travel as JSON objects keyed by column name. An empty `select` result means "not found"
/// and is not an error.
pub trait RemoteTables {
    /// Returns every row of `table` matching all `filters`.
    fn select<'a>(
        &'a self,
        table: RemoteTable,
        filters: &'a [Filter],
    ) -> RemoteFuture<'a, Result<Vec<Value>, RemoteError>>;

    /// Inserts `row`, or replaces the provided columns of the row sharing its key columns.
    fn upsert<'a>(
        &'a self,
        table: RemoteTable,
        row: Value,
    ) -> RemoteFuture<'a, Result<(), RemoteError>>;

    /// Inserts `row` and returns the stored representation (with generated columns).
    ///
    /// Rejects rows whose key columns already exist with a unique-violation error.
    fn insert<'a>(
        &'a self,
        table: RemoteTable,
        row: Value,
    ) -> RemoteFuture<'a, Result<Value, RemoteError>>;

    /// Merges `patch` into every row matching `filters`.
    fn update<'a>(
        &'a self,
        table: RemoteTable,
        filters: &'a [Filter],
        patch: Value,
    ) -> RemoteFuture<'a, Result<(), RemoteError>>;
}

impl<R: RemoteTables + ?Sized> RemoteTables for Rc<R> {
    fn select<'a>(
        &'a self,
        table: RemoteTable,
        filters: &'a [Filter],
    ) -> RemoteFuture<'a, Result<Vec<Value>, RemoteError>> {
        (**self).select(table, filters)
    }

    fn upsert<'a>(
        &'a self,
        table: RemoteTable,
        row: Value,
    ) -> RemoteFuture<'a, Result<(), RemoteError>> {
        (**self).upsert(table, row)
    }

    fn insert<'a>(
        &'a self,
        table: RemoteTable,
        row: Value,
    ) -> RemoteFuture<'a, Result<Value, RemoteError>> {
        (**self).insert(table, row)
    }

    fn update<'a>(
        &'a self,
        table: RemoteTable,
        filters: &'a [Filter],
        patch: Value,
    ) -> RemoteFuture<'a, Result<(), RemoteError>> {
        (**self).update(table, filters, patch)
    }
}

/// Selects rows and decodes them into `T`.
///
/// # Errors
///
/// Returns the backend error, or a decode error when a row does not match `T`.
pub async fn select_rows_with<R: RemoteTables + ?Sized, T: DeserializeOwned>(
    remote: &R,
    table: RemoteTable,
    filters: &[Filter],
) -> Result<Vec<T>, RemoteError> {
    remote
        .select(table, filters)
        .await?
        .into_iter()
        .map(|row| {
            serde_json::from_value(row)
                .map_err(|e| RemoteError::new(format!("{}: {e}", table.name())))
        })
        .collect()
}

/// Serializes `row` and upserts it.
///
/// # Errors
///
/// Returns the backend error, or an encode error when `row` does not serialize to an object.
pub async fn upsert_row_with<R: RemoteTables + ?Sized, T: Serialize>(
    remote: &R,
    table: RemoteTable,
    row: &T,
) -> Result<(), RemoteError> {
    let row = row_to_value(table, row)?;
    remote.upsert(table, row).await
}

/// Serializes `row`, inserts it and decodes the stored representation.
///
/// # Errors
///
/// Returns the backend error or an encode/decode error.
pub async fn insert_row_with<R: RemoteTables + ?Sized, T: Serialize, O: DeserializeOwned>(
    remote: &R,
    table: RemoteTable,
    row: &T,
) -> Result<O, RemoteError> {
    let row = row_to_value(table, row)?;
    let stored = remote.insert(table, row).await?;
    serde_json::from_value(stored).map_err(|e| RemoteError::new(format!("{}: {e}", table.name())))
}

fn row_to_value<T: Serialize>(table: RemoteTable, row: &T) -> Result<Value, RemoteError> {
    let value =
        serde_json::to_value(row).map_err(|e| RemoteError::new(format!("{}: {e}", table.name())))?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(RemoteError::new(format!(
            "{}: row must serialize to a JSON object",
            table.name()
        )))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn table_names_match_backend_schema() {
        let names = RemoteTable::ALL.map(RemoteTable::name);
        assert_eq!(
            names,
            [
                "player_data",
                "mission_progress",
                "player_inventory",
                "player_statistics",
                "game_sessions",
                "achievements",
            ]
        );
    }

    #[test]
    fn filter_matches_only_equal_column_values() {
        let row = json!({"user_id": "u1", "stat_name": "hacks"});
        assert!(Filter::eq("user_id", "u1").matches(&row));
        assert!(!Filter::eq("user_id", "u2").matches(&row));
        assert!(!Filter::eq("missing", "u1").matches(&row));
    }

    #[test]
    fn unique_violation_is_recognised_by_code() {
        let err = RemoteError::unique_violation(RemoteTable::Achievements);
        assert!(err.is_unique_violation());
        assert!(err.to_string().contains("achievements"));
        assert!(!RemoteError::new("offline").is_unique_violation());
    }

    #[test]
    fn non_object_rows_are_rejected_before_transport() {
        let err = row_to_value(RemoteTable::PlayerData, &42).expect_err("scalar row");
        assert!(err.message.contains("JSON object"));
    }
}
