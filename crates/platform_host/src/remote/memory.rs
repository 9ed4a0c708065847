//! In-memory [`RemoteTables`] implementation with backend-like key semantics.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::Rc,
};

use serde_json::Value;

use super::{Filter, RemoteError, RemoteFuture, RemoteTable, RemoteTables};

#[derive(Debug, Default)]
struct Inner {
    tables: RefCell<BTreeMap<RemoteTable, Vec<Value>>>,
    next_session_id: Cell<u64>,
    offline: Cell<bool>,
}

#[derive(Debug, Clone, Default)]
/// In-memory table store keyed by each relation's natural key columns.
///
/// Clones share the same tables. [`MemoryRemoteTables::set_offline`] makes every call fail, which
/// stands in for an unreachable backend.
pub struct MemoryRemoteTables {
    inner: Rc<Inner>,
}

impl MemoryRemoteTables {
    /// Toggles simulated backend outage.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.set(offline);
    }

    /// Snapshot of all rows in `table`.
    pub fn rows(&self, table: RemoteTable) -> Vec<Value> {
        self.inner
            .tables
            .borrow()
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    fn check_online(&self) -> Result<(), RemoteError> {
        if self.inner.offline.get() {
            Err(RemoteError::new("remote backend unreachable"))
        } else {
            Ok(())
        }
    }

    fn select_now(
        &self,
        table: RemoteTable,
        filters: &[Filter],
    ) -> Result<Vec<Value>, RemoteError> {
        self.check_online()?;
        Ok(self
            .inner
            .tables
            .borrow()
            .get(&table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| filters.iter().all(|f| f.matches(row)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn upsert_now(&self, table: RemoteTable, row: Value) -> Result<(), RemoteError> {
        self.check_online()?;
        ensure_key_columns(table, &row)?;
        let mut tables = self.inner.tables.borrow_mut();
        let rows = tables.entry(table).or_default();
        match rows.iter_mut().find(|existing| same_key(table, existing, &row)) {
            Some(existing) => merge_into(existing, row),
            None => rows.push(row),
        }
        Ok(())
    }

    fn insert_now(&self, table: RemoteTable, mut row: Value) -> Result<Value, RemoteError> {
        self.check_online()?;
        if table == RemoteTable::GameSessions && row.get("id").map_or(true, Value::is_null) {
            let next = self.inner.next_session_id.get() + 1;
            self.inner.next_session_id.set(next);
            if let Some(object) = row.as_object_mut() {
                object.insert("id".to_string(), Value::from(format!("session-{next}")));
            }
        }
        ensure_key_columns(table, &row)?;

        let mut tables = self.inner.tables.borrow_mut();
        let rows = tables.entry(table).or_default();
        if rows.iter().any(|existing| same_key(table, existing, &row)) {
            return Err(RemoteError::unique_violation(table));
        }
        rows.push(row.clone());
        Ok(row)
    }

    fn update_now(
        &self,
        table: RemoteTable,
        filters: &[Filter],
        patch: Value,
    ) -> Result<(), RemoteError> {
        self.check_online()?;
        if let Some(rows) = self.inner.tables.borrow_mut().get_mut(&table) {
            for row in rows
                .iter_mut()
                .filter(|row| filters.iter().all(|f| f.matches(row)))
            {
                merge_into(row, patch.clone());
            }
        }
        Ok(())
    }
}

impl RemoteTables for MemoryRemoteTables {
    fn select<'a>(
        &'a self,
        table: RemoteTable,
        filters: &'a [Filter],
    ) -> RemoteFuture<'a, Result<Vec<Value>, RemoteError>> {
        Box::pin(async move { self.select_now(table, filters) })
    }

    fn upsert<'a>(
        &'a self,
        table: RemoteTable,
        row: Value,
    ) -> RemoteFuture<'a, Result<(), RemoteError>> {
        Box::pin(async move { self.upsert_now(table, row) })
    }

    fn insert<'a>(
        &'a self,
        table: RemoteTable,
        row: Value,
    ) -> RemoteFuture<'a, Result<Value, RemoteError>> {
        Box::pin(async move { self.insert_now(table, row) })
    }

    fn update<'a>(
        &'a self,
        table: RemoteTable,
        filters: &'a [Filter],
        patch: Value,
    ) -> RemoteFuture<'a, Result<(), RemoteError>> {
        Box::pin(async move { self.update_now(table, filters, patch) })
    }
}

fn ensure_key_columns(table: RemoteTable, row: &Value) -> Result<(), RemoteError> {
    for column in table.key_columns() {
        if row.get(*column).map_or(true, Value::is_null) {
            return Err(RemoteError::with_code(
                "23502",
                format!("null value in column \"{column}\" of relation \"{}\"", table.name()),
            ));
        }
    }
    Ok(())
}

fn same_key(table: RemoteTable, a: &Value, b: &Value) -> bool {
    table
        .key_columns()
        .iter()
        .all(|column| a.get(*column) == b.get(*column))
}

fn merge_into(target: &mut Value, patch: Value) {
    match (target.as_object_mut(), patch) {
        (Some(target), Value::Object(patch)) => {
            for (column, value) in patch {
                target.insert(column, value);
            }
        }
        (_, patch) => *target = patch,
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn upsert_replaces_row_with_same_composite_key() {
        let remote = MemoryRemoteTables::default();
        let first = json!({"user_id": "u1", "data_type": "notes", "data_key": "main", "data_value": 1});
        let second = json!({"user_id": "u1", "data_type": "notes", "data_key": "main", "data_value": 2});
        let other_user = json!({"user_id": "u2", "data_type": "notes", "data_key": "main", "data_value": 3});

        block_on(remote.upsert(RemoteTable::PlayerData, first)).expect("upsert");
        block_on(remote.upsert(RemoteTable::PlayerData, second)).expect("upsert");
        block_on(remote.upsert(RemoteTable::PlayerData, other_user)).expect("upsert");

        let filters = [Filter::eq("user_id", "u1")];
        let rows = block_on(remote.select(RemoteTable::PlayerData, &filters)).expect("select");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["data_value"], json!(2));
        assert_eq!(remote.rows(RemoteTable::PlayerData).len(), 2);
    }

    #[test]
    fn insert_rejects_duplicate_keys_and_keeps_original() {
        let remote = MemoryRemoteTables::default();
        let row = json!({"user_id": "u1", "achievement_id": "first", "unlocked_at": 1});
        block_on(remote.insert(RemoteTable::Achievements, row)).expect("insert");

        let dup = json!({"user_id": "u1", "achievement_id": "first", "unlocked_at": 99});
        let err = block_on(remote.insert(RemoteTable::Achievements, dup)).expect_err("duplicate");
        assert!(err.is_unique_violation());
        assert_eq!(remote.rows(RemoteTable::Achievements)[0]["unlocked_at"], json!(1));
    }

    #[test]
    fn game_session_insert_generates_distinct_ids() {
        let remote = MemoryRemoteTables::default();
        let a = block_on(remote.insert(RemoteTable::GameSessions, json!({"user_id": "u1"})))
            .expect("insert");
        let b = block_on(remote.insert(RemoteTable::GameSessions, json!({"user_id": "u1"})))
            .expect("insert");
        assert_eq!(a["id"], json!("session-1"));
        assert_eq!(b["id"], json!("session-2"));
    }

    #[test]
    fn update_merges_patch_into_matching_rows_only() {
        let remote = MemoryRemoteTables::default();
        block_on(remote.insert(RemoteTable::GameSessions, json!({"user_id": "u1"}))).expect("a");
        block_on(remote.insert(RemoteTable::GameSessions, json!({"user_id": "u1"}))).expect("b");

        let filters = [Filter::eq("id", "session-2")];
        block_on(remote.update(RemoteTable::GameSessions, &filters, json!({"session_end": 5})))
            .expect("update");

        let rows = remote.rows(RemoteTable::GameSessions);
        assert_eq!(rows[0].get("session_end"), None);
        assert_eq!(rows[1]["session_end"], json!(5));
        assert_eq!(rows[1]["user_id"], json!("u1"));
    }

    #[test]
    fn missing_key_column_is_a_not_null_violation() {
        let remote = MemoryRemoteTables::default();
        let err = block_on(remote.upsert(RemoteTable::PlayerStatistics, json!({"user_id": "u1"})))
            .expect_err("missing stat_name");
        assert_eq!(err.code.as_deref(), Some("23502"));
    }

    #[test]
    fn offline_store_fails_every_call() {
        let remote = MemoryRemoteTables::default();
        remote.set_offline(true);
        assert!(block_on(remote.select(RemoteTable::PlayerData, &[])).is_err());
        assert!(block_on(remote.upsert(RemoteTable::PlayerData, json!({}))).is_err());
        remote.set_offline(false);
        assert_eq!(
            block_on(remote.select(RemoteTable::PlayerData, &[])).expect("select"),
            Vec::<Value>::new()
        );
    }
}
