use std::rc::Rc;

use futures::executor::block_on;
use platform_storage::{
    BackendConfig, DatabaseManager, LocalPlayerStore, ManualClock, MemoryLocalStore,
    MemoryRemoteTables, RemotePlayerStore, SessionStats, StoreBackend, UserId,
};
use platform_host::RemoteTable;
use pretty_assertions::assert_eq;
use serde_json::json;

fn remote(clock: &ManualClock) -> DatabaseManager {
    DatabaseManager::new(
        UserId::new("player-1"),
        RemotePlayerStore::new(MemoryRemoteTables::default()).with_clock(Rc::new(clock.clone())),
    )
}

fn local(clock: &ManualClock) -> DatabaseManager {
    DatabaseManager::new(
        UserId::new("player-1"),
        LocalPlayerStore::new(MemoryLocalStore::default()).with_clock(Rc::new(clock.clone())),
    )
}

fn both_modes() -> Vec<(DatabaseManager, ManualClock)> {
    let remote_clock = ManualClock::at(1_000);
    let local_clock = ManualClock::at(1_000);
    vec![
        (remote(&remote_clock), remote_clock),
        (local(&local_clock), local_clock),
    ]
}

#[test]
fn save_then_load_returns_the_saved_value() {
    for (manager, _) in both_modes() {
        let value = json!({"title": "x", "tags": ["a", "b"], "nested": {"n": 1.5}});
        block_on(manager.save_player_data("notes", "main", value.clone()));
        assert_eq!(
            block_on(manager.load_player_data("notes", "main")),
            Some(value),
            "{:?}",
            manager.backend()
        );

        block_on(manager.save_player_data("notes", "main", json!([])));
        assert_eq!(
            block_on(manager.load_player_data("notes", "main")),
            Some(json!([]))
        );
        assert_eq!(block_on(manager.load_player_data("notes", "absent")), None);
    }
}

#[test]
fn load_without_key_aggregates_one_type() {
    for (manager, _) in both_modes() {
        block_on(async {
            manager.save_player_data("settings", "a", json!(1)).await;
            manager.save_player_data("settings", "b", json!({"v": 2})).await;
            manager.save_player_data("profile", "main", json!("other")).await;
        });

        let all = block_on(manager.load_player_data_all("settings"));
        assert_eq!(all.len(), 2, "{:?}", manager.backend());
        assert_eq!(all.get("a"), Some(&json!(1)));
        assert_eq!(all.get("b"), Some(&json!({"v": 2})));
        assert!(block_on(manager.load_player_data_all("missing")).is_empty());
    }
}

#[test]
fn unlocking_twice_keeps_one_record_with_first_timestamp() {
    for (manager, clock) in both_modes() {
        block_on(manager.unlock_achievement("root", "Root Access", "Gain root"));
        clock.advance(30_000);
        block_on(manager.unlock_achievement("root", "Root Access", "Gain root"));

        let achievements = block_on(manager.load_achievements());
        assert_eq!(achievements.len(), 1, "{:?}", manager.backend());
        assert_eq!(achievements[0].id, "root");
        assert_eq!(achievements[0].name, "Root Access");
        assert_eq!(achievements[0].unlocked_at, 1_000);
    }
}

#[test]
fn demo_mode_answers_every_operation_consistently() {
    let clock = ManualClock::at(0);
    let manager = local(&clock);
    assert_eq!(manager.backend(), StoreBackend::Local);

    assert_eq!(block_on(manager.load_player_data("settings", "main")), None);
    assert!(block_on(manager.load_mission_progress()).is_empty());
    assert!(block_on(manager.load_inventory()).is_empty());
    assert!(block_on(manager.load_statistics()).is_empty());
    assert!(block_on(manager.load_achievements()).is_empty());

    let session = block_on(manager.start_game_session());
    assert_eq!(session, None);

    block_on(manager.update_statistic("missions", 3.0));
    let profile = block_on(manager.load_complete_profile());
    assert_eq!(profile.statistics.get("missions"), Some(&3.0));
    assert!(profile.settings.is_empty());
}

#[test]
fn remote_sessions_start_and_end() {
    let clock = ManualClock::at(10);
    let tables = MemoryRemoteTables::default();
    let manager = DatabaseManager::new(
        UserId::new("player-1"),
        RemotePlayerStore::new(tables.clone()).with_clock(Rc::new(clock.clone())),
    );
    let session = block_on(manager.start_game_session()).expect("remote sessions are tracked");
    clock.advance(5_000);
    block_on(manager.end_game_session(
        &session,
        &SessionStats {
            playtime: 5,
            missions_completed: 2,
            credits_earned: 300,
        },
    ));

    let rows = tables.rows(RemoteTable::GameSessions);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], json!(session.as_str()));
    assert_eq!(rows[0]["user_id"], json!("player-1"));
    assert_eq!(rows[0]["session_start"], json!("1970-01-01T00:00:00.010Z"));
    assert_eq!(rows[0]["session_end"], json!("1970-01-01T00:00:05.010Z"));
    assert_eq!(rows[0]["total_playtime"], json!(5));
    assert_eq!(rows[0]["missions_completed_in_session"], json!(2));
    assert_eq!(rows[0]["credits_earned_in_session"], json!(300));
}

#[test]
fn host_selection_follows_backend_configuration() {
    let demo = DatabaseManager::for_host(UserId::new("demo"), &BackendConfig::demo());
    assert_eq!(demo.backend(), StoreBackend::Local);
    let remote = DatabaseManager::for_host(
        UserId::new("player-1"),
        &BackendConfig::remote("https://db.example.co", "anon"),
    );
    assert_eq!(remote.backend(), StoreBackend::Remote);
}

#[test]
fn notes_scenario_round_trips_in_demo_mode() {
    let clock = ManualClock::at(0);
    let manager = local(&clock);
    block_on(manager.save_player_data("notes", "main", json!({"title": "x"})));
    assert_eq!(
        block_on(manager.load_player_data("notes", "main")),
        Some(json!({"title": "x"}))
    );
}
