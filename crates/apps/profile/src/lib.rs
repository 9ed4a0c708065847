//! Hacker profile app: rank and level card, unlocked achievements, statistics and the list of
//! recently seen players.
//!
//! The player list is refreshed every [`REFRESH_INTERVAL_MS`]. Refreshes can overlap when the
//! backend is slow, so they go through a [`LatestResponseGate`] and a late answer never replaces
//! a newer one.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod progress;

use std::{
    cell::{Cell, RefCell},
    future::Future,
    rc::Rc,
};

use platform_storage::{
    Achievement, Clock, DatabaseManager, LatestResponseGate, Statistics, SystemClock,
};
use serde::{Deserialize, Serialize};

pub use progress::{
    current_xp, format_playtime, level_progress, next_level_xp, Rank, XP_PER_LEVEL,
    XP_PER_MISSION,
};

/// Delay between two player list refreshes.
pub const REFRESH_INTERVAL_MS: u64 = 5_000;
/// A player seen within this window counts as online.
pub const ONLINE_WINDOW_MS: u64 = 5 * 60 * 1_000;

/// Returns `true` when `last_seen_ms` falls inside [`ONLINE_WINDOW_MS`] before `now_ms`.
///
/// Players never seen are offline.
pub fn is_online(last_seen_ms: Option<u64>, now_ms: u64) -> bool {
    last_seen_ms.is_some_and(|seen| now_ms.saturating_sub(seen) < ONLINE_WINDOW_MS)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Identity and progression shown at the top of the profile.
pub struct ProfileCard {
    /// Public `NAME#0000` handle.
    pub hacker_id: String,
    /// Current level, starting at 1.
    pub level: u32,
    /// Wallet balance.
    pub credits: i64,
    /// Missions finished so far.
    pub missions_completed: u32,
    /// Seconds played.
    pub total_playtime: u64,
}

impl ProfileCard {
    /// Card shown to demo players.
    pub fn demo() -> Self {
        Self {
            hacker_id: "DEMO#1337".to_string(),
            level: 5,
            credits: 15_000,
            missions_completed: 12,
            total_playtime: 7_200,
        }
    }

    /// Rank for the card's level.
    pub fn rank(&self) -> Rank {
        Rank::for_level(self.level)
    }

    /// See [`current_xp`].
    pub fn current_xp(&self) -> u64 {
        current_xp(self.level, self.missions_completed)
    }

    /// See [`next_level_xp`].
    pub fn next_level_xp(&self) -> u64 {
        next_level_xp(self.level)
    }

    /// See [`level_progress`].
    pub fn level_progress(&self) -> u64 {
        level_progress(self.level, self.missions_completed)
    }

    /// See [`format_playtime`].
    pub fn playtime_label(&self) -> String {
        format_playtime(self.total_playtime)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Everything the profile window renders apart from the player list.
pub struct ProfileView {
    /// Identity card.
    pub card: ProfileCard,
    /// Unlocked achievements in store order.
    pub achievements: Vec<Achievement>,
    /// Statistic values keyed by name.
    pub statistics: Statistics,
}

impl ProfileView {
    /// Loads achievements and statistics for the manager's player concurrently.
    pub async fn load(manager: &DatabaseManager, card: ProfileCard) -> Self {
        let (achievements, statistics) =
            futures::join!(manager.load_achievements(), manager.load_statistics());
        log::debug!(
            "profile for {}: {} achievements, {} statistics",
            manager.user_id(),
            achievements.len(),
            statistics.len()
        );
        Self {
            card,
            achievements,
            statistics,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Raw player row returned by a presence load.
pub struct PresenceRecord {
    /// Player id.
    pub id: String,
    /// Public handle.
    pub hacker_id: String,
    /// Contact address.
    pub email: String,
    /// Player level.
    pub level: u32,
    /// Last activity in unix ms.
    pub last_seen_ms: Option<u64>,
}

/// Two always-online players listed when no backend is configured.
pub fn demo_presence(now_ms: u64) -> Vec<PresenceRecord> {
    [
        ("demo-3", "CYBER#7777", "cyber@hacksim.os", 15),
        ("demo-4", "GHOST#0001", "ghost@hacksim.os", 30),
    ]
    .into_iter()
    .map(|(id, hacker_id, email, level)| PresenceRecord {
        id: id.to_string(),
        hacker_id: hacker_id.to_string(),
        email: email.to_string(),
        level,
        last_seen_ms: Some(now_ms),
    })
    .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Status dot of a listed player.
pub enum Presence {
    /// Seen within [`ONLINE_WINDOW_MS`].
    Online,
    /// Anything older.
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One entry of the player list.
pub struct ListedPlayer {
    /// Player id.
    pub id: String,
    /// Public handle.
    pub hacker_id: String,
    /// Contact address.
    pub email: String,
    /// Player level.
    pub level: u32,
    /// Online status at refresh time.
    pub presence: Presence,
}

impl ListedPlayer {
    fn from_record(record: PresenceRecord, now_ms: u64) -> Self {
        let presence = if is_online(record.last_seen_ms, now_ms) {
            Presence::Online
        } else {
            Presence::Offline
        };
        Self {
            id: record.id,
            hacker_id: record.hacker_id,
            email: record.email,
            level: record.level,
            presence,
        }
    }
}

#[derive(Default)]
struct BoardState {
    players: RefCell<Vec<ListedPlayer>>,
    refreshed_at: Cell<Option<u64>>,
}

#[derive(Clone)]
/// Recently seen players, refreshed on a timer.
///
/// Clones share the list and the response gate.
pub struct PresenceBoard {
    gate: LatestResponseGate,
    clock: Rc<dyn Clock>,
    state: Rc<BoardState>,
}

impl Default for PresenceBoard {
    fn default() -> Self {
        Self {
            gate: LatestResponseGate::default(),
            clock: Rc::new(SystemClock),
            state: Rc::default(),
        }
    }
}

impl PresenceBoard {
    /// Replaces the clock used for presence and refresh timing.
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Listed players as of the last applied refresh.
    pub fn players(&self) -> Vec<ListedPlayer> {
        self.state.players.borrow().clone()
    }

    /// Number of listed players currently marked online.
    pub fn online_count(&self) -> usize {
        self.state
            .players
            .borrow()
            .iter()
            .filter(|player| player.presence == Presence::Online)
            .count()
    }

    /// Returns `true` when nothing was applied yet or [`REFRESH_INTERVAL_MS`] elapsed since the
    /// last applied refresh.
    pub fn is_due(&self) -> bool {
        self.state
            .refreshed_at
            .get()
            .map_or(true, |at| self.clock.now_ms().saturating_sub(at) >= REFRESH_INTERVAL_MS)
    }

    /// Awaits `load` and replaces the list with its records.
    ///
    /// Returns `false` without touching the list when a refresh started later already landed.
    pub async fn refresh<F>(&self, load: F) -> bool
    where
        F: Future<Output = Vec<PresenceRecord>>,
    {
        let Some(records) = self.gate.poll(load).await else {
            return false;
        };
        let now = self.clock.now_ms();
        let players = records
            .into_iter()
            .map(|record| ListedPlayer::from_record(record, now))
            .collect();
        self.state.players.replace(players);
        self.state.refreshed_at.set(Some(now));
        true
    }
}
