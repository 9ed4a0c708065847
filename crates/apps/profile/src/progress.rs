//! Rank ladder and level arithmetic shown on the profile card.

use serde::{Deserialize, Serialize};

/// XP span of one level.
pub const XP_PER_LEVEL: u64 = 1_000;
/// XP granted per completed mission.
pub const XP_PER_MISSION: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Title earned by player level.
pub enum Rank {
    /// Below level 5.
    Novice,
    /// Level 5 and up.
    Apprenti,
    /// Level 10 and up.
    Intermediaire,
    /// Level 20 and up.
    Avance,
    /// Level 30 and up.
    Expert,
    /// Level 50 and up.
    HackerElite,
}

impl Rank {
    const LADDER: [(u32, Rank); 5] = [
        (50, Rank::HackerElite),
        (30, Rank::Expert),
        (20, Rank::Avance),
        (10, Rank::Intermediaire),
        (5, Rank::Apprenti),
    ];

    /// Highest rank whose threshold `level` reaches.
    pub fn for_level(level: u32) -> Self {
        Self::LADDER
            .iter()
            .find(|(threshold, _)| level >= *threshold)
            .map_or(Rank::Novice, |(_, rank)| *rank)
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Rank::Novice => "Novice",
            Rank::Apprenti => "Apprenti",
            Rank::Intermediaire => "Intermédiaire",
            Rank::Avance => "Avancé",
            Rank::Expert => "Expert",
            Rank::HackerElite => "Hacker Elite",
        }
    }
}

/// XP required to leave `level`.
pub fn next_level_xp(level: u32) -> u64 {
    u64::from(level) * XP_PER_LEVEL
}

/// Total XP: every finished level plus the mission bonus.
pub fn current_xp(level: u32, missions_completed: u32) -> u64 {
    u64::from(level.saturating_sub(1)) * XP_PER_LEVEL
        + u64::from(missions_completed) * XP_PER_MISSION
}

/// Position inside the current level's progress bar, `0..XP_PER_LEVEL`.
pub fn level_progress(level: u32, missions_completed: u32) -> u64 {
    current_xp(level, missions_completed) % XP_PER_LEVEL
}

/// `"{h}h {m}m"`, leftover seconds dropped.
pub fn format_playtime(seconds: u64) -> String {
    format!("{}h {}m", seconds / 3_600, (seconds % 3_600) / 60)
}
