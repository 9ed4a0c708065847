//! Player bootstrap on desktop entry and game-session bookkeeping.

use std::rc::Rc;

use platform_storage::{
    Clock, DatabaseManager, InventoryItem, SessionId, SessionStats, SystemClock, MAIN_DATA_KEY,
    PROFILE_DATA_TYPE, SETTINGS_DATA_TYPE, TOOL_ITEM_TYPE,
};

use crate::settings::{PlayerProfile, PlayerSettings};

/// Loaded player state for one desktop visit.
pub struct PlayerSession {
    manager: DatabaseManager,
    clock: Rc<dyn Clock>,
    settings: PlayerSettings,
    profile: PlayerProfile,
    installed_tools: Vec<String>,
    session_id: Option<SessionId>,
    starting_credits: i64,
    started_at_ms: u64,
}

impl PlayerSession {
    /// Loads settings, installed tools and profile, then starts a game session.
    pub async fn bootstrap(manager: DatabaseManager) -> Self {
        Self::bootstrap_with_clock(manager, Rc::new(SystemClock)).await
    }

    /// [`PlayerSession::bootstrap`] with an explicit clock for playtime.
    pub async fn bootstrap_with_clock(manager: DatabaseManager, clock: Rc<dyn Clock>) -> Self {
        let (settings, inventory, profile) = futures::join!(
            manager.load_typed::<PlayerSettings>(SETTINGS_DATA_TYPE, MAIN_DATA_KEY),
            manager.load_inventory(),
            manager.load_typed::<PlayerProfile>(PROFILE_DATA_TYPE, MAIN_DATA_KEY),
        );
        let installed_tools = inventory
            .into_iter()
            .filter(InventoryItem::is_tool)
            .map(|item| item.id)
            .collect();
        let profile = profile.unwrap_or_default();
        let session_id = manager.start_game_session().await;
        if session_id.is_none() {
            log::debug!("no game session tracked for {}", manager.user_id());
        }

        Self {
            started_at_ms: clock.now_ms(),
            starting_credits: profile.credits,
            settings: settings.unwrap_or_default(),
            profile,
            installed_tools,
            session_id,
            manager,
            clock,
        }
    }

    pub fn settings(&self) -> &PlayerSettings {
        &self.settings
    }

    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    pub fn installed_tools(&self) -> &[String] {
        &self.installed_tools
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn manager(&self) -> &DatabaseManager {
        &self.manager
    }

    /// Replaces and persists the settings.
    pub async fn save_settings(&mut self, settings: PlayerSettings) {
        self.manager
            .save_typed(SETTINGS_DATA_TYPE, MAIN_DATA_KEY, &settings)
            .await;
        self.settings = settings;
    }

    /// Replaces and persists the profile.
    pub async fn save_profile(&mut self, profile: PlayerProfile) {
        self.manager
            .save_typed(PROFILE_DATA_TYPE, MAIN_DATA_KEY, &profile)
            .await;
        self.profile = profile;
    }

    /// Records `tool` as installed. Returns `false` when it already was.
    pub async fn install_tool(&mut self, tool: &str) -> bool {
        if self.installed_tools.iter().any(|t| t == tool) {
            return false;
        }
        self.installed_tools.push(tool.to_string());
        self.manager
            .save_inventory_item(tool, &InventoryItem::new(tool, tool, TOOL_ITEM_TYPE))
            .await;
        true
    }

    /// Closing figures for the visit so far.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            playtime: self.clock.now_ms().saturating_sub(self.started_at_ms) / 1000,
            missions_completed: self.profile.level.saturating_sub(1),
            credits_earned: self.profile.credits - self.starting_credits,
        }
    }

    /// Ends the game session when one was started and returns what was recorded.
    pub async fn end(self) -> Option<SessionStats> {
        let session_id = self.session_id.as_ref()?;
        let stats = self.stats();
        self.manager.end_game_session(session_id, &stats).await;
        Some(stats)
    }
}
