//! Player-facing desktop settings and profile records persisted through the façade.

use serde::{Deserialize, Serialize};

/// Lowest terminal opacity the settings panel allows.
pub const MIN_TERMINAL_OPACITY: u8 = 50;
/// Highest terminal opacity.
pub const MAX_TERMINAL_OPACITY: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Appearance settings stored under `settings/main`.
pub struct PlayerSettings {
    pub theme: String,
    pub wallpaper: String,
    pub custom_wallpaper_url: String,
    pub terminal_opacity: u8,
    pub sound_enabled: bool,
    pub color_preset: String,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            theme: "matrix".to_string(),
            wallpaper: "default".to_string(),
            custom_wallpaper_url: String::new(),
            terminal_opacity: 95,
            sound_enabled: true,
            color_preset: "green".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Wallpaper the desktop should paint.
pub enum Wallpaper {
    Default,
    Circuit,
    Code,
    Cyber,
    /// User-supplied image URL (or data URL).
    Custom(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
}

const COLOR_PRESETS: [ColorPreset; 20] = [
    preset("green", "Matrix Green", "#10b981", "#065f46"),
    preset("blue", "Cyber Blue", "#3b82f6", "#1e40af"),
    preset("purple", "Neon Purple", "#8b5cf6", "#6d28d9"),
    preset("red", "Danger Red", "#ef4444", "#dc2626"),
    preset("orange", "Hacker Orange", "#f97316", "#ea580c"),
    preset("yellow", "Warning Yellow", "#eab308", "#ca8a04"),
    preset("pink", "Neon Pink", "#ec4899", "#db2777"),
    preset("cyan", "Electric Cyan", "#06b6d4", "#0891b2"),
    preset("lime", "Toxic Lime", "#84cc16", "#65a30d"),
    preset("indigo", "Deep Indigo", "#6366f1", "#4f46e5"),
    preset("teal", "Cyber Teal", "#14b8a6", "#0f766e"),
    preset("emerald", "Emerald Hack", "#10b981", "#047857"),
    preset("rose", "Rose Gold", "#f43f5e", "#e11d48"),
    preset("violet", "Violet Storm", "#7c3aed", "#6d28d9"),
    preset("amber", "Amber Alert", "#f59e0b", "#d97706"),
    preset("slate", "Slate Gray", "#64748b", "#475569"),
    preset("zinc", "Zinc Metal", "#71717a", "#52525b"),
    preset("neutral", "Neutral Tone", "#737373", "#525252"),
    preset("stone", "Stone Cold", "#78716c", "#57534e"),
    preset("sky", "Sky Blue", "#0ea5e9", "#0284c7"),
];

const fn preset(
    id: &'static str,
    name: &'static str,
    primary: &'static str,
    secondary: &'static str,
) -> ColorPreset {
    ColorPreset {
        id,
        name,
        primary,
        secondary,
    }
}

pub fn color_presets() -> &'static [ColorPreset] {
    &COLOR_PRESETS
}

impl PlayerSettings {
    /// Selected color preset; unknown ids fall back to Matrix Green.
    pub fn color(&self) -> ColorPreset {
        color_presets()
            .iter()
            .copied()
            .find(|p| p.id == self.color_preset)
            .unwrap_or(COLOR_PRESETS[0])
    }

    /// Wallpaper to paint. `custom` without a URL paints the default.
    pub fn resolved_wallpaper(&self) -> Wallpaper {
        match self.wallpaper.as_str() {
            "custom" if !self.custom_wallpaper_url.is_empty() => {
                Wallpaper::Custom(self.custom_wallpaper_url.clone())
            }
            "circuit" => Wallpaper::Circuit,
            "code" => Wallpaper::Code,
            "cyber" => Wallpaper::Cyber,
            _ => Wallpaper::Default,
        }
    }

    /// Sets a custom wallpaper and switches to it.
    pub fn set_custom_wallpaper(&mut self, url: impl Into<String>) {
        self.custom_wallpaper_url = url.into();
        self.wallpaper = "custom".to_string();
    }

    /// Sets terminal opacity, clamped to the allowed range.
    pub fn set_terminal_opacity(&mut self, percent: u8) {
        self.terminal_opacity = percent.clamp(MIN_TERMINAL_OPACITY, MAX_TERMINAL_OPACITY);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Progression record stored under `profile/main`.
pub struct PlayerProfile {
    pub hacker_id: String,
    pub level: u32,
    pub credits: i64,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            hacker_id: "H4CK3R#1337".to_string(),
            level: 1,
            credits: 5000,
        }
    }
}
