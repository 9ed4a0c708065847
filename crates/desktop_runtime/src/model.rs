//! Window registry state and the value types that flow through the desktop reducer.

use serde::{Deserialize, Serialize};

/// Default width assigned to newly opened windows.
pub const DEFAULT_WINDOW_WIDTH: i32 = 800;
/// Default height assigned to newly opened windows.
pub const DEFAULT_WINDOW_HEIGHT: i32 = 600;
/// First z-order value handed out by a fresh desktop.
pub const FIRST_Z_ORDER: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Application identifier; at most one window per id is open.
pub struct AppId(String);

impl AppId {
    /// Wraps a raw identifier such as `terminal` or `notes`.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// String form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AppId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl std::fmt::Display for AppId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Opaque handle the UI layer resolves to a window's content component.
pub struct ContentHandle(String);

impl ContentHandle {
    /// Wraps a UI-defined handle.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// String form of the handle.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Screen rectangle in CSS pixels.
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    /// Same size, moved by `(dx, dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Returns `true` when `point` lies inside the rectangle (right and bottom edges excluded).
    pub fn contains(self, point: PointerPosition) -> bool {
        point.x >= self.x
            && point.x < self.x + self.w
            && point.y >= self.y
            && point.y < self.y + self.h
    }
}

impl Default for WindowRect {
    fn default() -> Self {
        Self {
            x: 40,
            y: 48,
            w: DEFAULT_WINDOW_WIDTH,
            h: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One open window.
pub struct WindowRecord {
    pub app_id: AppId,
    pub title: String,
    pub icon_id: String,
    pub content: ContentHandle,
    pub rect: WindowRect,
    /// Stacking rank; the highest value among visible windows is the focused one.
    pub z_order: u64,
    pub minimized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Window registry plus shell chrome state.
///
/// `windows` keeps open order; stacking is carried by [`WindowRecord::z_order`] alone.
pub struct DesktopState {
    pub next_z_order: u64,
    pub windows: Vec<WindowRecord>,
    pub start_menu_open: bool,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            next_z_order: FIRST_Z_ORDER,
            windows: Vec::new(),
            start_menu_open: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Taskbar button data for one open window.
pub struct TaskbarEntry {
    pub app_id: AppId,
    pub title: String,
    pub icon_id: String,
    pub minimized: bool,
    pub focused: bool,
}

impl DesktopState {
    /// Full registry, minimized windows included.
    pub fn windows(&self) -> &[WindowRecord] {
        &self.windows
    }

    /// Window opened for `app_id`, if any.
    pub fn window(&self, app_id: &AppId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| &w.app_id == app_id)
    }

    /// Non-minimized windows ordered back to front.
    pub fn visible_windows(&self) -> Vec<&WindowRecord> {
        let mut visible: Vec<_> = self.windows.iter().filter(|w| !w.minimized).collect();
        visible.sort_by_key(|w| w.z_order);
        visible
    }

    /// Most recently focused visible window.
    pub fn topmost_window(&self) -> Option<&WindowRecord> {
        self.windows
            .iter()
            .filter(|w| !w.minimized)
            .max_by_key(|w| w.z_order)
    }

    /// Visible window under `point`, frontmost first.
    pub fn window_at(&self, point: PointerPosition) -> Option<&WindowRecord> {
        self.windows
            .iter()
            .filter(|w| !w.minimized && w.rect.contains(point))
            .max_by_key(|w| w.z_order)
    }

    /// Taskbar buttons in open order.
    pub fn taskbar_entries(&self) -> Vec<TaskbarEntry> {
        let focused = self.topmost_window().map(|w| &w.app_id);
        self.windows
            .iter()
            .map(|w| TaskbarEntry {
                app_id: w.app_id.clone(),
                title: w.title.clone(),
                icon_id: w.icon_id.clone(),
                minimized: w.minimized,
                focused: Some(&w.app_id) == focused,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Metadata supplied when opening a window.
pub struct OpenWindowRequest {
    pub app_id: AppId,
    pub title: String,
    pub icon_id: String,
    pub content: ContentHandle,
    /// Initial placement; cascades from the desktop origin when absent.
    pub rect: Option<WindowRect>,
}

impl OpenWindowRequest {
    pub fn new(
        app_id: impl Into<AppId>,
        title: impl Into<String>,
        icon_id: impl Into<String>,
        content: ContentHandle,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            title: title.into(),
            icon_id: icon_id.into(),
            content,
            rect: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Active header drag.
pub struct DragSession {
    pub app_id: AppId,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Pointer gesture state kept beside [`DesktopState`].
pub struct InteractionState {
    pub dragging: Option<DragSession>,
}
