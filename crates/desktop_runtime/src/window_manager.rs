//! Shared window-manager transition helpers used by the desktop reducer.

use crate::model::{AppId, DesktopState, WindowRect, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};

/// Horizontal origin of the cascade used for windows opened without a rect.
pub const CASCADE_ORIGIN_X: i32 = 40;
/// Vertical origin of the cascade used for windows opened without a rect.
pub const CASCADE_ORIGIN_Y: i32 = 48;
/// Offset between consecutive cascaded windows.
pub const CASCADE_STEP: i32 = 20;
/// Cascade positions before wrapping back to the origin.
pub const CASCADE_SLOTS: usize = 8;

/// Hands out the next z-order value. Values are never reused.
pub fn next_z_order(state: &mut DesktopState) -> u64 {
    let z = state.next_z_order;
    state.next_z_order = state.next_z_order.saturating_add(1);
    z
}

/// Default placement for the window opened after `open_count` others.
pub fn cascade_rect(open_count: usize) -> WindowRect {
    let offset = (open_count % CASCADE_SLOTS) as i32 * CASCADE_STEP;
    WindowRect {
        x: CASCADE_ORIGIN_X + offset,
        y: CASCADE_ORIGIN_Y + offset,
        w: DEFAULT_WINDOW_WIDTH,
        h: DEFAULT_WINDOW_HEIGHT,
    }
}

/// Restores and raises `app_id` above every other window.
///
/// Returns `false` when no such window is open.
pub fn focus_window(state: &mut DesktopState, app_id: &AppId) -> bool {
    if !state.windows.iter().any(|w| &w.app_id == app_id) {
        return false;
    }
    let z = next_z_order(state);
    if let Some(window) = state.windows.iter_mut().find(|w| &w.app_id == app_id) {
        window.z_order = z;
        window.minimized = false;
    }
    true
}

/// Flips the minimized flag of `app_id`.
///
/// Returns `false` when no such window is open.
pub fn toggle_minimized(state: &mut DesktopState, app_id: &AppId) -> bool {
    match state.windows.iter_mut().find(|w| &w.app_id == app_id) {
        Some(window) => {
            window.minimized = !window.minimized;
            true
        }
        None => false,
    }
}

/// Removes `app_id` from the registry. Returns `false` when it was not open.
pub fn remove_window(state: &mut DesktopState, app_id: &AppId) -> bool {
    let before = state.windows.len();
    state.windows.retain(|w| &w.app_id != app_id);
    state.windows.len() != before
}

/// Moves `app_id` to the position of `rect`, keeping its size.
pub fn move_window(state: &mut DesktopState, app_id: &AppId, rect: WindowRect) -> bool {
    match state.windows.iter_mut().find(|w| &w.app_id == app_id) {
        Some(window) => {
            window.rect.x = rect.x;
            window.rect.y = rect.y;
            true
        }
        None => false,
    }
}
