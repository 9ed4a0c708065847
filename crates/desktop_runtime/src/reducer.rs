//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

use crate::apps::catalog_open_request;
use crate::model::{
    AppId, DesktopState, DragSession, InteractionState, OpenWindowRequest, PointerPosition,
    WindowRecord,
};
use crate::window_manager::{
    cascade_rect, focus_window, move_window, next_z_order, remove_window, toggle_minimized,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a window, or focus the existing one for the same app.
    OpenWindow(OpenWindowRequest),
    /// Open a built-in app with its catalog title and icon.
    OpenCatalogApp {
        /// Catalog app to open.
        app_id: AppId,
    },
    /// Close a window.
    CloseWindow {
        /// Window to close.
        app_id: AppId,
    },
    /// Toggle a window between minimized and visible.
    MinimizeWindow {
        /// Window to toggle.
        app_id: AppId,
    },
    /// Restore and raise a window.
    FocusWindow {
        /// Window to focus.
        app_id: AppId,
    },
    /// Taskbar button click.
    ActivateTaskbarEntry {
        /// Window associated with the taskbar button.
        app_id: AppId,
    },
    /// Toggle the start menu open/closed.
    ToggleStartMenu,
    /// Close the start menu if open.
    CloseStartMenu,
    /// Pointer down on a window header.
    BeginMove {
        /// Window being dragged.
        app_id: AppId,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Pointer move while a drag is active.
    UpdateMove {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// Pointer up; releases the drag.
    EndMove,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the shell to execute.
pub enum RuntimeEffect {
    /// A window was removed; the shell tears down the app's state.
    WindowClosed(AppId),
    /// Move input focus into the window's content.
    FocusWindowInput(AppId),
}

/// Applies a [`DesktopAction`] to the window registry and collects resulting side effects.
///
/// Every action is total: references to windows that are not open are ignored.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
) -> Vec<RuntimeEffect> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow(req) => {
            open_window(state, req, &mut effects);
        }
        DesktopAction::OpenCatalogApp { app_id } => match catalog_open_request(&app_id) {
            Some(req) => open_window(state, req, &mut effects),
            None => log::warn!("ignoring open for unknown app `{app_id}`"),
        },
        DesktopAction::CloseWindow { app_id } => {
            if remove_window(state, &app_id) {
                if interaction
                    .dragging
                    .as_ref()
                    .is_some_and(|session| session.app_id == app_id)
                {
                    interaction.dragging = None;
                }
                effects.push(RuntimeEffect::WindowClosed(app_id));
            }
        }
        DesktopAction::MinimizeWindow { app_id } => {
            toggle_minimized(state, &app_id);
        }
        DesktopAction::FocusWindow { app_id } | DesktopAction::ActivateTaskbarEntry { app_id } => {
            if focus_window(state, &app_id) {
                state.start_menu_open = false;
                effects.push(RuntimeEffect::FocusWindowInput(app_id));
            }
        }
        DesktopAction::ToggleStartMenu => {
            state.start_menu_open = !state.start_menu_open;
        }
        DesktopAction::CloseStartMenu => {
            state.start_menu_open = false;
        }
        DesktopAction::BeginMove { app_id, pointer } => {
            let Some(rect_start) = state
                .window(&app_id)
                .filter(|w| !w.minimized)
                .map(|w| w.rect)
            else {
                return effects;
            };
            focus_window(state, &app_id);
            interaction.dragging = Some(DragSession {
                app_id,
                pointer_start: pointer,
                rect_start,
            });
        }
        DesktopAction::UpdateMove { pointer } => {
            if let Some(session) = interaction.dragging.as_ref() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                move_window(state, &session.app_id, session.rect_start.offset(dx, dy));
            }
        }
        DesktopAction::EndMove => {
            interaction.dragging = None;
        }
    }
    effects
}

fn open_window(state: &mut DesktopState, req: OpenWindowRequest, effects: &mut Vec<RuntimeEffect>) {
    state.start_menu_open = false;
    if state.window(&req.app_id).is_some() {
        focus_window(state, &req.app_id);
        effects.push(RuntimeEffect::FocusWindowInput(req.app_id));
        return;
    }

    let rect = req.rect.unwrap_or_else(|| cascade_rect(state.windows.len()));
    let z_order = next_z_order(state);
    let app_id = req.app_id.clone();
    state.windows.push(WindowRecord {
        app_id: req.app_id,
        title: req.title,
        icon_id: req.icon_id,
        content: req.content,
        rect,
        z_order,
        minimized: false,
    });
    effects.push(RuntimeEffect::FocusWindowInput(app_id));
}
