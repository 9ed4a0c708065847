pub mod apps;
pub mod model;
pub mod player_session;
pub mod reducer;
pub mod settings;
pub mod window_manager;

pub use model::*;
pub use player_session::PlayerSession;
pub use reducer::{reduce_desktop, DesktopAction, RuntimeEffect};
pub use settings::{PlayerProfile, PlayerSettings, Wallpaper};
