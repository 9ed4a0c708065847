//! Built-in application catalog used by desktop icons, the start menu and `OpenCatalogApp`.

use crate::model::{AppId, ContentHandle, OpenWindowRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppDescriptor {
    pub app_id: &'static str,
    pub title: &'static str,
    pub icon_id: &'static str,
    pub desktop_icon_label: &'static str,
}

const APP_CATALOG: [AppDescriptor; 9] = [
    AppDescriptor {
        app_id: "terminal",
        title: "Terminal",
        icon_id: "terminal",
        desktop_icon_label: "Terminal",
    },
    AppDescriptor {
        app_id: "missions",
        title: "Missions",
        icon_id: "target",
        desktop_icon_label: "Missions",
    },
    AppDescriptor {
        app_id: "shop",
        title: "Magasin",
        icon_id: "shopping-cart",
        desktop_icon_label: "Magasin",
    },
    AppDescriptor {
        app_id: "notes",
        title: "Notes",
        icon_id: "file-text",
        desktop_icon_label: "Notes",
    },
    AppDescriptor {
        app_id: "profile",
        title: "Profil",
        icon_id: "user",
        desktop_icon_label: "Profil",
    },
    AppDescriptor {
        app_id: "settings",
        title: "Paramètres",
        icon_id: "settings",
        desktop_icon_label: "Paramètres",
    },
    AppDescriptor {
        app_id: "chat",
        title: "Chat Sécurisé",
        icon_id: "message-circle",
        desktop_icon_label: "Chat",
    },
    AppDescriptor {
        app_id: "mail",
        title: "DarkMail",
        icon_id: "mail",
        desktop_icon_label: "DarkMail",
    },
    AppDescriptor {
        app_id: "bank",
        title: "Crypto Bank",
        icon_id: "banknote",
        desktop_icon_label: "Banque",
    },
];

pub fn app_catalog() -> &'static [AppDescriptor] {
    &APP_CATALOG
}

/// Catalog entry for `app_id`; `None` for ids the desktop does not ship.
pub fn app_descriptor(app_id: &AppId) -> Option<&'static AppDescriptor> {
    app_catalog()
        .iter()
        .find(|entry| entry.app_id == app_id.as_str())
}

/// Handle the UI layer maps back to the app's root component.
pub fn content_handle_for(app_id: &AppId) -> ContentHandle {
    ContentHandle::new(format!("app:{app_id}"))
}

/// Open request carrying the catalog title and icon for `app_id`.
pub fn catalog_open_request(app_id: &AppId) -> Option<OpenWindowRequest> {
    app_descriptor(app_id).map(|entry| {
        OpenWindowRequest::new(
            entry.app_id,
            entry.title,
            entry.icon_id,
            content_handle_for(app_id),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        let mut ids: Vec<_> = app_catalog().iter().map(|entry| entry.app_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), app_catalog().len());
    }

    #[test]
    fn unknown_apps_have_no_open_request() {
        assert!(catalog_open_request(&AppId::new("root-panel")).is_none());
        let bank = catalog_open_request(&AppId::new("bank")).expect("bank ships");
        assert_eq!(bank.title, "Crypto Bank");
        assert_eq!(bank.content.as_str(), "app:bank");
    }
}
