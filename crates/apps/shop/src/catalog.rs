use platform_storage::TOOL_ITEM_TYPE;
use serde::{Deserialize, Serialize};

/// Wallet of a fresh demo player.
pub const DEMO_CREDITS: i64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Shop shelf.
pub enum ShopCategory {
    /// Standalone hacking tools.
    Tools,
    /// Exploit kits.
    Exploits,
    /// Permanent player upgrades.
    Upgrades,
    /// Automation scripts.
    Scripts,
}

impl ShopCategory {
    /// Shelves in tab order.
    pub const ALL: [ShopCategory; 4] = [
        ShopCategory::Tools,
        ShopCategory::Exploits,
        ShopCategory::Upgrades,
        ShopCategory::Scripts,
    ];

    /// Tab label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Tools => "Tools",
            Self::Exploits => "Exploits",
            Self::Upgrades => "Upgrades",
            Self::Scripts => "Scripts",
        }
    }

    /// Inventory `type` recorded for purchases from this shelf. Tools become installable
    /// terminal tools.
    pub fn item_type(self) -> &'static str {
        match self {
            Self::Tools => TOOL_ITEM_TYPE,
            Self::Exploits => "exploit",
            Self::Upgrades => "upgrade",
            Self::Scripts => "script",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One catalog entry.
pub struct ShopItem {
    /// Catalog identifier, reused as the inventory item id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Card blurb.
    pub description: String,
    /// Price in credits.
    pub price: i64,
    /// Shelf.
    pub category: ShopCategory,
    /// Already bought.
    #[serde(default)]
    pub owned: bool,
    /// Release tag shown on the card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

fn item(
    id: &str,
    name: &str,
    description: &str,
    price: i64,
    category: ShopCategory,
    version: Option<&str>,
) -> ShopItem {
    ShopItem {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price,
        category,
        owned: false,
        version: version.map(str::to_string),
    }
}

/// The six demo items, none owned.
pub fn demo_catalog() -> Vec<ShopItem> {
    use ShopCategory::*;

    vec![
        item(
            "1",
            "BruteCracker Pro",
            "Advanced password cracking tool with GPU acceleration and rainbow tables.",
            2_500,
            Tools,
            Some("v3.2.1"),
        ),
        item(
            "2",
            "SQL Injection Kit",
            "Complete toolkit for SQL injection attacks with automated payload generation.",
            1_800,
            Exploits,
            Some("v2.1.0"),
        ),
        item(
            "3",
            "Network Scanner Elite",
            "Professional network scanning with stealth mode and vulnerability detection.",
            3_200,
            Tools,
            Some("v4.0.2"),
        ),
        item(
            "4",
            "Payload Generator",
            "Generate custom payloads for various exploit frameworks and platforms.",
            1_500,
            Scripts,
            Some("v1.8.3"),
        ),
        item(
            "5",
            "Stealth Mode Upgrade",
            "Reduces detection probability by 75% during all hacking operations.",
            5_000,
            Upgrades,
            None,
        ),
        item(
            "6",
            "XSS Exploitation Suite",
            "Complete cross-site scripting toolkit with automated payload injection.",
            2_200,
            Exploits,
            Some("v2.5.1"),
        ),
    ]
}
