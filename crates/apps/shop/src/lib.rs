//! HackShop app: item catalog, category filter and purchases recorded in the player inventory.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod catalog;

use platform_storage::{DatabaseManager, InventoryItem};
use thiserror::Error;

pub use catalog::{demo_catalog, ShopCategory, ShopItem, DEMO_CREDITS};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Refused purchase.
pub enum PurchaseError {
    #[error("no shop item with id `{0}`")]
    /// Id not in the catalog.
    UnknownItem(String),
    #[error("`{0}` is already owned")]
    /// Items are bought once.
    AlreadyOwned(String),
    #[error("price {price} exceeds available credits {credits}")]
    /// Not enough credits.
    InsufficientCredits {
        /// Item price.
        price: i64,
        /// Credits at the time of the attempt.
        credits: i64,
    },
}

/// Shop window state: wallet plus catalog.
pub struct Shop {
    manager: DatabaseManager,
    credits: i64,
    items: Vec<ShopItem>,
}

impl Shop {
    /// Shop over an injected wallet and catalog. Ownership flags are taken as given.
    pub fn new(manager: DatabaseManager, credits: i64, items: Vec<ShopItem>) -> Self {
        Self {
            manager,
            credits,
            items,
        }
    }

    /// Like [`Shop::new`], then marks every catalog item already present in the player's
    /// inventory as owned.
    pub async fn open(manager: DatabaseManager, credits: i64, items: Vec<ShopItem>) -> Self {
        let mut shop = Self::new(manager, credits, items);
        let inventory = shop.manager.load_inventory().await;
        for item in &mut shop.items {
            if inventory.iter().any(|owned| owned.id == item.id) {
                item.owned = true;
            }
        }
        shop
    }

    /// Credits left in the wallet.
    pub fn credits(&self) -> i64 {
        self.credits
    }

    /// Whole catalog in display order.
    pub fn items(&self) -> &[ShopItem] {
        &self.items
    }

    /// Items of one category, or all of them for `None`.
    pub fn items_in(&self, category: Option<ShopCategory>) -> impl Iterator<Item = &ShopItem> + '_ {
        self.items
            .iter()
            .filter(move |item| category.map_or(true, |c| item.category == c))
    }

    /// Returns `true` when `id` is known, unowned and affordable.
    pub fn can_purchase(&self, id: &str) -> bool {
        self.check(id).is_ok()
    }

    /// Buys an item: deducts its price, flags it owned and records it in the inventory.
    pub async fn purchase(&mut self, id: &str) -> Result<&ShopItem, PurchaseError> {
        let index = self.check(id)?;
        let item = &mut self.items[index];
        item.owned = true;
        self.credits -= item.price;
        let record = InventoryItem::new(&item.id, &item.name, item.category.item_type())
            .with_price(item.price);
        log::info!("purchased {} for {} credits", item.name, item.price);
        self.manager.save_inventory_item(id, &record).await;
        Ok(&self.items[index])
    }

    fn check(&self, id: &str) -> Result<usize, PurchaseError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| PurchaseError::UnknownItem(id.to_string()))?;
        let item = &self.items[index];
        if item.owned {
            return Err(PurchaseError::AlreadyOwned(item.name.clone()));
        }
        if item.price > self.credits {
            return Err(PurchaseError::InsufficientCredits {
                price: item.price,
                credits: self.credits,
            });
        }
        Ok(index)
    }
}
