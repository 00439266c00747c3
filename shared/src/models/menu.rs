//! Menu Model

use crate::error::{AppError, AppResult, ErrorCode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Menu category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuCategory {
    /// Food
    Makanan,
    /// Drinks
    Minuman,
}

impl MenuCategory {
    pub const ALL: [MenuCategory; 2] = [MenuCategory::Makanan, MenuCategory::Minuman];

    pub fn as_str(&self) -> &'static str {
        match self {
            MenuCategory::Makanan => "makanan",
            MenuCategory::Minuman => "minuman",
        }
    }
}

impl fmt::Display for MenuCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Menu entry
///
/// `stock == 0` always implies `available == false`. The flag can be turned
/// off by an admin while stock remains, but never on while stock is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntry {
    pub id: i64,
    pub name: String,
    /// Price in rupiah
    pub price: i64,
    pub category: MenuCategory,
    pub stock: i32,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Image URL or path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl MenuEntry {
    /// Whether `quantity` portions can be ordered right now
    pub fn can_fulfil(&self, quantity: i32) -> bool {
        self.available && quantity >= 1 && self.stock >= quantity
    }

    /// Take `quantity` portions off the stock.
    ///
    /// Fails with `MenuItemUnavailable` when the entry is switched off and
    /// with `InsufficientStock` when there is not enough left.
    pub fn reserve(&mut self, quantity: i32) -> AppResult<()> {
        if !self.available || self.stock == 0 {
            return Err(AppError::with_message(
                ErrorCode::MenuItemUnavailable,
                format!("{} is not available", self.name),
            )
            .with_detail("menu_item_id", self.id));
        }
        if quantity > self.stock {
            return Err(AppError::with_message(
                ErrorCode::InsufficientStock,
                format!(
                    "Only {} left of {}, requested {}",
                    self.stock, self.name, quantity
                ),
            )
            .with_detail("menu_item_id", self.id)
            .with_detail("stock", self.stock)
            .with_detail("requested", quantity));
        }
        self.stock -= quantity;
        self.enforce_availability();
        Ok(())
    }

    /// Set stock directly. Restocking an empty entry turns it back on.
    pub fn set_stock(&mut self, stock: i32) {
        if self.stock == 0 && stock > 0 {
            self.available = true;
        }
        self.stock = stock;
        self.enforce_availability();
    }

    /// Apply `stock == 0 => available == false`
    pub fn enforce_availability(&mut self) {
        if self.stock <= 0 {
            self.stock = 0;
            self.available = false;
        }
    }
}

/// Create menu entry payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntryCreate {
    pub name: String,
    pub price: i64,
    pub category: MenuCategory,
    #[serde(default)]
    pub stock: i32,
    /// Defaults to `stock > 0`
    pub available: Option<bool>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Update menu entry payload (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntryUpdate {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub category: Option<MenuCategory>,
    pub stock: Option<i32>,
    pub available: Option<bool>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Stock adjustment payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StockUpdate {
    pub stock: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(stock: i32) -> MenuEntry {
        MenuEntry {
            id: 1,
            name: "Nasi Goreng Special".to_string(),
            price: 25000,
            category: MenuCategory::Makanan,
            stock,
            available: stock > 0,
            description: None,
            image: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_reserve_decrements_stock() {
        let mut e = entry(5);
        e.reserve(3).unwrap();
        assert_eq!(e.stock, 2);
        assert!(e.available);
    }

    #[test]
    fn test_reserve_last_portion_disables_entry() {
        let mut e = entry(2);
        e.reserve(2).unwrap();
        assert_eq!(e.stock, 0);
        assert!(!e.available);
    }

    #[test]
    fn test_reserve_more_than_stock() {
        let mut e = entry(2);
        let err = e.reserve(3).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(e.stock, 2);
    }

    #[test]
    fn test_reserve_disabled_entry() {
        let mut e = entry(10);
        e.available = false;
        let err = e.reserve(1).unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuItemUnavailable);
        assert_eq!(e.stock, 10);
    }

    #[test]
    fn test_set_stock_availability() {
        let mut e = entry(0);
        assert!(!e.available);

        e.set_stock(10);
        assert!(e.available);

        e.set_stock(0);
        assert!(!e.available);

        // an entry disabled by an admin stays disabled on a restock
        let mut e = entry(4);
        e.available = false;
        e.set_stock(8);
        assert!(!e.available);
    }

    #[test]
    fn test_can_fulfil() {
        let e = entry(3);
        assert!(e.can_fulfil(3));
        assert!(!e.can_fulfil(4));
        assert!(!e.can_fulfil(0));
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(entry(7)).unwrap();
        assert_eq!(json["category"], "makanan");
        assert_eq!(json["createdAt"], 0);
        assert!(json.get("description").is_none());
    }
}
