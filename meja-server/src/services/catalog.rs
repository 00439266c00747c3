//! Catalog Service - menu entry management
//!
//! All writes go through the [`Store`] so the availability rule
//! (`stock == 0 => available == false`) is applied on every path.

use std::sync::Arc;

use shared::models::{MenuEntry, MenuEntryCreate, MenuEntryUpdate};
use shared::util::now_millis;

use crate::db::Store;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_PRICE, MAX_URL_LEN, validate_non_negative, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// Menu catalog
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn Store>,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("backend", &self.store.backend_name())
            .finish()
    }
}

impl CatalogService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// All entries in id order
    pub fn list(&self) -> AppResult<Vec<MenuEntry>> {
        Ok(self.store.list_menu()?)
    }

    pub fn get(&self, id: i64) -> AppResult<MenuEntry> {
        self.store
            .find_menu(id)?
            .ok_or_else(|| AppError::menu_item_not_found(id))
    }

    pub fn count(&self) -> AppResult<usize> {
        Ok(self.store.menu_count()?)
    }

    pub fn create(&self, data: MenuEntryCreate) -> AppResult<MenuEntry> {
        validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
        validate_price(data.price)?;
        validate_non_negative(data.stock.into(), "stock")?;
        validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
        validate_optional_text(&data.image, "image", MAX_URL_LEN)?;

        let now = now_millis();
        let entry = MenuEntry {
            id: 0,
            name: data.name.trim().to_string(),
            price: data.price,
            category: data.category,
            stock: data.stock,
            available: data.available.unwrap_or(data.stock > 0),
            description: data.description,
            image: data.image,
            created_at: now,
            updated_at: now,
        };

        let created = self.store.insert_menu(entry)?;
        tracing::info!(id = created.id, name = %created.name, "Menu entry created");
        Ok(created)
    }

    /// Partial update. A stock change follows [`MenuEntry::set_stock`].
    pub fn update(&self, id: i64, data: MenuEntryUpdate) -> AppResult<MenuEntry> {
        if let Some(name) = &data.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        if let Some(price) = data.price {
            validate_price(price)?;
        }
        if let Some(stock) = data.stock {
            validate_non_negative(stock.into(), "stock")?;
        }
        validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
        validate_optional_text(&data.image, "image", MAX_URL_LEN)?;

        let now = now_millis();
        let updated = self.store.update_menu(id, &mut |entry| {
            if let Some(name) = &data.name {
                entry.name = name.trim().to_string();
            }
            if let Some(price) = data.price {
                entry.price = price;
            }
            if let Some(category) = data.category {
                entry.category = category;
            }
            if let Some(stock) = data.stock {
                entry.set_stock(stock);
            }
            if let Some(available) = data.available {
                entry.available = available;
            }
            if data.description.is_some() {
                entry.description = data.description.clone();
            }
            if data.image.is_some() {
                entry.image = data.image.clone();
            }
            entry.updated_at = now.max(entry.updated_at);
            Ok(())
        })?;

        let updated = updated.ok_or_else(|| AppError::menu_item_not_found(id))?;
        tracing::info!(id, "Menu entry updated");
        Ok(updated)
    }

    /// Set the stock level of an entry
    pub fn set_stock(&self, id: i64, stock: i32) -> AppResult<MenuEntry> {
        validate_non_negative(stock.into(), "stock")?;

        let now = now_millis();
        let updated = self.store.update_menu(id, &mut |entry| {
            entry.set_stock(stock);
            entry.updated_at = now.max(entry.updated_at);
            Ok(())
        })?;

        let updated = updated.ok_or_else(|| AppError::menu_item_not_found(id))?;
        tracing::info!(id, stock, available = updated.available, "Menu stock updated");
        Ok(updated)
    }

    /// Remove an entry. Existing orders keep their snapshots.
    pub fn delete(&self, id: i64) -> AppResult<bool> {
        if !self.store.delete_menu(id)? {
            return Err(AppError::menu_item_not_found(id));
        }
        tracing::info!(id, "Menu entry deleted");
        Ok(true)
    }
}

fn validate_price(price: i64) -> AppResult<()> {
    if !(0..=MAX_PRICE).contains(&price) {
        return Err(AppError::with_message(
            shared::ErrorCode::MenuItemInvalidPrice,
            format!("price must be between 0 and {MAX_PRICE}"),
        )
        .with_detail("price", price));
    }
    Ok(())
}
