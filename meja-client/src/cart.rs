//! Customer cart
//!
//! Lines are keyed by menu entry id. The cart does not check stock; the
//! server reserves stock when the order is submitted. Every mutation is
//! written through to the `cart-storage` slot.

use serde::{Deserialize, Serialize};
use shared::models::{CartLine, CreateOrderRequest, MenuEntry, OrderItemInput, lines_total};

use crate::ClientResult;
use crate::storage::{CART_SLOT, LocalStorage};

/// Persisted cart shape
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CartState {
    items: Vec<CartLine>,
}

/// Customer cart backed by local storage
#[derive(Debug)]
pub struct CartStore {
    items: Vec<CartLine>,
    storage: LocalStorage,
}

impl CartStore {
    /// Restore the cart from `cart-storage`
    ///
    /// An unreadable slot is discarded and the cart starts empty.
    pub fn open(storage: LocalStorage) -> ClientResult<Self> {
        let items = match storage.load::<CartState>(CART_SLOT) {
            Ok(state) => state.map(|s| s.items).unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable cart");
                Vec::new()
            }
        };
        Ok(Self { items, storage })
    }

    /// Add one portion of `entry`
    pub fn add_item(&mut self, entry: &MenuEntry) -> ClientResult<()> {
        match self.items.iter_mut().find(|l| l.menu_item.id == entry.id) {
            Some(line) => line.quantity += 1,
            None => self.items.push(CartLine::new(entry.clone(), 1)),
        }
        self.persist()
    }

    /// Set the quantity of a line; `quantity <= 0` removes it
    pub fn update_quantity(&mut self, entry_id: i64, quantity: i32) -> ClientResult<()> {
        if quantity <= 0 {
            return self.remove_item(entry_id);
        }
        if let Some(line) = self.items.iter_mut().find(|l| l.menu_item.id == entry_id) {
            line.quantity = quantity;
        }
        self.persist()
    }

    pub fn remove_item(&mut self, entry_id: i64) -> ClientResult<()> {
        self.items.retain(|l| l.menu_item.id != entry_id);
        self.persist()
    }

    pub fn clear(&mut self) -> ClientResult<()> {
        self.items.clear();
        self.persist()
    }

    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Σ price × quantity
    pub fn total(&self) -> i64 {
        lines_total(&self.items)
    }

    /// Σ quantity
    pub fn item_count(&self) -> i32 {
        self.items.iter().map(|l| l.quantity).sum()
    }

    /// Checkout payload: menu ids and quantities only
    pub fn to_order_request(
        &self,
        customer_name: impl Into<String>,
        table_number: i32,
    ) -> CreateOrderRequest {
        CreateOrderRequest {
            customer_name: customer_name.into(),
            table_number: Some(table_number),
            items: self
                .items
                .iter()
                .map(|l| OrderItemInput {
                    menu_item_id: l.menu_item.id,
                    quantity: l.quantity,
                })
                .collect(),
        }
    }

    fn persist(&self) -> ClientResult<()> {
        self.storage.save(
            CART_SLOT,
            &CartState {
                items: self.items.clone(),
            },
        )
    }
}
