//! Storage layer
//!
//! [`Store`] is the single owner of menu entries and orders. Every operation
//! that must be atomic (order submission with stock reservation, status
//! changes, menu edits) is one call on the trait, executed inside one redb
//! write transaction or one mutex critical section.
//!
//! | Backend | Type | Durability |
//! |---------|------|------------|
//! | `redb` | [`RedbStore`] | file under `work_dir/database/meja.redb` |
//! | `memory` | [`MemoryStore`] | process lifetime |

pub mod memory;
pub mod redb_store;
pub mod seed;

use std::collections::BTreeMap;
use std::sync::Arc;

use shared::models::{CartLine, MenuEntry, Order, OrderItemInput, OrderStatus, lines_total};
use shared::{AppError, AppResult};
use thiserror::Error;

use crate::core::Config;
use crate::core::config::StorageBackend;
use crate::utils::validation::MAX_LINE_QUANTITY;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;

/// Repository errors
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A domain rule refused the change; nothing was written
    #[error("{0}")]
    Rejected(#[from] AppError),
}

macro_rules! impl_from_redb {
    ($($err:ty),* $(,)?) => {
        $(
            impl From<$err> for RepoError {
                fn from(err: $err) -> Self {
                    RepoError::Database(err.to_string())
                }
            }
        )*
    };
}

impl_from_redb!(
    redb::Error,
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Rejected(e) => e,
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Serialization(e) => AppError::database(format!("Corrupt record: {}", e)),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Validated order submission, ready to be stored
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_name: String,
    pub table_number: i32,
    pub items: Vec<OrderItemInput>,
    pub now: i64,
}

/// Storage backend
///
/// Implementations must be safe to share across request handlers.
/// `update_*` closures run inside the write critical section; returning an
/// error from them discards the change.
pub trait Store: Send + Sync {
    /// Backend name reported by `/health`
    fn backend_name(&self) -> &'static str;

    // ========== Menu ==========

    /// All entries in id order
    fn list_menu(&self) -> RepoResult<Vec<MenuEntry>>;

    fn find_menu(&self, id: i64) -> RepoResult<Option<MenuEntry>>;

    fn menu_count(&self) -> RepoResult<usize>;

    /// Insert a new entry. The `id` field is ignored and replaced by the
    /// next counter value.
    fn insert_menu(&self, entry: MenuEntry) -> RepoResult<MenuEntry>;

    /// Modify an entry in place. `None` when the id is unknown.
    fn update_menu(
        &self,
        id: i64,
        apply: &mut dyn FnMut(&mut MenuEntry) -> AppResult<()>,
    ) -> RepoResult<Option<MenuEntry>>;

    /// `true` when an entry was removed
    fn delete_menu(&self, id: i64) -> RepoResult<bool>;

    // ========== Orders ==========

    /// Reserve stock, assign the next order id and append the order, all or
    /// nothing.
    fn create_order(&self, order: NewOrder) -> RepoResult<Order>;

    /// All orders in insertion order
    fn list_orders(&self) -> RepoResult<Vec<Order>>;

    fn find_order(&self, id: i64) -> RepoResult<Option<Order>>;

    /// Modify an order in place. `None` when the id is unknown.
    fn update_order(
        &self,
        id: i64,
        apply: &mut dyn FnMut(&mut Order) -> AppResult<()>,
    ) -> RepoResult<Option<Order>>;
}

/// Open the backend selected by the configuration
pub fn open_store(config: &Config) -> RepoResult<Arc<dyn Store>> {
    match config.storage {
        StorageBackend::Redb => {
            let path = config.database_path();
            tracing::info!(path = %path.display(), "Opening redb store");
            Ok(Arc::new(RedbStore::open(path)?))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory store, data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Resolve requested items against the catalog and reserve their stock.
///
/// `lookup` reads the current entry inside the caller's transaction. Returns
/// the order lines (entries as they were before the reservation, repeated
/// ids merged into one line) and the modified entries to write back.
pub(crate) fn reserve_lines<F>(
    items: &[OrderItemInput],
    now: i64,
    mut lookup: F,
) -> RepoResult<(Vec<CartLine>, BTreeMap<i64, MenuEntry>)>
where
    F: FnMut(i64) -> RepoResult<Option<MenuEntry>>,
{
    // (id, quantity) in first-seen order
    let mut requested: Vec<(i64, i32)> = Vec::with_capacity(items.len());
    for item in items {
        let merged = match requested.iter_mut().find(|(id, _)| *id == item.menu_item_id) {
            Some((_, quantity)) => {
                *quantity = quantity
                    .checked_add(item.quantity)
                    .ok_or_else(|| line_quantity_error(item.menu_item_id))?;
                *quantity
            }
            None => {
                requested.push((item.menu_item_id, item.quantity));
                item.quantity
            }
        };
        if !(1..=MAX_LINE_QUANTITY).contains(&merged) {
            return Err(line_quantity_error(item.menu_item_id).into());
        }
    }

    let mut touched: BTreeMap<i64, MenuEntry> = BTreeMap::new();
    let mut lines: Vec<CartLine> = Vec::with_capacity(requested.len());

    for (id, quantity) in requested {
        let mut entry = lookup(id)?.ok_or_else(|| AppError::menu_item_not_found(id))?;
        lines.push(CartLine::new(entry.clone(), quantity));

        entry.reserve(quantity)?;
        entry.updated_at = now;
        touched.insert(id, entry);
    }

    Ok((lines, touched))
}

fn line_quantity_error(menu_item_id: i64) -> AppError {
    AppError::validation(format!(
        "quantity per menu entry must be between 1 and {MAX_LINE_QUANTITY}"
    ))
    .with_detail("menu_item_id", menu_item_id)
}

/// Build the stored order from reserved lines
pub(crate) fn build_order(id: i64, new: &NewOrder, items: Vec<CartLine>) -> Order {
    Order {
        id,
        customer_name: new.customer_name.clone(),
        table_number: new.table_number,
        total: lines_total(&items),
        items,
        status: OrderStatus::Waiting,
        created_at: new.now,
        updated_at: new.now,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use shared::models::MenuCategory;

    pub fn entry(name: &str, price: i64, stock: i32) -> MenuEntry {
        MenuEntry {
            id: 0,
            name: name.to_string(),
            price,
            category: MenuCategory::Makanan,
            stock,
            available: stock > 0,
            description: None,
            image: None,
            created_at: 1,
            updated_at: 1,
        }
    }

    pub fn new_order(items: &[(i64, i32)]) -> NewOrder {
        NewOrder {
            customer_name: "Budi".to_string(),
            table_number: 4,
            items: items
                .iter()
                .map(|&(menu_item_id, quantity)| OrderItemInput {
                    menu_item_id,
                    quantity,
                })
                .collect(),
            now: 1_700_000_000_000,
        }
    }

    /// Behaviour every backend must share
    pub fn exercise_store(store: &dyn Store) {
        use shared::ErrorCode;

        let nasi = store.insert_menu(entry("Nasi Goreng", 25000, 5)).unwrap();
        let teh = store.insert_menu(entry("Es Teh", 5000, 2)).unwrap();
        assert_eq!((nasi.id, teh.id), (1, 2));
        assert_eq!(store.menu_count().unwrap(), 2);

        // successful order reserves stock and computes the total
        let order = store.create_order(new_order(&[(1, 2), (2, 1)])).unwrap();
        assert_eq!(order.id, 1);
        assert_eq!(order.total, 55000);
        assert_eq!(order.status, OrderStatus::Waiting);
        assert_eq!(store.find_menu(1).unwrap().unwrap().stock, 3);
        assert_eq!(store.find_menu(2).unwrap().unwrap().stock, 1);

        // repeated ids are merged and reserved together
        let err = store.create_order(new_order(&[(2, 1), (2, 1)])).unwrap_err();
        assert!(matches!(err, RepoError::Rejected(ref e) if e.code == ErrorCode::InsufficientStock));
        assert_eq!(store.find_menu(2).unwrap().unwrap().stock, 1);

        // failure leaves stock and the order list untouched
        let err = store.create_order(new_order(&[(1, 1), (99, 1)])).unwrap_err();
        assert!(matches!(err, RepoError::Rejected(ref e) if e.code == ErrorCode::MenuItemNotFound));
        assert_eq!(store.find_menu(1).unwrap().unwrap().stock, 3);
        assert_eq!(store.list_orders().unwrap().len(), 1);

        // last portion switches the entry off
        let order = store.create_order(new_order(&[(2, 1)])).unwrap();
        assert_eq!(order.id, 2);
        let teh = store.find_menu(2).unwrap().unwrap();
        assert_eq!(teh.stock, 0);
        assert!(!teh.available);
        let err = store.create_order(new_order(&[(2, 1)])).unwrap_err();
        assert!(matches!(err, RepoError::Rejected(ref e) if e.code == ErrorCode::MenuItemUnavailable));

        // order snapshot keeps the entry as it was at submission
        store
            .update_menu(1, &mut |e| {
                e.price = 99999;
                Ok(())
            })
            .unwrap();
        let first = store.find_order(1).unwrap().unwrap();
        assert_eq!(first.items[0].menu_item.price, 25000);

        // status update and rejected update
        let updated = store
            .update_order(1, &mut |o| {
                o.status = OrderStatus::Processing;
                Ok(())
            })
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Processing);
        let err = store
            .update_order(1, &mut |_| Err(AppError::new(ErrorCode::InvalidStatusTransition)))
            .unwrap_err();
        assert!(matches!(err, RepoError::Rejected(_)));
        assert_eq!(
            store.find_order(1).unwrap().unwrap().status,
            OrderStatus::Processing
        );
        assert!(store.update_order(42, &mut |_| Ok(())).unwrap().is_none());

        // list keeps insertion order
        let ids: Vec<i64> = store.list_orders().unwrap().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2]);

        // menu delete; ids are never reused
        assert!(store.delete_menu(2).unwrap());
        assert!(!store.delete_menu(2).unwrap());
        let kopi = store.insert_menu(entry("Kopi", 8000, 1)).unwrap();
        assert_eq!(kopi.id, 3);
        assert!(store.update_menu(2, &mut |_| Ok(())).unwrap().is_none());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;

    #[test]
    fn test_reserve_lines_merges_repeated_ids() {
        let mut catalog = BTreeMap::new();
        let mut e = test_support::entry("Nasi", 1000, 10);
        e.id = 1;
        catalog.insert(1, e);

        let items = vec![
            OrderItemInput { menu_item_id: 1, quantity: 2 },
            OrderItemInput { menu_item_id: 1, quantity: 3 },
        ];
        let (lines, touched) =
            reserve_lines(&items, 5, |id| Ok(catalog.get(&id).cloned())).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 5);
        assert_eq!(lines[0].menu_item.stock, 10);
        assert_eq!(touched[&1].stock, 5);
        assert_eq!(touched[&1].updated_at, 5);
    }

    #[test]
    fn test_reserve_lines_rejects_oversized_merge() {
        let mut catalog = BTreeMap::new();
        let mut e = test_support::entry("Nasi", 25000, 50);
        e.id = 1;
        catalog.insert(1, e);

        for items in [
            vec![
                OrderItemInput { menu_item_id: 1, quantity: i32::MAX },
                OrderItemInput { menu_item_id: 1, quantity: 2 },
            ],
            vec![
                OrderItemInput { menu_item_id: 1, quantity: 600 },
                OrderItemInput { menu_item_id: 1, quantity: 600 },
            ],
            vec![OrderItemInput { menu_item_id: 1, quantity: -3 }],
        ] {
            let err = reserve_lines(&items, 5, |id| Ok(catalog.get(&id).cloned())).unwrap_err();
            match err {
                RepoError::Rejected(e) => assert_eq!(e.code, ErrorCode::ValidationFailed),
                other => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(catalog[&1].stock, 50);
    }

    #[test]
    fn test_repo_error_into_app_error() {
        let err: AppError = RepoError::Database("disk full".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);

        let err: AppError = RepoError::Rejected(AppError::order_not_found(3)).into();
        assert_eq!(err.code, ErrorCode::OrderNotFound);
    }
}
