//! redb-based store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `menu_items` | `id` | `MenuEntry` (JSON) | Catalog |
//! | `orders` | `id` | `Order` (JSON) | Orders, key order = insertion order |
//! | `sequence_counter` | `"menu_id"` / `"order_id"` | `u64` | Monotonic id counters |
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate` by default: a commit is
//! persistent once `commit()` returns and the file is always consistent.

use std::path::Path;
use std::sync::Arc;

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
    WriteTransaction,
};
use shared::AppResult;
use shared::models::{MenuEntry, Order};

use super::{NewOrder, RepoResult, Store, build_order, reserve_lines};

/// Menu entries: key = id, value = JSON-serialized MenuEntry
const MENU_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("menu_items");

/// Orders: key = id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("orders");

/// Id counters: key = counter name, value = last assigned id
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequence_counter");

const MENU_ID_KEY: &str = "menu_id";
const ORDER_ID_KEY: &str = "order_id";

/// Store backed by redb
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| super::RepoError::Database(e.to_string()))?;
        }
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database
    pub fn open_in_memory() -> RepoResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> RepoResult<Self> {
        // Create all tables if they don't exist
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(MENU_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(SEQUENCE_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Increment a counter inside the transaction and return the new value
    fn next_id(txn: &WriteTransaction, key: &str) -> RepoResult<i64> {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        let current = table.get(key)?.map(|guard| guard.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(key, next)?;
        Ok(next as i64)
    }

    /// Current counter value (read-only)
    pub fn current_id(&self, key: &str) -> RepoResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SEQUENCE_TABLE)?;
        Ok(table.get(key)?.map(|guard| guard.value()).unwrap_or(0))
    }
}

impl Store for RedbStore {
    fn backend_name(&self) -> &'static str {
        "redb"
    }

    // ========== Menu ==========

    fn list_menu(&self) -> RepoResult<Vec<MenuEntry>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MENU_TABLE)?;

        let mut entries = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            entries.push(serde_json::from_slice(value.value())?);
        }
        Ok(entries)
    }

    fn find_menu(&self, id: i64) -> RepoResult<Option<MenuEntry>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MENU_TABLE)?;

        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn menu_count(&self) -> RepoResult<usize> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MENU_TABLE)?;
        Ok(table.len()? as usize)
    }

    fn insert_menu(&self, mut entry: MenuEntry) -> RepoResult<MenuEntry> {
        let txn = self.db.begin_write()?;
        entry.id = Self::next_id(&txn, MENU_ID_KEY)?;
        entry.enforce_availability();
        {
            let mut table = txn.open_table(MENU_TABLE)?;
            let value = serde_json::to_vec(&entry)?;
            table.insert(entry.id, value.as_slice())?;
        }
        txn.commit()?;
        Ok(entry)
    }

    fn update_menu(
        &self,
        id: i64,
        apply: &mut dyn FnMut(&mut MenuEntry) -> AppResult<()>,
    ) -> RepoResult<Option<MenuEntry>> {
        let txn = self.db.begin_write()?;
        let updated = {
            let mut table = txn.open_table(MENU_TABLE)?;
            let current: Option<MenuEntry> = match table.get(id)? {
                Some(value) => Some(serde_json::from_slice(value.value())?),
                None => None,
            };

            match current {
                Some(mut entry) => {
                    apply(&mut entry)?;
                    entry.id = id;
                    entry.enforce_availability();
                    let value = serde_json::to_vec(&entry)?;
                    table.insert(id, value.as_slice())?;
                    Some(entry)
                }
                None => None,
            }
        };

        if updated.is_some() {
            txn.commit()?;
        } else {
            txn.abort()?;
        }
        Ok(updated)
    }

    fn delete_menu(&self, id: i64) -> RepoResult<bool> {
        let txn = self.db.begin_write()?;
        let removed = {
            let mut table = txn.open_table(MENU_TABLE)?;
            table.remove(id)?.is_some()
        };
        txn.commit()?;
        Ok(removed)
    }

    // ========== Orders ==========

    fn create_order(&self, new: NewOrder) -> RepoResult<Order> {
        let txn = self.db.begin_write()?;
        let order = {
            let mut menu = txn.open_table(MENU_TABLE)?;
            let (items, touched) = reserve_lines(&new.items, new.now, |id| {
                let found = match menu.get(id)? {
                    Some(value) => Some(serde_json::from_slice(value.value())?),
                    None => None,
                };
                Ok(found)
            })?;

            for (id, entry) in &touched {
                let value = serde_json::to_vec(entry)?;
                menu.insert(*id, value.as_slice())?;
            }

            let id = Self::next_id(&txn, ORDER_ID_KEY)?;
            let order = build_order(id, &new, items);

            let mut orders = txn.open_table(ORDERS_TABLE)?;
            let value = serde_json::to_vec(&order)?;
            orders.insert(order.id, value.as_slice())?;
            order
        };
        txn.commit()?;
        Ok(order)
    }

    fn list_orders(&self) -> RepoResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            orders.push(serde_json::from_slice(value.value())?);
        }
        Ok(orders)
    }

    fn find_order(&self, id: i64) -> RepoResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn update_order(
        &self,
        id: i64,
        apply: &mut dyn FnMut(&mut Order) -> AppResult<()>,
    ) -> RepoResult<Option<Order>> {
        let txn = self.db.begin_write()?;
        let updated = {
            let mut table = txn.open_table(ORDERS_TABLE)?;
            let current: Option<Order> = match table.get(id)? {
                Some(value) => Some(serde_json::from_slice(value.value())?),
                None => None,
            };

            match current {
                Some(mut order) => {
                    apply(&mut order)?;
                    order.id = id;
                    let value = serde_json::to_vec(&order)?;
                    table.insert(id, value.as_slice())?;
                    Some(order)
                }
                None => None,
            }
        };

        if updated.is_some() {
            txn.commit()?;
        } else {
            txn.abort()?;
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{entry, exercise_store, new_order};

    #[test]
    fn test_redb_store_behaviour() {
        let store = RedbStore::open_in_memory().unwrap();
        exercise_store(&store);
    }

    #[test]
    fn test_counters_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database").join("meja.redb");

        {
            let store = RedbStore::open(&path).unwrap();
            store.insert_menu(entry("Mie Goreng", 20000, 40)).unwrap();
            store.create_order(new_order(&[(1, 2)])).unwrap();
        }

        let store = RedbStore::open(&path).unwrap();
        assert_eq!(store.current_id(ORDER_ID_KEY).unwrap(), 1);
        assert_eq!(store.find_menu(1).unwrap().unwrap().stock, 38);
        assert_eq!(store.list_orders().unwrap().len(), 1);

        let order = store.create_order(new_order(&[(1, 1)])).unwrap();
        assert_eq!(order.id, 2);
    }

    #[test]
    fn test_concurrent_orders_get_unique_ids() {
        let store = Arc::new(RedbStore::open_in_memory().unwrap());
        store.insert_menu(entry("Kopi Hitam", 8000, 1000)).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    (0..10)
                        .map(|_| store.create_order(new_order(&[(1, 1)])).unwrap().id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<i64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 80);
        assert_eq!(store.find_menu(1).unwrap().unwrap().stock, 920);
    }
}
