//! In-memory store
//!
//! One mutex guards the whole state, so every trait call is a single
//! critical section. Changes are applied to a copy and written back only
//! when the closure succeeds.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use shared::AppResult;
use shared::models::{MenuEntry, Order};

use super::{NewOrder, RepoResult, Store, build_order, reserve_lines};

#[derive(Debug, Default)]
struct Inner {
    menu: BTreeMap<i64, MenuEntry>,
    orders: BTreeMap<i64, Order>,
    last_menu_id: i64,
    last_order_id: i64,
}

/// Store that lives for the process lifetime
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn list_menu(&self) -> RepoResult<Vec<MenuEntry>> {
        Ok(self.inner.lock().menu.values().cloned().collect())
    }

    fn find_menu(&self, id: i64) -> RepoResult<Option<MenuEntry>> {
        Ok(self.inner.lock().menu.get(&id).cloned())
    }

    fn menu_count(&self) -> RepoResult<usize> {
        Ok(self.inner.lock().menu.len())
    }

    fn insert_menu(&self, mut entry: MenuEntry) -> RepoResult<MenuEntry> {
        let mut inner = self.inner.lock();
        inner.last_menu_id += 1;
        entry.id = inner.last_menu_id;
        entry.enforce_availability();
        inner.menu.insert(entry.id, entry.clone());
        Ok(entry)
    }

    fn update_menu(
        &self,
        id: i64,
        apply: &mut dyn FnMut(&mut MenuEntry) -> AppResult<()>,
    ) -> RepoResult<Option<MenuEntry>> {
        let mut inner = self.inner.lock();
        let Some(current) = inner.menu.get(&id) else {
            return Ok(None);
        };

        let mut entry = current.clone();
        apply(&mut entry)?;
        entry.id = id;
        entry.enforce_availability();
        inner.menu.insert(id, entry.clone());
        Ok(Some(entry))
    }

    fn delete_menu(&self, id: i64) -> RepoResult<bool> {
        Ok(self.inner.lock().menu.remove(&id).is_some())
    }

    fn create_order(&self, new: NewOrder) -> RepoResult<Order> {
        let mut inner = self.inner.lock();
        let (items, touched) =
            reserve_lines(&new.items, new.now, |id| Ok(inner.menu.get(&id).cloned()))?;

        inner.menu.extend(touched);
        inner.last_order_id += 1;
        let order = build_order(inner.last_order_id, &new, items);
        inner.orders.insert(order.id, order.clone());
        Ok(order)
    }

    fn list_orders(&self) -> RepoResult<Vec<Order>> {
        Ok(self.inner.lock().orders.values().cloned().collect())
    }

    fn find_order(&self, id: i64) -> RepoResult<Option<Order>> {
        Ok(self.inner.lock().orders.get(&id).cloned())
    }

    fn update_order(
        &self,
        id: i64,
        apply: &mut dyn FnMut(&mut Order) -> AppResult<()>,
    ) -> RepoResult<Option<Order>> {
        let mut inner = self.inner.lock();
        let Some(current) = inner.orders.get(&id) else {
            return Ok(None);
        };

        let mut order = current.clone();
        apply(&mut order)?;
        order.id = id;
        inner.orders.insert(id, order.clone());
        Ok(Some(order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::exercise_store;

    #[test]
    fn test_memory_store_behaviour() {
        exercise_store(&MemoryStore::new());
    }

    #[test]
    fn test_backend_name() {
        assert_eq!(MemoryStore::new().backend_name(), "memory");
    }
}
