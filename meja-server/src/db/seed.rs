//! 默认菜单
//!
//! 菜单为空时写入六个默认条目

use shared::models::{MenuCategory, MenuEntry};

use super::{RepoResult, Store};

struct SeedItem {
    name: &'static str,
    price: i64,
    category: MenuCategory,
    stock: i32,
    description: &'static str,
    image: &'static str,
}

const DEFAULT_MENU: &[SeedItem] = &[
    SeedItem {
        name: "Nasi Goreng Special",
        price: 25000,
        category: MenuCategory::Makanan,
        stock: 50,
        description: "Nasi goreng dengan telur, ayam, dan sayuran segar",
        image: "/images/nasi-goreng.jpg",
    },
    SeedItem {
        name: "Ayam Bakar Madu",
        price: 30000,
        category: MenuCategory::Makanan,
        stock: 30,
        description: "Ayam bakar dengan saus madu dan rempah-rempah",
        image: "/images/ayam-bakar.jpg",
    },
    SeedItem {
        name: "Es Teh Manis",
        price: 5000,
        category: MenuCategory::Minuman,
        stock: 100,
        description: "Teh manis dingin yang menyegarkan",
        image: "/images/es-teh.jpg",
    },
    SeedItem {
        name: "Jus Jeruk",
        price: 10000,
        category: MenuCategory::Minuman,
        stock: 80,
        description: "Jus jeruk segar tanpa gula tambahan",
        image: "/images/jus-jeruk.jpg",
    },
    SeedItem {
        name: "Mie Goreng",
        price: 20000,
        category: MenuCategory::Makanan,
        stock: 40,
        description: "Mie goreng dengan sayuran dan telur",
        image: "/images/mie-goreng.jpg",
    },
    SeedItem {
        name: "Kopi Hitam",
        price: 8000,
        category: MenuCategory::Minuman,
        stock: 60,
        description: "Kopi hitam pekat untuk pecinta kopi",
        image: "/images/kopi.jpg",
    },
];

/// 默认菜单条目 (id 由存储分配)
pub fn default_menu(now: i64) -> Vec<MenuEntry> {
    DEFAULT_MENU
        .iter()
        .map(|item| MenuEntry {
            id: 0,
            name: item.name.to_string(),
            price: item.price,
            category: item.category,
            stock: item.stock,
            available: true,
            description: Some(item.description.to_string()),
            image: Some(item.image.to_string()),
            created_at: now,
            updated_at: now,
        })
        .collect()
}

/// 菜单为空时写入默认菜单，返回写入条数
pub fn seed_if_empty(store: &dyn Store, now: i64) -> RepoResult<usize> {
    if store.menu_count()? > 0 {
        return Ok(0);
    }

    let entries = default_menu(now);
    let count = entries.len();
    for entry in entries {
        store.insert_menu(entry)?;
    }
    tracing::info!(count, "Seeded default menu");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[test]
    fn test_seed_fills_empty_catalog_once() {
        let store = MemoryStore::new();
        assert_eq!(seed_if_empty(&store, 10).unwrap(), 6);
        assert_eq!(seed_if_empty(&store, 20).unwrap(), 0);

        let menu = store.list_menu().unwrap();
        assert_eq!(menu.len(), 6);
        assert_eq!(menu[0].id, 1);
        assert_eq!(menu[0].name, "Nasi Goreng Special");
        assert_eq!(menu[5].name, "Kopi Hitam");
        assert!(menu.iter().all(|e| e.available && e.stock > 0));
    }

    #[test]
    fn test_seed_categories() {
        let menu = default_menu(0);
        let minuman = menu
            .iter()
            .filter(|e| e.category == MenuCategory::Minuman)
            .count();
        assert_eq!(minuman, 3);
    }
}
