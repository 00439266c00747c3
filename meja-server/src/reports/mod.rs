//! 报表统计
//!
//! 纯函数，输入订单快照，不访问存储。
//!
//! | 函数 | 用途 |
//! |------|------|
//! | [`build_report`] | 报表页: 日营收、菜品排行、分类分布、汇总 |
//! | [`dashboard`] | 仪表盘: 总数、待处理、今日、最近订单 |
//!
//! 按日统计使用配置的业务时区 (默认 Asia/Jakarta)。

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use chrono_tz::Tz;
use shared::models::{MenuCategory, Order, OrderStatus};

pub use shared::models::{
    CategoryStat, DailyRevenue, DashboardStats, MenuPopularity, Report, ReportPeriod,
    ReportSummary,
};

use crate::utils::time::local_date;

/// Entries in the popularity ranking
pub const TOP_MENU_LIMIT: usize = 10;

/// Orders shown on the dashboard
pub const RECENT_ORDERS_LIMIT: usize = 5;

/// Build the report for orders created in `[now - period, now]`
pub fn build_report(
    orders: &[Order],
    menu_count: usize,
    period: ReportPeriod,
    now: i64,
    tz: Tz,
) -> Report {
    let from = period.window_start(now);
    let window: Vec<&Order> = orders.iter().filter(|o| o.created_at >= from).collect();

    Report {
        period,
        from,
        to: now,
        daily_revenue: daily_revenue(&window, tz),
        menu_popularity: menu_popularity(&window),
        category_stats: category_stats(&window),
        summary: summary(&window, menu_count),
    }
}

fn daily_revenue(orders: &[&Order], tz: Tz) -> Vec<DailyRevenue> {
    let mut days: BTreeMap<NaiveDate, (i64, usize)> = BTreeMap::new();
    for order in orders {
        let day = days.entry(local_date(order.created_at, tz)).or_default();
        day.0 += order.total;
        day.1 += 1;
    }

    days.into_iter()
        .map(|(date, (revenue, orders))| DailyRevenue {
            date,
            revenue,
            orders,
        })
        .collect()
}

fn menu_popularity(orders: &[&Order]) -> Vec<MenuPopularity> {
    let mut by_id: HashMap<i64, MenuPopularity> = HashMap::new();
    for line in orders.iter().flat_map(|o| o.items.iter()) {
        let stat = by_id
            .entry(line.menu_item.id)
            .or_insert_with(|| MenuPopularity {
                menu_item_id: line.menu_item.id,
                name: line.menu_item.name.clone(),
                quantity: 0,
                revenue: 0,
            });
        stat.quantity += i64::from(line.quantity);
        stat.revenue += line.subtotal();
    }

    let mut ranking: Vec<MenuPopularity> = by_id.into_values().collect();
    ranking.sort_by(|a, b| {
        b.quantity
            .cmp(&a.quantity)
            .then(b.revenue.cmp(&a.revenue))
            .then(a.menu_item_id.cmp(&b.menu_item_id))
    });
    ranking.truncate(TOP_MENU_LIMIT);
    ranking
}

fn category_stats(orders: &[&Order]) -> Vec<CategoryStat> {
    let mut by_category: BTreeMap<MenuCategory, i64> = BTreeMap::new();
    for line in orders.iter().flat_map(|o| o.items.iter()) {
        *by_category.entry(line.menu_item.category).or_default() += i64::from(line.quantity);
    }

    by_category
        .into_iter()
        .map(|(category, quantity)| CategoryStat { category, quantity })
        .collect()
}

fn summary(orders: &[&Order], menu_count: usize) -> ReportSummary {
    let total_revenue: i64 = orders.iter().map(|o| o.total).sum();
    let total_orders = orders.len();
    let average_order_value = if total_orders == 0 {
        0.0
    } else {
        total_revenue as f64 / total_orders as f64
    };

    ReportSummary {
        total_revenue,
        total_orders,
        average_order_value,
        total_menu_items: menu_count,
    }
}

pub fn dashboard(orders: &[Order], menu_count: usize, now: i64, tz: Tz) -> DashboardStats {
    let today = local_date(now, tz);
    let todays: Vec<&Order> = orders
        .iter()
        .filter(|o| local_date(o.created_at, tz) == today)
        .collect();

    let mut recent: Vec<&Order> = orders.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

    DashboardStats {
        total_orders: orders.len(),
        total_revenue: orders.iter().map(|o| o.total).sum(),
        pending_orders: orders
            .iter()
            .filter(|o| o.status == OrderStatus::Waiting)
            .count(),
        today_orders: todays.len(),
        today_revenue: todays.iter().map(|o| o.total).sum(),
        total_menu_items: menu_count,
        recent_orders: recent
            .into_iter()
            .take(RECENT_ORDERS_LIMIT)
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared::models::{CartLine, MenuEntry};
    use shared::util::DAY_MILLIS;

    const JAKARTA: Tz = chrono_tz::Asia::Jakarta;

    fn millis(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn menu(id: i64, name: &str, price: i64, category: MenuCategory) -> MenuEntry {
        MenuEntry {
            id,
            name: name.into(),
            price,
            category,
            stock: 10,
            available: true,
            description: None,
            image: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn order(id: i64, created_at: i64, lines: Vec<(MenuEntry, i32)>) -> Order {
        let items: Vec<CartLine> = lines
            .into_iter()
            .map(|(entry, qty)| CartLine::new(entry, qty))
            .collect();
        Order {
            id,
            customer_name: format!("Tamu {}", id),
            table_number: 1,
            total: shared::models::lines_total(&items),
            items,
            status: OrderStatus::Waiting,
            created_at,
            updated_at: created_at,
        }
    }

    fn nasi() -> MenuEntry {
        menu(1, "Nasi Goreng Special", 25000, MenuCategory::Makanan)
    }

    fn teh() -> MenuEntry {
        menu(3, "Es Teh Manis", 5000, MenuCategory::Minuman)
    }

    fn kopi() -> MenuEntry {
        menu(6, "Kopi Hitam", 8000, MenuCategory::Minuman)
    }

    #[test]
    fn test_window_excludes_old_orders() {
        let now = millis(2024, 6, 10, 12, 0);
        let orders = vec![
            order(1, now - 8 * DAY_MILLIS, vec![(nasi(), 1)]),
            order(2, now - 7 * DAY_MILLIS, vec![(teh(), 2)]),
            order(3, now - 1000, vec![(kopi(), 1)]),
        ];

        let report = build_report(&orders, 6, ReportPeriod::Week, now, JAKARTA);
        assert_eq!(report.summary.total_orders, 2);
        assert_eq!(report.summary.total_revenue, 18000);
        assert_eq!(report.summary.average_order_value, 9000.0);
        assert_eq!(report.summary.total_menu_items, 6);

        let month = build_report(&orders, 6, ReportPeriod::Month, now, JAKARTA);
        assert_eq!(month.summary.total_orders, 3);
    }

    #[test]
    fn test_daily_buckets_use_business_timezone() {
        let now = millis(2024, 6, 10, 12, 0);
        // 2024-06-09 18:30 UTC is 2024-06-10 01:30 in Jakarta
        let late = millis(2024, 6, 9, 18, 30);
        // 2024-06-09 10:00 UTC is still 2024-06-09 in Jakarta
        let early = millis(2024, 6, 9, 10, 0);
        let orders = vec![
            order(1, late, vec![(nasi(), 1)]),
            order(2, early, vec![(teh(), 1)]),
            order(3, now, vec![(kopi(), 2)]),
        ];

        let report = build_report(&orders, 6, ReportPeriod::Week, now, JAKARTA);
        let days: Vec<(String, i64, usize)> = report
            .daily_revenue
            .iter()
            .map(|d| (d.date.to_string(), d.revenue, d.orders))
            .collect();
        assert_eq!(
            days,
            vec![
                ("2024-06-09".to_string(), 5000, 1),
                ("2024-06-10".to_string(), 41000, 2),
            ]
        );
    }

    #[test]
    fn test_popularity_ranking_and_ties() {
        let now = millis(2024, 6, 10, 12, 0);
        let orders = vec![
            order(1, now, vec![(teh(), 3), (kopi(), 3)]),
            order(2, now, vec![(nasi(), 1), (teh(), 1)]),
        ];

        let report = build_report(&orders, 6, ReportPeriod::Week, now, JAKARTA);
        let ranking: Vec<(i64, i64, i64)> = report
            .menu_popularity
            .iter()
            .map(|m| (m.menu_item_id, m.quantity, m.revenue))
            .collect();
        // teh 4 portions; kopi 3 portions; nasi 1 portion
        assert_eq!(ranking, vec![(3, 4, 20000), (6, 3, 24000), (1, 1, 25000)]);

        // equal quantity: higher revenue first, then lower id
        let tie = vec![order(1, now, vec![(teh(), 2), (kopi(), 2)])];
        let report = build_report(&tie, 6, ReportPeriod::Week, now, JAKARTA);
        assert_eq!(report.menu_popularity[0].menu_item_id, 6);

        let same = menu(2, "Es Teh Tawar", 5000, MenuCategory::Minuman);
        let tie = vec![order(1, now, vec![(teh(), 1), (same, 1)])];
        let report = build_report(&tie, 6, ReportPeriod::Week, now, JAKARTA);
        assert_eq!(report.menu_popularity[0].menu_item_id, 2);
    }

    #[test]
    fn test_popularity_keeps_top_ten() {
        let now = millis(2024, 6, 10, 12, 0);
        let lines: Vec<(MenuEntry, i32)> = (1..=12)
            .map(|id| (menu(id, &format!("Menu {}", id), 1000, MenuCategory::Makanan), id as i32))
            .collect();
        let report = build_report(&[order(1, now, lines)], 12, ReportPeriod::Week, now, JAKARTA);
        assert_eq!(report.menu_popularity.len(), TOP_MENU_LIMIT);
        assert_eq!(report.menu_popularity[0].menu_item_id, 12);
        assert_eq!(report.menu_popularity[9].menu_item_id, 3);
    }

    #[test]
    fn test_category_distribution() {
        let now = millis(2024, 6, 10, 12, 0);
        let orders = vec![order(1, now, vec![(nasi(), 2), (teh(), 1), (kopi(), 4)])];
        let report = build_report(&orders, 6, ReportPeriod::Week, now, JAKARTA);
        assert_eq!(
            report.category_stats,
            vec![
                CategoryStat {
                    category: MenuCategory::Makanan,
                    quantity: 2
                },
                CategoryStat {
                    category: MenuCategory::Minuman,
                    quantity: 5
                },
            ]
        );
    }

    #[test]
    fn test_empty_report() {
        let report = build_report(&[], 0, ReportPeriod::Quarter, 1_000_000_000_000, JAKARTA);
        assert_eq!(report.summary.average_order_value, 0.0);
        assert!(report.daily_revenue.is_empty());
        assert!(report.menu_popularity.is_empty());
        assert!(report.category_stats.is_empty());
    }

    #[test]
    fn test_dashboard() {
        let now = millis(2024, 6, 10, 12, 0);
        let mut orders: Vec<Order> = (1..=7)
            .map(|id| order(id, now - (7 - id) * DAY_MILLIS / 2, vec![(teh(), 1)]))
            .collect();
        orders[6].status = OrderStatus::Processing;
        orders[5].status = OrderStatus::Completed;

        let stats = dashboard(&orders, 6, now, JAKARTA);
        assert_eq!(stats.total_orders, 7);
        assert_eq!(stats.total_revenue, 35000);
        assert_eq!(stats.pending_orders, 5);
        // order 7 at 19:00 Jakarta, order 6 at 07:00 Jakarta on the same day
        assert_eq!(stats.today_orders, 2);
        assert_eq!(stats.today_revenue, 10000);
        let recent: Vec<i64> = stats.recent_orders.iter().map(|o| o.id).collect();
        assert_eq!(recent, vec![7, 6, 5, 4, 3]);
    }
}
