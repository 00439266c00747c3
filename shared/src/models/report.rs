//! Report Model
//!
//! Report and dashboard payloads returned by `/api/reports`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::menu::MenuCategory;
use super::order::Order;
use crate::util::DAY_MILLIS;

/// Report window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportPeriod {
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
}

impl ReportPeriod {
    pub fn days(&self) -> i64 {
        match self {
            ReportPeriod::Week => 7,
            ReportPeriod::Month => 30,
            ReportPeriod::Quarter => 90,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPeriod::Week => "7d",
            ReportPeriod::Month => "30d",
            ReportPeriod::Quarter => "90d",
        }
    }

    /// First millisecond inside the window ending at `now`
    pub fn window_start(&self, now: i64) -> i64 {
        now - self.days() * DAY_MILLIS
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7d" => Ok(ReportPeriod::Week),
            "30d" => Ok(ReportPeriod::Month),
            "90d" => Ok(ReportPeriod::Quarter),
            other => Err(format!("unknown report period: {}", other)),
        }
    }
}

/// Revenue of one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: i64,
    pub orders: usize,
}

/// Sales of one menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuPopularity {
    pub menu_item_id: i64,
    pub name: String,
    pub quantity: i64,
    pub revenue: i64,
}

/// Portions sold per category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category: MenuCategory,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_revenue: i64,
    pub total_orders: usize,
    pub average_order_value: f64,
    /// Catalog size, not limited to the window
    pub total_menu_items: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub period: ReportPeriod,
    pub from: i64,
    pub to: i64,
    pub daily_revenue: Vec<DailyRevenue>,
    pub menu_popularity: Vec<MenuPopularity>,
    pub category_stats: Vec<CategoryStat>,
    pub summary: ReportSummary,
}

/// Dashboard figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_orders: usize,
    pub total_revenue: i64,
    /// Orders still `menunggu`
    pub pending_orders: usize,
    pub today_orders: usize,
    pub today_revenue: i64,
    pub total_menu_items: usize,
    /// Newest first
    pub recent_orders: Vec<Order>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_parse_and_default() {
        assert_eq!("30d".parse::<ReportPeriod>(), Ok(ReportPeriod::Month));
        assert!("1y".parse::<ReportPeriod>().is_err());
        assert_eq!(ReportPeriod::default(), ReportPeriod::Week);
        assert_eq!(
            serde_json::to_string(&ReportPeriod::Quarter).unwrap(),
            "\"90d\""
        );
    }

    #[test]
    fn test_window_start() {
        assert_eq!(ReportPeriod::Week.window_start(8 * DAY_MILLIS), DAY_MILLIS);
    }
}
