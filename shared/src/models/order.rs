//! Order Model

use super::menu::MenuEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order status
///
/// Lifecycle: menunggu → diproses → diantar → selesai. Only the next step is
/// a legal transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "menunggu")]
    Waiting,
    #[serde(rename = "diproses")]
    Processing,
    #[serde(rename = "diantar")]
    Delivered,
    #[serde(rename = "selesai")]
    Completed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Waiting,
        OrderStatus::Processing,
        OrderStatus::Delivered,
        OrderStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Waiting => "menunggu",
            OrderStatus::Processing => "diproses",
            OrderStatus::Delivered => "diantar",
            OrderStatus::Completed => "selesai",
        }
    }

    /// The following step, `None` once completed
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Waiting => Some(OrderStatus::Processing),
            OrderStatus::Processing => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => Some(OrderStatus::Completed),
            OrderStatus::Completed => None,
        }
    }

    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        self.next() == Some(target)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised status string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown order status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Cart line: a menu entry snapshot and a quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub menu_item: MenuEntry,
    pub quantity: i32,
}

impl CartLine {
    pub fn new(menu_item: MenuEntry, quantity: i32) -> Self {
        Self {
            menu_item,
            quantity,
        }
    }

    /// price × quantity, saturating at `i64::MAX`
    pub fn subtotal(&self) -> i64 {
        self.menu_item.price.saturating_mul(i64::from(self.quantity))
    }
}

/// Σ price × quantity over the lines, saturating at `i64::MAX`
pub fn lines_total(lines: &[CartLine]) -> i64 {
    lines
        .iter()
        .map(CartLine::subtotal)
        .fold(0i64, i64::saturating_add)
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    pub table_number: i32,
    /// Menu entries as they were at submission time
    pub items: Vec<CartLine>,
    /// Total in rupiah, computed by the server
    pub total: i64,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    pub fn item_count(&self) -> i32 {
        self.items.iter().map(|line| line.quantity).sum()
    }
}

/// One requested order line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub menu_item_id: i64,
    pub quantity: i32,
}

/// Create order payload
///
/// Prices are never taken from the client, only menu ids and quantities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub customer_name: String,
    pub table_number: Option<i32>,
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
}

/// Status update payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Number of orders per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub all: usize,
    pub menunggu: usize,
    pub diproses: usize,
    pub diantar: usize,
    pub selesai: usize,
}

impl StatusCounts {
    pub fn from_orders<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Self {
        orders
            .into_iter()
            .fold(StatusCounts::default(), |mut counts, order| {
                counts.all += 1;
                match order.status {
                    OrderStatus::Waiting => counts.menunggu += 1,
                    OrderStatus::Processing => counts.diproses += 1,
                    OrderStatus::Delivered => counts.diantar += 1,
                    OrderStatus::Completed => counts.selesai += 1,
                }
                counts
            })
    }

    pub fn get(&self, status: OrderStatus) -> usize {
        match status {
            OrderStatus::Waiting => self.menunggu,
            OrderStatus::Processing => self.diproses,
            OrderStatus::Delivered => self.diantar,
            OrderStatus::Completed => self.selesai,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MenuCategory;

    fn line(id: i64, price: i64, quantity: i32) -> CartLine {
        CartLine::new(
            MenuEntry {
                id,
                name: format!("item-{}", id),
                price,
                category: MenuCategory::Minuman,
                stock: 10,
                available: true,
                description: None,
                image: None,
                created_at: 0,
                updated_at: 0,
            },
            quantity,
        )
    }

    #[test]
    fn test_status_machine_forward_only() {
        use OrderStatus::*;
        assert!(Waiting.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Delivered));
        assert!(Delivered.can_transition_to(Completed));

        assert!(!Waiting.can_transition_to(Delivered));
        assert!(!Processing.can_transition_to(Waiting));
        assert!(!Completed.can_transition_to(Waiting));
        assert!(!Waiting.can_transition_to(Waiting));
        assert_eq!(Completed.next(), None);
        assert!(Completed.is_terminal());
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&OrderStatus::Waiting).unwrap(), "\"menunggu\"");
        assert_eq!(serde_json::to_string(&OrderStatus::Delivered).unwrap(), "\"diantar\"");
        let s: OrderStatus = serde_json::from_str("\"selesai\"").unwrap();
        assert_eq!(s, OrderStatus::Completed);
        assert!(serde_json::from_str::<OrderStatus>("\"dibatalkan\"").is_err());
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("diproses".parse::<OrderStatus>(), Ok(OrderStatus::Processing));
        assert!("waiting".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_lines_total() {
        let lines = vec![line(1, 25000, 2), line(3, 5000, 3)];
        assert_eq!(lines_total(&lines), 65000);
        assert_eq!(lines_total(&[]), 0);

        let huge = vec![line(1, i64::MAX / 2, 3), line(2, 1000, 1)];
        assert_eq!(huge[0].subtotal(), i64::MAX);
        assert_eq!(lines_total(&huge), i64::MAX);
    }

    #[test]
    fn test_status_counts() {
        let mk = |id, status| Order {
            id,
            customer_name: "Budi".to_string(),
            table_number: 1,
            items: vec![line(1, 1000, 1)],
            total: 1000,
            status,
            created_at: 0,
            updated_at: 0,
        };
        let orders = vec![
            mk(1, OrderStatus::Waiting),
            mk(2, OrderStatus::Waiting),
            mk(3, OrderStatus::Completed),
        ];
        let counts = StatusCounts::from_orders(&orders);
        assert_eq!(counts.all, 3);
        assert_eq!(counts.get(OrderStatus::Waiting), 2);
        assert_eq!(counts.selesai, 1);
        assert_eq!(counts.diproses, 0);
    }

    #[test]
    fn test_create_request_missing_fields_deserialize() {
        let req: CreateOrderRequest = serde_json::from_str("{}").unwrap();
        assert!(req.customer_name.is_empty());
        assert!(req.table_number.is_none());
        assert!(req.items.is_empty());

        let req: CreateOrderRequest = serde_json::from_str(
            r#"{"customerName":"Sari","tableNumber":4,"items":[{"menuItemId":2,"quantity":1}]}"#,
        )
        .unwrap();
        assert_eq!(req.table_number, Some(4));
        assert_eq!(req.items[0].menu_item_id, 2);
    }
}
