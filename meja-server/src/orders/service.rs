//! Order Service
//!
//! Order submission and the status lifecycle. Totals are always computed
//! from the menu entries held by the store, never from client input.

use std::sync::Arc;

use shared::ErrorCode;
use shared::models::{CreateOrderRequest, Order, OrderStatus, StatusCounts};
use shared::util::now_millis;

use crate::db::{NewOrder, Store};
use crate::utils::validation::{MAX_LINE_QUANTITY, MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// Order lifecycle manager
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn Store>,
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService")
            .field("backend", &self.store.backend_name())
            .finish()
    }
}

impl OrderService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Submit a customer order
    ///
    /// # Errors
    ///
    /// | Condition | Code |
    /// |-----------|------|
    /// | blank customer name | `RequiredField` |
    /// | table number missing or ≤ 0 | `InvalidTableNumber` |
    /// | no items | `OrderEmpty` |
    /// | quantity < 1 | `ValidationFailed` |
    /// | unknown menu id | `MenuItemNotFound` |
    /// | entry switched off or sold out | `MenuItemUnavailable` |
    /// | quantity above stock | `InsufficientStock` |
    pub fn create_order(&self, req: CreateOrderRequest) -> AppResult<Order> {
        self.create_order_at(req, now_millis())
    }

    pub(crate) fn create_order_at(&self, req: CreateOrderRequest, now: i64) -> AppResult<Order> {
        let new = validate_request(req, now)?;
        let table_number = new.table_number;
        let order = self.store.create_order(new)?;

        tracing::info!(
            order_id = order.id,
            table_number,
            items = order.items.len(),
            total = order.total,
            "Order created"
        );
        Ok(order)
    }

    /// All orders in insertion order, optionally only one status
    pub fn list_orders(&self, status: Option<OrderStatus>) -> AppResult<Vec<Order>> {
        let orders = self.store.list_orders()?;
        Ok(match status {
            Some(status) => orders.into_iter().filter(|o| o.status == status).collect(),
            None => orders,
        })
    }

    pub fn get_order(&self, id: i64) -> AppResult<Order> {
        self.store
            .find_order(id)?
            .ok_or_else(|| AppError::order_not_found(id))
    }

    /// Move an order to `status`
    ///
    /// Setting the current status again is a no-op and leaves `updated_at`
    /// alone. Anything other than the next step is rejected.
    pub fn update_status(&self, id: i64, status: OrderStatus) -> AppResult<Order> {
        self.update_status_at(id, status, now_millis())
    }

    pub(crate) fn update_status_at(
        &self,
        id: i64,
        status: OrderStatus,
        now: i64,
    ) -> AppResult<Order> {
        let mut previous = None;
        let updated = self.store.update_order(id, &mut |order| {
            previous = Some(order.status);
            if order.status == status {
                return Ok(());
            }
            if !order.status.can_transition_to(status) {
                return Err(invalid_transition(order, status));
            }
            order.status = status;
            order.updated_at = now.max(order.updated_at);
            Ok(())
        })?;

        let order = updated.ok_or_else(|| AppError::order_not_found(id))?;
        if previous != Some(status) {
            tracing::info!(
                order_id = id,
                from = ?previous,
                to = %status,
                "Order status changed"
            );
        }
        Ok(order)
    }

    /// Number of orders per status
    pub fn status_counts(&self) -> AppResult<StatusCounts> {
        Ok(StatusCounts::from_orders(&self.store.list_orders()?))
    }
}

fn invalid_transition(order: &Order, to: OrderStatus) -> AppError {
    let message = if order.status.is_terminal() {
        format!("Order {} is already {}", order.id, order.status)
    } else {
        format!("Order {} cannot move from {} to {}", order.id, order.status, to)
    };
    AppError::with_message(ErrorCode::InvalidStatusTransition, message)
        .with_detail("order_id", order.id)
        .with_detail("from", order.status.as_str())
        .with_detail("to", to.as_str())
}

fn validate_request(req: CreateOrderRequest, now: i64) -> AppResult<NewOrder> {
    if req.customer_name.trim().is_empty() {
        return Err(AppError::required("customerName"));
    }
    validate_required_text(&req.customer_name, "customerName", MAX_NAME_LEN)?;

    let table_number = match req.table_number {
        Some(n) if n > 0 => n,
        other => {
            let err = AppError::with_message(
                ErrorCode::InvalidTableNumber,
                "tableNumber must be a positive number",
            );
            return Err(match other {
                Some(n) => err.with_detail("tableNumber", n),
                None => err,
            });
        }
    };

    if req.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    if let Some(item) = req.items.iter().find(|i| i.quantity < 1) {
        return Err(AppError::validation("quantity must be at least 1")
            .with_detail("menu_item_id", item.menu_item_id)
            .with_detail("quantity", item.quantity));
    }
    if let Some(item) = req.items.iter().find(|i| i.quantity > MAX_LINE_QUANTITY) {
        return Err(
            AppError::validation(format!("quantity must be at most {MAX_LINE_QUANTITY}"))
                .with_detail("menu_item_id", item.menu_item_id)
                .with_detail("quantity", item.quantity),
        );
    }

    Ok(NewOrder {
        customer_name: req.customer_name.trim().to_string(),
        table_number,
        items: req.items,
        now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::db::seed::seed_if_empty;
    use shared::models::OrderItemInput;

    const T0: i64 = 1_718_000_000_000;

    fn service() -> (OrderService, Arc<dyn Store>) {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        seed_if_empty(store.as_ref(), T0).unwrap();
        (OrderService::new(store.clone()), store)
    }

    fn request(name: &str, table: Option<i32>, items: &[(i64, i32)]) -> CreateOrderRequest {
        CreateOrderRequest {
            customer_name: name.to_string(),
            table_number: table,
            items: items
                .iter()
                .map(|&(menu_item_id, quantity)| OrderItemInput {
                    menu_item_id,
                    quantity,
                })
                .collect(),
        }
    }

    #[test]
    fn test_create_order_computes_total_server_side() {
        let (orders, store) = service();
        // 2 × Nasi Goreng Special (25000) + 3 × Es Teh Manis (5000)
        let order = orders
            .create_order_at(request(" Siti ", Some(7), &[(1, 2), (3, 3)]), T0)
            .unwrap();

        assert_eq!(order.id, 1);
        assert_eq!(order.customer_name, "Siti");
        assert_eq!(order.table_number, 7);
        assert_eq!(order.total, 65000);
        assert_eq!(order.status, OrderStatus::Waiting);
        assert_eq!((order.created_at, order.updated_at), (T0, T0));
        assert_eq!(order.items[0].menu_item.name, "Nasi Goreng Special");
        assert_eq!(store.find_menu(1).unwrap().unwrap().stock, 48);
    }

    #[test]
    fn test_create_order_validation() {
        let (orders, store) = service();

        let cases = [
            (request("", Some(1), &[(1, 1)]), ErrorCode::RequiredField),
            (request("   ", Some(1), &[(1, 1)]), ErrorCode::RequiredField),
            (request("Andi", None, &[(1, 1)]), ErrorCode::InvalidTableNumber),
            (request("Andi", Some(0), &[(1, 1)]), ErrorCode::InvalidTableNumber),
            (request("Andi", Some(-2), &[(1, 1)]), ErrorCode::InvalidTableNumber),
            (request("Andi", Some(1), &[]), ErrorCode::OrderEmpty),
            (request("Andi", Some(1), &[(1, 0)]), ErrorCode::ValidationFailed),
            (request("Andi", Some(1), &[(1, 1000)]), ErrorCode::ValidationFailed),
            (
                request("Andi", Some(1), &[(1, i32::MAX), (1, 2)]),
                ErrorCode::ValidationFailed,
            ),
            (request("Andi", Some(1), &[(1, 999), (1, 999)]), ErrorCode::ValidationFailed),
        ];
        for (req, code) in cases {
            let err = orders.create_order_at(req, T0).unwrap_err();
            assert_eq!(err.code, code);
            assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
        }
        assert!(store.list_orders().unwrap().is_empty());
        assert_eq!(store.find_menu(1).unwrap().unwrap().stock, 50);
    }

    #[test]
    fn test_create_order_stock_rules() {
        let (orders, _) = service();

        let err = orders
            .create_order_at(request("Andi", Some(1), &[(42, 1)]), T0)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuItemNotFound);

        // Ayam Bakar Madu has 30 portions
        let err = orders
            .create_order_at(request("Andi", Some(1), &[(2, 31)]), T0)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        orders
            .create_order_at(request("Andi", Some(1), &[(2, 30)]), T0)
            .unwrap();
        let err = orders
            .create_order_at(request("Rina", Some(2), &[(2, 1)]), T0)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuItemUnavailable);
        assert_eq!(orders.list_orders(None).unwrap().len(), 1);
    }

    #[test]
    fn test_status_lifecycle() {
        let (orders, _) = service();
        let order = orders
            .create_order_at(request("Dewi", Some(3), &[(6, 1)]), T0)
            .unwrap();

        let step = orders
            .update_status_at(order.id, OrderStatus::Processing, T0 + 1000)
            .unwrap();
        assert_eq!(step.status, OrderStatus::Processing);
        assert_eq!(step.updated_at, T0 + 1000);

        // same status again: nothing changes
        let same = orders
            .update_status_at(order.id, OrderStatus::Processing, T0 + 5000)
            .unwrap();
        assert_eq!(same.updated_at, T0 + 1000);

        // skipping a step is rejected
        let err = orders
            .update_status_at(order.id, OrderStatus::Completed, T0 + 6000)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);

        // going back is rejected
        let err = orders
            .update_status_at(order.id, OrderStatus::Waiting, T0 + 6000)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStatusTransition);

        // a clock behind the stored timestamp never moves updated_at back
        let delivered = orders
            .update_status_at(order.id, OrderStatus::Delivered, T0)
            .unwrap();
        assert_eq!(delivered.updated_at, T0 + 1000);

        let done = orders
            .update_status_at(order.id, OrderStatus::Completed, T0 + 9000)
            .unwrap();
        assert!(done.status.is_terminal());

        // selesai again is a no-op
        let again = orders
            .update_status_at(order.id, OrderStatus::Completed, T0 + 9500)
            .unwrap();
        assert_eq!(again.status, OrderStatus::Completed);
        assert_eq!(again.updated_at, T0 + 9000);

        let err = orders
            .update_status_at(order.id, OrderStatus::Waiting, T0 + 9999)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
        assert_eq!(orders.get_order(order.id).unwrap().status, OrderStatus::Completed);
    }

    #[test]
    fn test_update_unknown_order() {
        let (orders, _) = service();
        let err = orders.update_status(77, OrderStatus::Processing).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        assert_eq!(err.http_status(), http::StatusCode::NOT_FOUND);
        assert!(orders.list_orders(None).unwrap().is_empty());
    }

    #[test]
    fn test_filter_and_counts() {
        let (orders, _) = service();
        for table in 1..=3 {
            orders
                .create_order_at(request("Tamu", Some(table), &[(4, 1)]), T0)
                .unwrap();
        }
        orders
            .update_status_at(2, OrderStatus::Processing, T0 + 1)
            .unwrap();

        let waiting = orders.list_orders(Some(OrderStatus::Waiting)).unwrap();
        assert_eq!(waiting.iter().map(|o| o.id).collect::<Vec<_>>(), vec![1, 3]);

        let counts = orders.status_counts().unwrap();
        assert_eq!(counts.all, 3);
        assert_eq!(counts.menunggu, 2);
        assert_eq!(counts.diproses, 1);
        assert_eq!(counts.selesai, 0);
    }
}
