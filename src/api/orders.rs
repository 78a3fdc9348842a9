use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, warn};

use crate::{
    api::RestBackend,
    app_error::AppError,
    kitchen::OrderStatus,
    models::{Order, OrderPayload},
    normalize,
    session::Session,
};

#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn submit_order(
        &self,
        session: &Session,
        payload: &OrderPayload,
    ) -> Result<Order, AppError>;

    async fn list_kitchen_orders(&self, session: &Session) -> Result<Vec<Order>, AppError>;

    /// Returns the order as the backend sees it after the change, or `None`
    /// when the change was accepted but no fresh copy could be read back.
    /// Only a rejected change is an error.
    async fn set_order_status(
        &self,
        session: &Session,
        order_id: &str,
        status: &OrderStatus,
    ) -> Result<Option<Order>, AppError>;
}

/// Fills whatever the backend left out of its answer from what was sent.
fn accepted_order(value: serde_json::Value, payload: &OrderPayload) -> Order {
    let value = normalize::unwrap_object(value, &["data", "order"]);
    let mut order = normalize::order(&value).unwrap_or_else(|| {
        warn!("Backend accepted order for {} without an id", payload.table_id);
        Order {
            id: String::new(),
            table_id: String::new(),
            lines: Vec::new(),
            total_amount: payload.total_amount,
            status: OrderStatus::New,
        }
    });

    if order.table_id.is_empty() {
        order.table_id = payload.table_id.clone();
    }
    if order.lines.is_empty() {
        order.lines = payload.lines.clone();
        order.total_amount = payload.total_amount;
    }
    order
}

#[async_trait]
impl OrderApi for RestBackend {
    async fn submit_order(
        &self,
        session: &Session,
        payload: &OrderPayload,
    ) -> Result<Order, AppError> {
        let builder = self
            .request(Method::POST, &["api", "orders"], session)?
            .json(payload);
        let value = self
            .send(builder, AppError::Submission, "Failed to place order")
            .await?;
        Ok(accepted_order(value, payload))
    }

    async fn list_kitchen_orders(&self, session: &Session) -> Result<Vec<Order>, AppError> {
        let value = self
            .get(&["api", "orders", "chef"], session, "Error loading orders")
            .await?;
        Ok(normalize::orders(value))
    }

    async fn set_order_status(
        &self,
        session: &Session,
        order_id: &str,
        status: &OrderStatus,
    ) -> Result<Option<Order>, AppError> {
        let builder = self
            .request(Method::PUT, &["api", "orders", order_id, "status"], session)?
            .json(&json!({ "status": status }));
        let value = self
            .send(builder, AppError::Transition, "Failed to update status")
            .await?;

        // Re-read the board so the caller sees the backend's view, lines included.
        match self.list_kitchen_orders(session).await {
            Ok(board) => {
                if let Some(order) = board.into_iter().find(|order| order.id == order_id) {
                    return Ok(Some(order));
                }
                debug!("Order #{} left the board after moving to {}", order_id, status);
            }
            Err(err) => warn!(
                "Order #{} moved to {} but the board could not be reloaded: {}",
                order_id, status, err
            ),
        }

        let value = normalize::unwrap_object(value, &["data", "order"]);
        Ok(normalize::order(&value).filter(|order| order.id == order_id))
    }
}
