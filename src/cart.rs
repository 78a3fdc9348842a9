//! The waiter's in-progress order.

use std::{collections::HashMap, sync::Arc};

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::{
    api::orders::OrderApi,
    app_error::AppError,
    models::{CartLine, MenuItem, Order, OrderPayload},
    session::Session,
};

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum QuantityDelta {
    #[serde(alias = "increment", alias = "+1")]
    Inc,
    #[serde(alias = "decrement", alias = "-1")]
    Dec,
}

/// Lines of one unsubmitted order, in the order they were first added.
/// Every line has a quantity of at least one and a distinct item id.
#[derive(Debug, Default, Clone)]
pub struct OrderCart {
    lines: Vec<CartLine>,
}

impl OrderCart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position(&self, item_id: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.item_id == item_id)
    }

    /// Merges `quantity` of `item` into the cart. A zero quantity is ignored.
    pub fn add_item(&mut self, item: &MenuItem, quantity: u32) {
        if quantity < 1 {
            debug!("Ignoring add of {} with zero quantity", item.id);
            return;
        }

        match self.position(&item.id) {
            Some(index) => {
                let line = &mut self.lines[index];
                line.quantity = line.quantity.saturating_add(quantity);
            }
            None => self.lines.push(CartLine {
                item_id: item.id.clone(),
                name: item.name.clone(),
                unit_price: item.price,
                quantity,
            }),
        }
    }

    /// Applies a ±1 step; a line that reaches zero is dropped.
    pub fn change_quantity(&mut self, item_id: &str, delta: QuantityDelta) {
        let Some(index) = self.position(item_id) else {
            return;
        };

        match delta {
            QuantityDelta::Inc => {
                let line = &mut self.lines[index];
                line.quantity = line.quantity.saturating_add(1);
            }
            QuantityDelta::Dec if self.lines[index].quantity <= 1 => {
                self.lines.remove(index);
            }
            QuantityDelta::Dec => self.lines[index].quantity -= 1,
        }
    }

    pub fn remove_item(&mut self, item_id: &str) {
        self.lines.retain(|line| line.item_id != item_id);
    }

    pub fn cancel(&mut self) {
        self.lines.clear();
    }

    pub fn compute_total(&self) -> f64 {
        self.lines
            .iter()
            .map(|line| {
                let unit_price = if line.unit_price.is_finite() {
                    line.unit_price
                } else {
                    0.0
                };
                unit_price * line.quantity as f64
            })
            .sum()
    }

    /// Hands the cart to the order collaborator for `table_id`.
    ///
    /// The cart is emptied only once the collaborator has accepted the
    /// order; on any failure the lines stay exactly as they were.
    pub async fn submit<A>(
        &mut self,
        api: &A,
        session: &Session,
        table_id: &str,
    ) -> Result<Order, AppError>
    where
        A: OrderApi + ?Sized,
    {
        let table_id = table_id.trim();
        if table_id.is_empty() {
            return Err(AppError::Validation(
                "Please select a table before placing the order".into(),
            ));
        }
        if self.lines.is_empty() {
            return Err(AppError::Validation("Please add at least one item".into()));
        }

        let payload = OrderPayload {
            table_id: table_id.to_string(),
            lines: self.lines.clone(),
            total_amount: self.compute_total(),
        };

        match api.submit_order(session, &payload).await {
            Ok(order) => {
                info!(
                    "Order #{} for {} submitted by {} ({} lines, total {})",
                    order.id,
                    payload.table_id,
                    session.display_name,
                    payload.lines.len(),
                    payload.total_amount
                );
                self.lines.clear();
                Ok(order)
            }
            Err(err) => {
                warn!("Order for {} was not accepted: {}", payload.table_id, err);
                Err(match err {
                    AppError::Submission(_) => err,
                    other => AppError::Submission(other.to_string()),
                })
            }
        }
    }
}

/// One cart per signed-in waiter.
///
/// Each cart sits behind its own async lock so calls against it apply in
/// the order they were issued, including across a pending submit. Only
/// carts holding lines are kept between requests; see [`CartRegistry::release`].
#[derive(Clone, Default)]
pub struct CartRegistry {
    carts: Arc<Mutex<HashMap<String, Arc<Mutex<OrderCart>>>>>,
}

impl CartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn cart_for(&self, session: &Session) -> Result<Arc<Mutex<OrderCart>>, AppError> {
        let key = session.cart_key()?;
        Ok(self.carts.lock().await.entry(key).or_default().clone())
    }

    /// Forgets the session's cart once it is empty and no other request
    /// still holds it. Callers drop their own handle first.
    pub async fn release(&self, session: &Session) {
        let Ok(key) = session.cart_key() else {
            return;
        };

        let mut carts = self.carts.lock().await;
        let idle = carts.get(&key).is_some_and(|cart| {
            Arc::strong_count(cart) == 1 && cart.try_lock().is_ok_and(|cart| cart.is_empty())
        });
        if idle {
            carts.remove(&key);
            debug!("Released empty cart of {}", session.display_name);
        }
    }

    /// Number of carts currently kept.
    pub async fn len(&self) -> usize {
        self.carts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.carts.lock().await.is_empty()
    }
}
