//! Kitchen order lifecycle: status normalization and the forward-only
//! transition gate used by the chef board.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::{app_error::AppError, api::orders::OrderApi, models::Order, session::Session};

const NEW_SYNONYMS: &[&str] = &["new", "pending", "placed"];
const PREPARING_SYNONYMS: &[&str] = &["preparing", "cooking", "in_progress"];
const READY_SYNONYMS: &[&str] = &["ready", "done", "completed"];

/// Caption shown on READY tickets, which offer no action.
pub const AWAITING_PICKUP: &str = "Waiting for Pickup";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    New,
    Preparing,
    Ready,
    /// Any backend token outside the canonical vocabulary, upper-cased.
    Unrecognized(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::Unrecognized(raw) => raw,
        }
    }

    pub fn is_canonical(&self) -> bool {
        !matches!(self, OrderStatus::Unrecognized(_))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(normalize_status(&raw))
    }
}

/// Maps any backend status token onto the canonical vocabulary.
/// Matching is case-insensitive; unknown tokens pass through upper-cased.
pub fn normalize_status(raw: &str) -> OrderStatus {
    let token = raw.trim().to_lowercase();

    if NEW_SYNONYMS.contains(&token.as_str()) {
        OrderStatus::New
    } else if PREPARING_SYNONYMS.contains(&token.as_str()) {
        OrderStatus::Preparing
    } else if READY_SYNONYMS.contains(&token.as_str()) {
        OrderStatus::Ready
    } else {
        OrderStatus::Unrecognized(token.to_uppercase())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusAction {
    #[schema(value_type = String, example = "PREPARING")]
    pub next_status: OrderStatus,
    pub label: &'static str,
}

/// The single forward move allowed from `status`, if any.
pub fn available_action(status: &OrderStatus) -> Option<StatusAction> {
    match status {
        OrderStatus::New => Some(StatusAction {
            next_status: OrderStatus::Preparing,
            label: "Start Cooking",
        }),
        OrderStatus::Preparing => Some(StatusAction {
            next_status: OrderStatus::Ready,
            label: "Mark Ready",
        }),
        OrderStatus::Ready | OrderStatus::Unrecognized(_) => None,
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KitchenTicket {
    #[serde(flatten)]
    pub order: Order,
    pub action: Option<StatusAction>,
    pub caption: Option<&'static str>,
}

impl From<&Order> for KitchenTicket {
    fn from(order: &Order) -> Self {
        Self {
            action: available_action(&order.status),
            caption: (order.status == OrderStatus::Ready).then_some(AWAITING_PICKUP),
            order: order.clone(),
        }
    }
}

/// Latest snapshot of kitchen orders as confirmed by the order collaborator.
///
/// The board never updates a status on its own: a transition only shows up
/// once the collaborator has accepted it and returned the fresh order.
#[derive(Debug, Default)]
pub struct KitchenBoard {
    orders: Vec<Order>,
}

impl KitchenBoard {
    pub fn new(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn status_of(&self, order_id: &str) -> Option<&OrderStatus> {
        self.orders
            .iter()
            .find(|order| order.id == order_id)
            .map(|order| &order.status)
    }

    pub fn tickets(&self) -> Vec<KitchenTicket> {
        self.orders.iter().map(KitchenTicket::from).collect()
    }

    pub async fn refresh<A>(&mut self, api: &A, session: &Session) -> Result<(), AppError>
    where
        A: OrderApi + ?Sized,
    {
        self.orders = api.list_kitchen_orders(session).await?;
        Ok(())
    }

    pub async fn apply_transition<A>(
        &mut self,
        api: &A,
        session: &Session,
        order_id: &str,
        next_status: OrderStatus,
    ) -> Result<&Order, AppError>
    where
        A: OrderApi + ?Sized,
    {
        let position = self
            .orders
            .iter()
            .position(|order| order.id == order_id)
            .ok_or_else(|| AppError::NotFound(format!("Order {}", order_id)))?;

        let current = &self.orders[position].status;
        let allowed = available_action(current).is_some_and(|a| a.next_status == next_status);
        if !allowed {
            return Err(AppError::Validation(format!(
                "Order {} cannot move from {} to {}",
                order_id, current, next_status
            )));
        }

        match api.set_order_status(session, order_id, &next_status).await {
            Ok(updated) => {
                match updated {
                    Some(order) => self.orders[position] = order,
                    // Accepted, but only the status is known to have changed.
                    None => self.orders[position].status = next_status,
                }
                info!(
                    "Order #{} moved to {} by {}",
                    order_id, self.orders[position].status, session.display_name
                );
                Ok(&self.orders[position])
            }
            Err(err) => {
                warn!("Order #{} could not move to {}: {}", order_id, next_status, err);
                Err(match err {
                    AppError::Transition(_) => err,
                    other => AppError::Transition(other.to_string()),
                })
            }
        }
    }
}
