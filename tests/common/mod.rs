#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use restaurant_orderservice::{
    api::{MenuApi, OrderApi, TableApi},
    app_error::AppError,
    app_state::AppState,
    kitchen::{OrderStatus, normalize_status},
    menu::{NewCategory, NewMenuItem},
    models::{CartLine, Category, MenuItem, Order, OrderPayload, Table},
    routes,
    session::Session,
    tables::{Booking, NewTable},
};
use serde_json::Value;
use tower::ServiceExt;

/// In-memory stand-in for the restaurant backend.
#[derive(Default)]
pub struct FakeBackend {
    pub menu: Mutex<Vec<MenuItem>>,
    pub categories: Mutex<Vec<Category>>,
    pub tables: Mutex<Vec<Table>>,
    pub orders: Mutex<Vec<Order>>,
    pub submitted: Mutex<Vec<OrderPayload>>,
    pub status_calls: Mutex<Vec<(String, OrderStatus)>>,
    pub tokens: Mutex<Vec<Option<String>>>,
    pub reject_orders: Mutex<Option<String>>,
    pub reject_status: Mutex<Option<String>>,
    /// Mutations succeed but answer without a fresh list.
    pub lose_lists: Mutex<bool>,
}

pub fn dish(id: &str, name: &str, price: f64, category_id: &str) -> MenuItem {
    MenuItem {
        id: id.into(),
        name: name.into(),
        price,
        category_id: category_id.into(),
        description: None,
    }
}

pub fn kitchen_order(id: &str, raw_status: &str) -> Order {
    Order {
        id: id.into(),
        table_id: "Table 2".into(),
        lines: vec![CartLine {
            item_id: "9".into(),
            name: "Dal Tadka".into(),
            unit_price: 140.0,
            quantity: 1,
        }],
        total_amount: 140.0,
        status: normalize_status(raw_status),
    }
}

impl FakeBackend {
    /// A small restaurant: two categories, three dishes, two free tables.
    pub fn seeded() -> Arc<Self> {
        let backend = Self::default();
        *backend.menu.lock().unwrap() = vec![
            dish("1", "Paneer Pakoda", 120.0, "starter"),
            dish("2", "Veg Manchurian", 150.0, "starter"),
            dish("9", "Dal Tadka", 140.0, "dal"),
        ];
        *backend.categories.lock().unwrap() = vec![
            Category {
                id: "starter".into(),
                name: "Starters".into(),
            },
            Category {
                id: "dal".into(),
                name: "Dal".into(),
            },
        ];
        *backend.tables.lock().unwrap() = (1..=2)
            .map(|n| Table {
                id: n.to_string(),
                name: format!("Table {}", n),
                booked: false,
                booked_by: None,
                members: 0,
            })
            .collect();
        Arc::new(backend)
    }

    fn listed<T: Clone>(&self, list: &[T]) -> Option<Vec<T>> {
        (!*self.lose_lists.lock().unwrap()).then(|| list.to_vec())
    }

    fn record(&self, session: &Session) {
        self.tokens.lock().unwrap().push(session.token.clone());
    }
}

#[async_trait]
impl MenuApi for FakeBackend {
    async fn list_menu_items(&self, session: &Session) -> Result<Vec<MenuItem>, AppError> {
        self.record(session);
        Ok(self.menu.lock().unwrap().clone())
    }

    async fn list_categories(&self, session: &Session) -> Result<Vec<Category>, AppError> {
        self.record(session);
        Ok(self.categories.lock().unwrap().clone())
    }

    async fn add_menu_item(
        &self,
        session: &Session,
        item: &NewMenuItem,
    ) -> Result<Option<Vec<MenuItem>>, AppError> {
        self.record(session);
        let mut menu = self.menu.lock().unwrap();
        let id = format!("new-{}", menu.len() + 1);
        menu.push(MenuItem {
            id,
            name: item.name.clone(),
            price: item.price,
            category_id: item.category_id.clone(),
            description: Some(item.description.clone()),
        });
        Ok(self.listed(menu.as_slice()))
    }

    async fn remove_menu_item(
        &self,
        session: &Session,
        item_id: &str,
    ) -> Result<Option<Vec<MenuItem>>, AppError> {
        self.record(session);
        let mut menu = self.menu.lock().unwrap();
        menu.retain(|item| item.id != item_id);
        Ok(self.listed(menu.as_slice()))
    }

    async fn add_category(
        &self,
        session: &Session,
        category: &NewCategory,
    ) -> Result<Option<Vec<Category>>, AppError> {
        self.record(session);
        let mut categories = self.categories.lock().unwrap();
        categories.push(Category {
            id: category.name.to_lowercase(),
            name: category.name.clone(),
        });
        Ok(self.listed(categories.as_slice()))
    }

    async fn remove_category(
        &self,
        session: &Session,
        category_id: &str,
    ) -> Result<Option<Vec<Category>>, AppError> {
        self.record(session);
        let mut categories = self.categories.lock().unwrap();
        categories.retain(|category| category.id != category_id);
        Ok(self.listed(categories.as_slice()))
    }
}

#[async_trait]
impl TableApi for FakeBackend {
    async fn list_tables(&self, session: &Session) -> Result<Vec<Table>, AppError> {
        self.record(session);
        Ok(self.tables.lock().unwrap().clone())
    }

    async fn add_table(
        &self,
        session: &Session,
        table: &NewTable,
    ) -> Result<Option<Vec<Table>>, AppError> {
        self.record(session);
        let mut tables = self.tables.lock().unwrap();
        let id = (tables.len() + 1).to_string();
        tables.push(Table {
            id,
            name: table.name.clone(),
            booked: false,
            booked_by: None,
            members: 0,
        });
        Ok(self.listed(tables.as_slice()))
    }

    async fn remove_table(
        &self,
        session: &Session,
        table_id: &str,
    ) -> Result<Option<Vec<Table>>, AppError> {
        self.record(session);
        let mut tables = self.tables.lock().unwrap();
        tables.retain(|table| table.id != table_id);
        Ok(self.listed(tables.as_slice()))
    }

    async fn book_table(
        &self,
        session: &Session,
        table_id: &str,
        booking: &Booking,
    ) -> Result<Option<Vec<Table>>, AppError> {
        self.record(session);
        let mut tables = self.tables.lock().unwrap();
        let table = tables
            .iter_mut()
            .find(|table| table.id == table_id)
            .ok_or_else(|| AppError::Mutation("No such table".into()))?;
        table.booked = true;
        table.booked_by = Some(booking.customer_name.clone());
        table.members = booking.members;
        Ok(self.listed(tables.as_slice()))
    }

    async fn unbook_table(
        &self,
        session: &Session,
        table_id: &str,
    ) -> Result<Option<Vec<Table>>, AppError> {
        self.record(session);
        let mut tables = self.tables.lock().unwrap();
        if let Some(table) = tables.iter_mut().find(|table| table.id == table_id) {
            table.booked = false;
            table.booked_by = None;
            table.members = 0;
        }
        Ok(self.listed(tables.as_slice()))
    }
}

#[async_trait]
impl OrderApi for FakeBackend {
    async fn submit_order(
        &self,
        session: &Session,
        payload: &OrderPayload,
    ) -> Result<Order, AppError> {
        self.record(session);
        self.submitted.lock().unwrap().push(payload.clone());
        if let Some(reason) = self.reject_orders.lock().unwrap().clone() {
            return Err(AppError::Submission(reason));
        }

        let mut orders = self.orders.lock().unwrap();
        let order = Order {
            id: format!("o-{}", orders.len() + 1),
            table_id: payload.table_id.clone(),
            lines: payload.lines.clone(),
            total_amount: payload.total_amount,
            status: OrderStatus::New,
        };
        orders.push(order.clone());
        Ok(order)
    }

    async fn list_kitchen_orders(&self, session: &Session) -> Result<Vec<Order>, AppError> {
        self.record(session);
        Ok(self.orders.lock().unwrap().clone())
    }

    async fn set_order_status(
        &self,
        session: &Session,
        order_id: &str,
        status: &OrderStatus,
    ) -> Result<Option<Order>, AppError> {
        self.record(session);
        self.status_calls
            .lock()
            .unwrap()
            .push((order_id.to_string(), status.clone()));
        if let Some(reason) = self.reject_status.lock().unwrap().clone() {
            return Err(AppError::Transition(reason));
        }

        let mut orders = self.orders.lock().unwrap();
        let order = orders
            .iter_mut()
            .find(|order| order.id == order_id)
            .ok_or_else(|| AppError::Transition("Unknown order".into()))?;
        order.status = status.clone();
        Ok(Some(order.clone()))
    }
}

pub fn app(backend: Arc<FakeBackend>) -> Router {
    routes::app(AppState::new(backend))
}

/// Sends one request as `role` (with a bearer token derived from `token`)
/// and returns the status and decoded JSON envelope.
pub async fn call(
    app: &Router,
    role: Option<&str>,
    token: &str,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header("x-user-name", token);
    if let Some(role) = role {
        request = request.header("x-user-role", role);
    }

    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
