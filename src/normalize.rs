//! Adapters from loosely shaped backend JSON to the canonical models.
//!
//! The restaurant backend is inconsistent: ids arrive as `id` or `_id`,
//! numbers or strings; prices are sometimes strings or missing; lists come
//! bare or wrapped in `{ data }`, `{ items }`, `{ orders }`. Everything that
//! crosses the collaborator boundary goes through here exactly once.

use serde_json::Value;
use tracing::warn;

use crate::{
    kitchen::{OrderStatus, normalize_status},
    models::{CartLine, Category, MenuItem, Order, Table},
};

/// Envelope keys tried, in order, when a list arrives wrapped in an object.
pub const LIST_ENVELOPES: &[&str] = &["data", "items", "orders", "tables", "dishes", "categories"];

fn first<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .find(|v| !v.is_null())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads the first usable string (or number, stringified) among `keys`.
pub fn text_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .find_map(scalar_to_string)
}

/// `id` first, then Mongo-style `_id`.
pub fn extract_id(value: &Value) -> Option<String> {
    text_field(value, &["id", "_id"])
}

/// A reference field may hold a bare id or an embedded object carrying one.
fn reference_id(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .find_map(|v| match v {
            Value::Object(_) => extract_id(v),
            other => scalar_to_string(other),
        })
}

/// Numbers pass through, numeric strings are parsed, everything else is 0.
/// Negative and non-finite values also collapse to 0.
pub fn coerce_price(value: Option<&Value>) -> f64 {
    let price = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    price.filter(|p| p.is_finite() && *p >= 0.0).unwrap_or(0.0)
}

fn coerce_count(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// `qty`, then `quantity`, else 1. Never below 1.
pub fn coerce_quantity(value: &Value) -> u32 {
    first(value, &["qty", "quantity"])
        .and_then(coerce_count)
        .map(|n| n.floor().clamp(1.0, u32::MAX as f64) as u32)
        .unwrap_or(1)
}

/// Accepts a bare array or an object wrapping one under any of `keys`.
/// A `data` object is searched one level further.
pub fn unwrap_list(value: Value, keys: &[&str]) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            for key in keys {
                match map.remove(*key) {
                    Some(Value::Array(items)) => return items,
                    Some(nested @ Value::Object(_)) if *key == "data" => {
                        return unwrap_list(nested, keys);
                    }
                    _ => {}
                }
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

/// Single-entity responses may be wrapped under `data` or a named key.
pub fn unwrap_object(value: Value, keys: &[&str]) -> Value {
    if let Value::Object(map) = &value {
        for key in keys {
            if let Some(inner @ Value::Object(_)) = map.get(*key) {
                return inner.clone();
            }
        }
    }
    value
}

/// Picks the backend's human readable failure reason, if it sent one.
pub fn error_message(value: &Value) -> Option<String> {
    text_field(value, &["message", "error"])
        .or_else(|| value.get("data").and_then(error_message))
        .or_else(|| value.get("error").and_then(error_message))
}

fn collect<T>(values: Vec<Value>, kind: &str, adapt: impl Fn(&Value) -> Option<T>) -> Vec<T> {
    values
        .iter()
        .filter_map(|value| {
            let adapted = adapt(value);
            if adapted.is_none() {
                warn!("Skipping {} without an id: {}", kind, value);
            }
            adapted
        })
        .collect()
}

pub fn menu_item(value: &Value) -> Option<MenuItem> {
    Some(MenuItem {
        id: extract_id(value)?,
        name: text_field(value, &["name", "title"]).unwrap_or_default(),
        price: coerce_price(value.get("price")),
        category_id: reference_id(value, &["categoryId", "category_id", "category"])
            .unwrap_or_default(),
        description: text_field(value, &["description", "desc"]),
    })
}

pub fn menu_items(value: Value) -> Vec<MenuItem> {
    collect(unwrap_list(value, LIST_ENVELOPES), "menu item", menu_item)
}

pub fn category(value: &Value) -> Option<Category> {
    Some(Category {
        id: extract_id(value)?,
        name: text_field(value, &["name", "category", "title"]).unwrap_or_default(),
    })
}

pub fn categories(value: Value) -> Vec<Category> {
    collect(unwrap_list(value, LIST_ENVELOPES), "category", category)
}

pub fn table(value: &Value) -> Option<Table> {
    let id = extract_id(value)?;
    let booked = match first(value, &["booked", "isBooked"]) {
        Some(Value::Bool(booked)) => *booked,
        _ => text_field(value, &["status"])
            .is_some_and(|status| status.eq_ignore_ascii_case("booked")),
    };
    let members = first(value, &["members", "guests"])
        .and_then(coerce_count)
        .map(|n| n.floor().clamp(0.0, u32::MAX as f64) as u32)
        .unwrap_or(0);

    Some(Table {
        name: text_field(value, &["name", "tableNo", "number"])
            .unwrap_or_else(|| format!("Table {}", id)),
        id,
        booked,
        booked_by: text_field(value, &["bookedBy", "customerName"]),
        members,
    })
}

pub fn tables(value: Value) -> Vec<Table> {
    collect(unwrap_list(value, LIST_ENVELOPES), "table", table)
}

pub fn cart_line(value: &Value) -> Option<CartLine> {
    let name = text_field(value, &["name", "title"]);
    let item_id = reference_id(value, &["itemId", "dishId", "menuItem", "dish"])
        .or_else(|| extract_id(value))
        .or_else(|| name.clone())?;

    Some(CartLine {
        name: name.unwrap_or_else(|| item_id.clone()),
        item_id,
        unit_price: coerce_price(first(value, &["unitPrice", "price"])),
        quantity: coerce_quantity(value),
    })
}

/// The order's status, if the backend sent a non-blank one.
pub fn order_status(value: &Value) -> Option<OrderStatus> {
    text_field(value, &["status"])
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| normalize_status(&raw))
}

pub fn order(value: &Value) -> Option<Order> {
    let lines: Vec<CartLine> = first(value, &["lines", "items"])
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(cart_line).collect())
        .unwrap_or_default();

    let total_amount = match first(value, &["totalAmount", "total_amount", "total"]) {
        Some(total) => coerce_price(Some(total)),
        None => lines
            .iter()
            .map(|line| line.unit_price * line.quantity as f64)
            .sum(),
    };

    // Orders only leave NEW through an explicit kitchen update.
    let status = order_status(value).unwrap_or(OrderStatus::New);

    Some(Order {
        id: extract_id(value)?,
        table_id: reference_id(value, &["tableId", "table_id", "tableNo", "table"])
            .unwrap_or_default(),
        lines,
        total_amount,
        status,
    })
}

pub fn orders(value: Value) -> Vec<Order> {
    collect(unwrap_list(value, LIST_ENVELOPES), "order", order)
}
