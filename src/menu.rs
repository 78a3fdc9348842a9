//! Menu editing requests and the waiter's dish picker.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    app_error::AppError,
    models::{Category, MenuItem},
};

const DEFAULT_DESCRIPTION: &str = "New item";

#[derive(Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewMenuItemReq {
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub name: String,
    /// Number or numeric string, as typed into the admin form.
    #[serde(default)]
    #[schema(value_type = Object, example = "120")]
    pub price: Value,
    pub description: Option<String>,
}

/// A validated dish, ready for the menu collaborator.
#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewMenuItem {
    pub category_id: String,
    pub name: String,
    pub price: f64,
    pub description: String,
}

impl NewMenuItemReq {
    pub fn validate(self) -> Result<NewMenuItem, AppError> {
        let category_id = self.category_id.trim();
        let name = self.name.trim();
        if category_id.is_empty() || name.is_empty() {
            return Err(AppError::Validation(
                "Category, name and price are required".into(),
            ));
        }

        let price = match &self.price {
            Value::Number(n) => n.as_f64(),
            Value::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok(),
            Value::Null => {
                return Err(AppError::Validation(
                    "Category, name and price are required".into(),
                ));
            }
            _ => None,
        }
        .filter(|p| p.is_finite() && *p >= 0.0)
        .ok_or_else(|| AppError::Validation("Price must be a non-negative number".into()))?;

        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_DESCRIPTION)
            .to_string();

        Ok(NewMenuItem {
            category_id: category_id.to_string(),
            name: name.to_string(),
            price,
            description,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct NewCategory {
    #[serde(default)]
    pub name: String,
}

impl NewCategory {
    pub fn validate(self) -> Result<NewCategory, AppError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Category name is required".into()));
        }
        Ok(NewCategory {
            name: name.to_string(),
        })
    }
}

/// Dishes in `category_id` (all when `None`) whose name contains `search`,
/// ignoring case.
pub fn filter_items(
    items: &[MenuItem],
    category_id: Option<&str>,
    search: Option<&str>,
) -> Vec<MenuItem> {
    let needle = search.map(|s| s.trim().to_lowercase()).unwrap_or_default();

    items
        .iter()
        .filter(|item| category_id.is_none_or(|category| item.category_id == category))
        .filter(|item| needle.is_empty() || item.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct MenuSection {
    pub category: Category,
    pub items: Vec<MenuItem>,
}

/// Groups dishes under their categories, in category order. Dishes whose
/// category is not listed end up in a trailing "Other" section.
pub fn sections(categories: Vec<Category>, items: Vec<MenuItem>) -> Vec<MenuSection> {
    let mut sections: Vec<MenuSection> = categories
        .into_iter()
        .map(|category| MenuSection {
            category,
            items: Vec::new(),
        })
        .collect();
    let mut other = Vec::new();

    for item in items {
        match sections
            .iter_mut()
            .find(|section| section.category.id == item.category_id)
        {
            Some(section) => section.items.push(item),
            None => other.push(item),
        }
    }

    if !other.is_empty() {
        sections.push(MenuSection {
            category: Category {
                id: String::new(),
                name: "Other".into(),
            },
            items: other,
        });
    }
    sections
}
