//! Table desk requests: adding, booking and freeing tables.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{app_error::AppError, models::Table};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct NewTable {
    #[serde(default)]
    pub name: String,
}

impl NewTable {
    pub fn validate(self) -> Result<NewTable, AppError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Table name is required".into()));
        }
        Ok(NewTable {
            name: name.to_string(),
        })
    }
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingReq {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub members: i64,
}

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub customer_name: String,
    pub members: u32,
}

impl BookingReq {
    pub fn validate(self) -> Result<Booking, AppError> {
        let customer_name = self.customer_name.trim();
        if customer_name.is_empty() || self.members < 1 {
            return Err(AppError::Validation(
                "Please select table, customer name and number of members".into(),
            ));
        }
        let members = u32::try_from(self.members)
            .map_err(|_| AppError::Validation("Too many members".into()))?;

        Ok(Booking {
            customer_name: customer_name.to_string(),
            members,
        })
    }
}

/// Only free tables present in the current snapshot can be booked.
pub fn ensure_bookable<'a>(tables: &'a [Table], table_id: &str) -> Result<&'a Table, AppError> {
    if table_id.trim().is_empty() {
        return Err(AppError::Validation(
            "Please select table, customer name and number of members".into(),
        ));
    }

    let table = tables
        .iter()
        .find(|table| table.id == table_id)
        .ok_or_else(|| AppError::NotFound(format!("Table {}", table_id)))?;

    if table.booked {
        return Err(AppError::Validation(format!(
            "{} is already booked",
            table.name
        )));
    }
    Ok(table)
}
