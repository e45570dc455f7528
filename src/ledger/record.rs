use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

use super::item::{LineItem, UnitKind, NO_SUBCATEGORY};

/// One record of the persisted budget format.
///
/// This is the strict schema applied at the load boundary: every field the
/// model cannot derive is required, while `subcategory` and `total_cost`
/// are explicitly optional. Conversion into a [`LineItem`] backfills a
/// missing total and trusts a declared one as-is: load fills gaps, it
/// never corrects drift.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemRecord {
    pub room: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    pub product: String,
    pub unit_type: UnitKind,
    pub quantity: f64,
    pub unit_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
}

impl ItemRecord {
    /// Validates the record and produces the fully-populated entry.
    pub fn into_item(self) -> Result<LineItem> {
        if self.room.trim().is_empty() {
            return Err(LedgerError::MalformedInput("empty room name".into()));
        }
        if self.category.trim().is_empty() {
            return Err(LedgerError::MalformedInput("empty category name".into()));
        }
        if self.product.trim().is_empty() {
            return Err(LedgerError::MalformedInput("empty product name".into()));
        }
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err(LedgerError::MalformedInput(format!(
                "quantity must be a positive number, got {}",
                self.quantity
            )));
        }
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err(LedgerError::MalformedInput(format!(
                "unit price must be a non-negative number, got {}",
                self.unit_price
            )));
        }

        let subcategory = match self.subcategory {
            Some(value) if !value.trim().is_empty() => value,
            _ => NO_SUBCATEGORY.to_string(),
        };
        let total_cost = match self.total_cost {
            Some(declared) => declared,
            None => self.unit_price * self.quantity,
        };

        Ok(LineItem {
            room: self.room,
            category: self.category,
            subcategory,
            product: self.product,
            unit_type: self.unit_type,
            quantity: self.quantity,
            unit_price: self.unit_price,
            total_cost,
        })
    }
}

impl From<LineItem> for ItemRecord {
    fn from(item: LineItem) -> Self {
        Self {
            room: item.room,
            category: item.category,
            subcategory: Some(item.subcategory),
            product: item.product,
            unit_type: item.unit_type,
            quantity: item.quantity,
            unit_price: item.unit_price,
            total_cost: Some(item.total_cost),
        }
    }
}
