use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

/// Placeholder stored for entries created without a real subcategory.
///
/// The ledger never stores an empty subcategory; absence is normalized to
/// this literal so display and grouping code can treat the field as always
/// populated.
pub const NO_SUBCATEGORY: &str = "No subcategory";

/// Measurement unit attached to a budgeted product.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Length,
    Count,
    Piece,
    Weight,
}

impl UnitKind {
    pub const ALL: [UnitKind; 4] = [
        UnitKind::Length,
        UnitKind::Count,
        UnitKind::Piece,
        UnitKind::Weight,
    ];

    /// User-facing label including the measurement hint.
    pub fn label(&self) -> &'static str {
        match self {
            UnitKind::Length => "Meters (m)",
            UnitKind::Count => "Count (u)",
            UnitKind::Piece => "Piece (pc)",
            UnitKind::Weight => "Weight (kg)",
        }
    }

    /// Canonical token used in the persisted format.
    pub fn token(&self) -> &'static str {
        match self {
            UnitKind::Length => "length",
            UnitKind::Count => "count",
            UnitKind::Piece => "piece",
            UnitKind::Weight => "weight",
        }
    }

    /// Parses a canonical token or a common alias (`m`, `u`, `pc`, `kg`).
    pub fn parse(value: &str) -> Option<UnitKind> {
        match value.trim().to_lowercase().as_str() {
            "length" | "m" | "meters" | "metres" => Some(UnitKind::Length),
            "count" | "u" | "units" => Some(UnitKind::Count),
            "piece" | "pc" | "pieces" => Some(UnitKind::Piece),
            "weight" | "kg" | "kilos" => Some(UnitKind::Weight),
            _ => None,
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One budgeted product entry with its derived total.
///
/// `total_cost` always equals `unit_price * quantity` for entries created
/// through [`ItemDraft`]; loaded records may carry a trusted historical
/// value instead (see the record boundary).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub room: String,
    pub category: String,
    pub subcategory: String,
    pub product: String,
    pub unit_type: UnitKind,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_cost: f64,
}

impl LineItem {
    /// Builds the fully-populated entry from a validated draft, computing
    /// the derived total and normalizing an absent subcategory.
    pub fn from_draft(draft: ItemDraft) -> Self {
        let subcategory = match draft.subcategory {
            Some(value) if !value.trim().is_empty() => value,
            _ => NO_SUBCATEGORY.to_string(),
        };
        let total_cost = draft.unit_price * draft.quantity;
        Self {
            room: draft.room,
            category: draft.category,
            subcategory,
            product: draft.product,
            unit_type: draft.unit_type,
            quantity: draft.quantity,
            unit_price: draft.unit_price,
            total_cost,
        }
    }

    /// True when the entry carries the placeholder instead of a real
    /// subcategory.
    pub fn has_placeholder_subcategory(&self) -> bool {
        self.subcategory == NO_SUBCATEGORY
    }
}

/// Caller-facing input for a new entry. Quantity defaults to 1; the
/// subcategory is genuinely optional.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub room: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub product: String,
    pub unit_type: UnitKind,
    pub quantity: f64,
    pub unit_price: f64,
}

impl ItemDraft {
    pub fn new(
        room: impl Into<String>,
        category: impl Into<String>,
        product: impl Into<String>,
        unit_type: UnitKind,
        unit_price: f64,
    ) -> Self {
        Self {
            room: room.into(),
            category: category.into(),
            subcategory: None,
            product: product.into(),
            unit_type,
            quantity: 1.0,
            unit_price,
        }
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }

    /// True when the draft names a non-blank subcategory.
    pub fn has_subcategory(&self) -> bool {
        self.subcategory
            .as_deref()
            .map(|value| !value.trim().is_empty())
            .unwrap_or(false)
    }

    /// Checks the entry contract: non-empty identity fields, a finite
    /// positive quantity, and a finite non-negative unit price.
    pub fn validate(&self) -> Result<()> {
        if self.room.trim().is_empty() {
            return Err(LedgerError::Validation("room must not be empty".into()));
        }
        if self.category.trim().is_empty() {
            return Err(LedgerError::Validation("category must not be empty".into()));
        }
        if self.product.trim().is_empty() {
            return Err(LedgerError::Validation("product must not be empty".into()));
        }
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err(LedgerError::Validation(format!(
                "quantity must be a positive number, got {}",
                self.quantity
            )));
        }
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err(LedgerError::Validation(format!(
                "unit price must be a non-negative number, got {}",
                self.unit_price
            )));
        }
        Ok(())
    }
}
