use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::wire::{lenient_date, record_serde};

/// Something the user already has at home.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct PantryItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub expires_at: Option<NaiveDate>,
}

record_serde!(PantryItem);

impl PantryItem {
    /// True if the item expires before `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expires_at.is_some_and(|date| date < today)
    }
}

impl fmt::Display for PantryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.unit {
            Some(unit) => write!(f, "{} {} {}", self.quantity, unit, self.name)?,
            None => write!(f, "{} {}", self.quantity, self.name)?,
        }
        if let Some(date) = self.expires_at {
            write!(f, " (expires {})", date)?;
        }
        Ok(())
    }
}

/// Fields for creating or updating a pantry item.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PantryDraft {
    pub name: String,
    pub quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<NaiveDate>,
}

impl PantryDraft {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Pantry item name is required".to_string());
        }
        if !(self.quantity > 0.0) {
            return Err("Quantity must be greater than zero".to_string());
        }
        Ok(())
    }
}
