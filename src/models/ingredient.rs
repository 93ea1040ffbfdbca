use serde::{Deserialize, Serialize};
use std::fmt;

use super::wire::record_serde;

/// An ingredient from the shared ingredient catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

record_serde!(Ingredient);

impl Ingredient {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: None,
            unit: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(category) = &self.category {
            write!(f, " [{}]", category)?;
        }
        Ok(())
    }
}

/// An ingredient as used by a recipe, with an optional amount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient {
    /// Catalog id, when the ingredient was picked from the catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient_id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl RecipeIngredient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            ingredient_id: None,
            name: name.into(),
            quantity: None,
            unit: None,
        }
    }

    pub fn with_amount(mut self, quantity: f64, unit: impl Into<String>) -> Self {
        let unit = unit.into();
        self.quantity = Some(quantity);
        self.unit = if unit.is_empty() { None } else { Some(unit) };
        self
    }
}

impl fmt::Display for RecipeIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.quantity, &self.unit) {
            (Some(qty), Some(unit)) => write!(f, "{} {} {}", qty, unit, self.name),
            (Some(qty), None) => write!(f, "{} {}", qty, self.name),
            (None, _) => write!(f, "{}", self.name),
        }
    }
}
