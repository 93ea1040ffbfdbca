use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::{Cart, CartLine};
use super::wire::record_serde;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItem {
    pub ingredient_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub quantity: u32,
}

impl From<&CartLine> for ShoppingListItem {
    fn from(line: &CartLine) -> Self {
        Self {
            ingredient_id: line.id.clone(),
            name: line.name.clone(),
            category: line.category.clone(),
            unit: line.unit.clone(),
            quantity: line.quantity,
        }
    }
}

/// A checked-out cart as stored by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct ShoppingList {
    pub id: String,
    #[serde(default)]
    pub items: Vec<ShoppingListItem>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

record_serde!(ShoppingList);

/// Body of `POST /shopping-lists`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewShoppingList {
    pub items: Vec<ShoppingListItem>,
}

impl From<&Cart> for NewShoppingList {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(ShoppingListItem::from).collect(),
        }
    }
}
