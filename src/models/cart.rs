//! Shopping cart of ingredients selected for purchase.
//!
//! The cart is a purely local list: lines are keyed by ingredient id,
//! keep their insertion order, and never hold a quantity below one.
//! Persistence lives in [`crate::cart::CartStore`]; this type only owns the
//! arithmetic and dedup rules.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Ingredient;

/// One ingredient selected for purchase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLine {
    /// Id of the underlying ingredient
    pub id: String,
    /// Ingredient name at the time it was added
    pub name: String,
    /// Optional category (e.g., "dairy")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Optional unit (e.g., "kg", "bottles")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Always at least 1
    pub quantity: u32,
}

impl CartLine {
    /// Create a line for an ingredient with quantity 1.
    pub fn from_ingredient(ingredient: &Ingredient) -> Self {
        Self {
            id: ingredient.id.clone(),
            name: ingredient.name.clone(),
            category: ingredient.category.clone(),
            unit: ingredient.unit.clone(),
            quantity: 1,
        }
    }
}

impl fmt::Display for CartLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.unit {
            Some(unit) => write!(f, "{} x {} ({})", self.quantity, self.name, unit),
            None => write!(f, "{} x {}", self.quantity, self.name),
        }
    }
}

/// Ordered collection of cart lines, unique by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from stored lines.
    ///
    /// Lines with a duplicate id are merged into the first occurrence and
    /// zero quantities are raised to 1, so a hand-edited or older blob still
    /// yields a valid cart.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for mut line in lines {
            line.quantity = line.quantity.max(1);
            match cart.position(&line.id) {
                Some(idx) => {
                    let existing = &mut cart.lines[idx];
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => cart.lines.push(line),
            }
        }
        cart
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Find a line by ingredient id.
    pub fn get(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line quantities.
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Add one unit of an ingredient.
    ///
    /// An existing line is incremented; otherwise a new line is appended
    /// with the ingredient's current name, category and unit.
    pub fn add_item(&mut self, ingredient: &Ingredient) {
        match self.position(&ingredient.id) {
            Some(idx) => {
                let line = &mut self.lines[idx];
                line.quantity = line.quantity.saturating_add(1);
            }
            None => self.lines.push(CartLine::from_ingredient(ingredient)),
        }
    }

    /// Remove a line by id.
    /// Returns true if a line was removed.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let len_before = self.lines.len();
        self.lines.retain(|line| line.id != id);
        self.lines.len() != len_before
    }

    /// Adjust a line's quantity by `delta`, never going below 1.
    ///
    /// Returns the resulting quantity, or `None` if no line has this id.
    pub fn change_quantity(&mut self, id: &str, delta: i64) -> Option<u32> {
        let idx = self.position(id)?;
        let line = &mut self.lines[idx];
        let next = i64::from(line.quantity).saturating_add(delta);
        line.quantity = u32::try_from(next.max(1)).unwrap_or(u32::MAX);
        Some(line.quantity)
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(id: &str, name: &str) -> Ingredient {
        Ingredient::new(id, name)
    }

    #[test]
    fn test_add_item_inserts_with_quantity_one() {
        let mut cart = Cart::new();
        cart.add_item(&ingredient("a", "Milk").with_unit("l").with_category("dairy"));

        assert_eq!(cart.len(), 1);
        let line = cart.get("a").unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.name, "Milk");
        assert_eq!(line.unit.as_deref(), Some("l"));
        assert_eq!(line.category.as_deref(), Some("dairy"));
    }

    #[test]
    fn test_repeated_add_increments_single_line() {
        let mut cart = Cart::new();
        let milk = ingredient("a", "Milk");
        cart.add_item(&milk);
        cart.add_item(&milk);
        cart.add_item(&milk);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("a").unwrap().quantity, 3);
    }

    #[test]
    fn test_add_does_not_resync_descriptive_fields() {
        let mut cart = Cart::new();
        cart.add_item(&ingredient("a", "Milk"));
        cart.add_item(&ingredient("a", "Oat milk").with_unit("carton"));

        let line = cart.get("a").unwrap();
        assert_eq!(line.name, "Milk");
        assert!(line.unit.is_none());
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = Cart::new();
        cart.add_item(&ingredient("b", "Bread"));
        cart.add_item(&ingredient("a", "Apples"));
        cart.add_item(&ingredient("b", "Bread"));

        let ids: Vec<&str> = cart.lines().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_change_quantity_clamps_at_one() {
        let mut cart = Cart::new();
        cart.add_item(&ingredient("a", "Milk"));

        assert_eq!(cart.change_quantity("a", -5), Some(1));
        assert_eq!(cart.get("a").unwrap().quantity, 1);

        assert_eq!(cart.change_quantity("a", 4), Some(5));
        assert_eq!(cart.change_quantity("a", i64::MIN), Some(1));
    }

    #[test]
    fn test_change_quantity_saturates_upward() {
        let mut cart = Cart::new();
        cart.add_item(&ingredient("a", "Milk"));

        assert_eq!(cart.change_quantity("a", i64::MAX), Some(u32::MAX));
        cart.add_item(&ingredient("a", "Milk"));
        assert_eq!(cart.get("a").unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_change_quantity_missing_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&ingredient("a", "Milk"));

        assert_eq!(cart.change_quantity("zzz", 3), None);
        assert_eq!(cart.get("a").unwrap().quantity, 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = Cart::new();
        cart.add_item(&ingredient("a", "Milk"));

        assert!(cart.remove_item("a"));
        assert!(!cart.remove_item("a"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(&ingredient("a", "Milk"));
        cart.add_item(&ingredient("b", "Bread"));

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_quantity(), 0);
    }

    #[test]
    fn test_scenario_add_clamp_remove() {
        let mut cart = Cart::from_lines(vec![CartLine {
            id: "a".to_string(),
            name: "Apples".to_string(),
            category: None,
            unit: None,
            quantity: 2,
        }]);

        cart.add_item(&ingredient("a", "Apples"));
        assert_eq!(cart.get("a").unwrap().quantity, 3);

        cart.change_quantity("a", -10);
        assert_eq!(cart.get("a").unwrap().quantity, 1);

        cart.remove_item("a");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_from_lines_repairs_invalid_state() {
        let line = |id: &str, quantity| CartLine {
            id: id.to_string(),
            name: id.to_uppercase(),
            category: None,
            unit: None,
            quantity,
        };
        let cart = Cart::from_lines(vec![line("a", 0), line("b", 2), line("a", 3)]);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get("a").unwrap().quantity, 4);
        assert_eq!(cart.lines()[1].id, "b");
    }

    #[test]
    fn test_cart_serializes_as_plain_list() {
        let mut cart = Cart::new();
        cart.add_item(&ingredient("a", "Milk").with_unit("l"));

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "id": "a", "name": "Milk", "unit": "l", "quantity": 1 }])
        );
    }

    #[test]
    fn test_cart_line_display() {
        let mut line = CartLine::from_ingredient(&ingredient("a", "Milk").with_unit("l"));
        line.quantity = 2;
        assert_eq!(format!("{}", line), "2 x Milk (l)");

        let plain = CartLine::from_ingredient(&ingredient("b", "Bread"));
        assert_eq!(format!("{}", plain), "1 x Bread");
    }
}
