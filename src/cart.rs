//! Persisted cart store.
//!
//! Wraps a [`Cart`] and writes the whole cart back to storage after every
//! mutation. Storage failures are logged and otherwise ignored: the
//! in-memory cart stays authoritative for the rest of the session.

use std::sync::Arc;

use crate::models::{Cart, CartLine, Ingredient};
use crate::storage::{load_json, save_json, KeyValueStore, StorageKey};

pub struct CartStore {
    cart: Cart,
    storage: Arc<dyn KeyValueStore>,
}

impl CartStore {
    /// Opens the cart persisted in `storage`.
    ///
    /// A missing entry yields an empty cart, as does an unreadable one
    /// (after logging a warning).
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        let cart = match load_json::<Vec<CartLine>>(storage.as_ref(), StorageKey::Cart) {
            Ok(Some(lines)) => Cart::from_lines(lines),
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!("Starting with an empty cart: {}", e);
                Cart::new()
            }
        };
        tracing::debug!("Opened cart with {} line(s)", cart.len());

        Self { cart, storage }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    pub fn get(&self, id: &str) -> Option<&CartLine> {
        self.cart.get(id)
    }

    pub fn len(&self) -> usize {
        self.cart.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub fn total_quantity(&self) -> u64 {
        self.cart.total_quantity()
    }

    /// Adds one unit of `ingredient`, inserting a new line if needed.
    pub fn add_item(&mut self, ingredient: &Ingredient) {
        self.cart.add_item(ingredient);
        self.persist();
    }

    /// Removes the line for `id`. Missing ids are ignored.
    pub fn remove_item(&mut self, id: &str) {
        if self.cart.remove_item(id) {
            self.persist();
        }
    }

    /// Adds `delta` to the line's quantity, clamped at 1.
    ///
    /// Returns the new quantity, or `None` if no line has this id.
    /// Callers that want a decrement to remove the line at zero must check
    /// and call [`CartStore::remove_item`] themselves.
    pub fn change_quantity(&mut self, id: &str, delta: i64) -> Option<u32> {
        let quantity = self.cart.change_quantity(id, delta)?;
        self.persist();
        Some(quantity)
    }

    pub fn clear(&mut self) {
        self.cart.clear();
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = save_json(self.storage.as_ref(), StorageKey::Cart, &self.cart) {
            tracing::warn!("Cart changes will not survive a restart: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore, StorageError};
    use tempfile::TempDir;

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn load(&self, _key: StorageKey) -> Result<Option<String>, StorageError> {
            Err(StorageError::IoError(
                "/unreadable".into(),
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            ))
        }

        fn save(&self, _key: StorageKey, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::IoError(
                "/unwritable".into(),
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            ))
        }

        fn remove(&self, _key: StorageKey) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn milk() -> Ingredient {
        Ingredient::new("a", "Milk").with_unit("l")
    }

    #[test]
    fn test_open_empty_storage() {
        let store = CartStore::open(Arc::new(MemoryStore::new()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_every_mutation_persists() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = CartStore::open(storage.clone());

        store.add_item(&milk());
        store.add_item(&milk());
        assert_eq!(
            CartStore::open(storage.clone()).get("a").unwrap().quantity,
            2
        );

        store.change_quantity("a", 5);
        assert_eq!(
            CartStore::open(storage.clone()).get("a").unwrap().quantity,
            7
        );

        store.remove_item("a");
        assert!(CartStore::open(storage.clone()).is_empty());

        store.add_item(&milk());
        store.clear();
        assert!(CartStore::open(storage).is_empty());
    }

    #[test]
    fn test_roundtrip_through_files_keeps_order() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Arc::new(FileStore::new(temp_dir.path().to_path_buf()));

        let mut store = CartStore::open(storage.clone());
        store.add_item(&Ingredient::new("c", "Cheese"));
        store.add_item(&milk());
        store.add_item(&Ingredient::new("b", "Bread").with_category("bakery"));
        store.change_quantity("a", 2);

        let reopened = CartStore::open(storage);
        assert_eq!(reopened.cart(), store.cart());
        let ids: Vec<&str> = reopened.lines().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_corrupt_blob_opens_empty() {
        let storage = Arc::new(MemoryStore::new());
        storage.save(StorageKey::Cart, "{ not a cart").unwrap();

        let store = CartStore::open(storage);
        assert!(store.is_empty());
    }

    #[test]
    fn test_storage_failures_are_not_surfaced() {
        let mut store = CartStore::open(Arc::new(FailingStore));
        store.add_item(&milk());
        store.add_item(&milk());

        assert_eq!(store.get("a").unwrap().quantity, 2);
        assert_eq!(store.change_quantity("a", -10), Some(1));
    }

    #[test]
    fn test_missing_ids_are_noops() {
        let mut store = CartStore::open(Arc::new(MemoryStore::new()));
        store.add_item(&milk());

        store.remove_item("zzz");
        store.remove_item("zzz");
        assert_eq!(store.change_quantity("zzz", 1), None);
        assert_eq!(store.len(), 1);
        assert_eq!(store.total_quantity(), 1);
    }
}
