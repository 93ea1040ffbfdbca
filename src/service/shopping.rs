use super::{keys, Service};
use crate::api::ApiError;
use crate::cart::CartStore;
use crate::models::{NewShoppingList, ShoppingList};

impl Service {
    /// Sends the cart to the server as a shopping list.
    ///
    /// The cart is cleared only once the server has accepted the list; on
    /// any failure it is left as it was.
    pub async fn checkout(&self, cart: &mut CartStore) -> Result<ShoppingList, ApiError> {
        let body = NewShoppingList::from(cart.cart());
        let list = self
            .queries
            .mutate(
                || self.api.create_shopping_list(&body),
                &[keys::shopping_lists()],
            )
            .await?;

        cart.clear();
        tracing::info!(
            "Checked out {} item(s) as shopping list {}",
            list.items.len(),
            list.id
        );
        Ok(list)
    }
}
