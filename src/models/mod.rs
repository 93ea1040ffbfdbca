mod cart;
mod ingredient;
mod meal_plan;
mod meal_type;
mod pantry;
mod recipe;
mod shopping_list;
mod user;
mod wire;

pub use cart::{Cart, CartLine};
pub use ingredient::{Ingredient, RecipeIngredient};
pub use meal_plan::{MealPlan, MealPlanDay, MealPlanDraft, PlannedMeal};
pub use meal_type::MealType;
pub use pantry::{PantryDraft, PantryItem};
pub use recipe::{Difficulty, Recipe, RecipeDraft};
pub use shopping_list::{NewShoppingList, ShoppingList, ShoppingListItem};
pub use user::{AuthResponse, Author, ProfileUpdate, Session, User};

/// Records that carry ownership fields.
///
/// Used to filter a public collection down to the current user's records
/// when the server cannot do it.
pub trait Owned {
    /// Every id the record names as its owner.
    fn owner_ids(&self) -> Vec<&str>;

    fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_ids().contains(&user_id)
    }
}
