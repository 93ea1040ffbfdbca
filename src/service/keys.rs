//! Canonical query keys, one namespace per resource.
//!
//! Single records live under `[<resource>, "detail", <id>]` so an id can
//! never collide with a list key such as `["recipes", "favorites"]`.

use crate::query::QueryKey;

const RECIPES: &str = "recipes";
const MEAL_PLANS: &str = "meal-plans";
const PANTRY: &str = "pantry";
const INGREDIENTS: &str = "ingredients";
const SHOPPING_LISTS: &str = "shopping-lists";
const PROFILE: &str = "profile";
const DETAIL: &str = "detail";

fn detail(resource: &str, id: &str) -> QueryKey {
    QueryKey::from([resource, DETAIL]).join(id)
}

pub fn recipes() -> QueryKey {
    QueryKey::from([RECIPES])
}

pub fn recipe(id: &str) -> QueryKey {
    detail(RECIPES, id)
}

pub fn my_recipes(user_id: &str) -> QueryKey {
    QueryKey::from([RECIPES, "my", user_id])
}

pub fn favorite_recipes() -> QueryKey {
    QueryKey::from([RECIPES, "favorites"])
}

pub fn meal_plans() -> QueryKey {
    QueryKey::from([MEAL_PLANS])
}

pub fn meal_plan(id: &str) -> QueryKey {
    detail(MEAL_PLANS, id)
}

pub fn my_meal_plans(user_id: &str) -> QueryKey {
    QueryKey::from([MEAL_PLANS, "my", user_id])
}

pub fn pantry() -> QueryKey {
    QueryKey::from([PANTRY])
}

pub fn ingredients() -> QueryKey {
    QueryKey::from([INGREDIENTS])
}

pub fn ingredient(id: &str) -> QueryKey {
    detail(INGREDIENTS, id)
}

pub fn shopping_lists() -> QueryKey {
    QueryKey::from([SHOPPING_LISTS])
}

pub fn profile() -> QueryKey {
    QueryKey::from([PROFILE])
}
