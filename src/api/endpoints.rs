//! Typed wrappers for the resource endpoints.

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Serialize;
use std::path::Path;

use super::client::{segment, ApiClient};
use super::error::ApiError;
use crate::models::{
    AuthResponse, Ingredient, MealPlan, MealPlanDraft, NewShoppingList, PantryDraft, PantryItem,
    ProfileUpdate, Recipe, RecipeDraft, ShoppingList, User,
};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require(&self.email, "Email is required")?;
        require(&self.password, "Password is required")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require(&self.name, "Name is required")?;
        require(&self.email, "Email is required")?;
        require(&self.password, "Password is required")
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct CloneRequest<'a> {
    meal_plan_id: &'a str,
}

fn require(value: &str, message: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::Validation(message.to_string()))
    } else {
        Ok(())
    }
}

impl ApiClient {
    // Recipes

    pub async fn list_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        self.get("/recipes").await
    }

    pub async fn get_recipe(&self, id: &str) -> Result<Recipe, ApiError> {
        self.get(&format!("/recipes/{}", segment(id))).await
    }

    pub async fn my_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        self.get("/recipes/my").await
    }

    /// Asks the server to filter by owner. Servers that ignore the
    /// parameter return every public recipe.
    pub async fn recipes_by_owner(&self, user_id: &str) -> Result<Vec<Recipe>, ApiError> {
        self.get_with_query("/recipes", &[("userId", user_id)])
            .await
    }

    pub async fn favorite_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        self.get("/recipes/favorites/all").await
    }

    /// Creates a recipe, uploading the image as multipart when one is set.
    pub async fn create_recipe(&self, draft: &RecipeDraft) -> Result<Recipe, ApiError> {
        self.write_recipe(Method::POST, "/recipes".to_string(), draft)
            .await
    }

    pub async fn update_recipe(&self, id: &str, draft: &RecipeDraft) -> Result<Recipe, ApiError> {
        self.write_recipe(Method::PUT, format!("/recipes/{}", segment(id)), draft)
            .await
    }

    pub async fn delete_recipe(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/recipes/{}", segment(id))).await
    }

    async fn write_recipe(
        &self,
        method: Method,
        path: String,
        draft: &RecipeDraft,
    ) -> Result<Recipe, ApiError> {
        draft.validate().map_err(ApiError::Validation)?;

        let builder = self.request(method, &path);
        let builder = match &draft.image {
            Some(image) => builder.multipart(recipe_form(draft, image).await?),
            None => builder.json(draft),
        };
        self.send(builder).await
    }

    // Meal plans

    pub async fn list_meal_plans(&self) -> Result<Vec<MealPlan>, ApiError> {
        self.get("/meal-plans").await
    }

    pub async fn get_meal_plan(&self, id: &str) -> Result<MealPlan, ApiError> {
        self.get(&format!("/meal-plans/{}", segment(id))).await
    }

    pub async fn my_meal_plans(&self) -> Result<Vec<MealPlan>, ApiError> {
        self.get("/meal-plans/my").await
    }

    pub async fn meal_plans_by_owner(&self, user_id: &str) -> Result<Vec<MealPlan>, ApiError> {
        self.get_with_query("/meal-plans", &[("userId", user_id)])
            .await
    }

    pub async fn create_meal_plan(&self, draft: &MealPlanDraft) -> Result<MealPlan, ApiError> {
        draft.validate().map_err(ApiError::Validation)?;
        self.post("/meal-plans", draft).await
    }

    pub async fn update_meal_plan(
        &self,
        id: &str,
        draft: &MealPlanDraft,
    ) -> Result<MealPlan, ApiError> {
        draft.validate().map_err(ApiError::Validation)?;
        self.put(&format!("/meal-plans/{}", segment(id)), draft)
            .await
    }

    /// Copies a (usually public) plan into the current user's plans.
    pub async fn clone_meal_plan(&self, id: &str) -> Result<MealPlan, ApiError> {
        self.post("/meal-plans/clone", &CloneRequest { meal_plan_id: id })
            .await
    }

    // Pantry

    pub async fn list_pantry(&self) -> Result<Vec<PantryItem>, ApiError> {
        self.get("/pantry").await
    }

    pub async fn create_pantry_item(&self, draft: &PantryDraft) -> Result<PantryItem, ApiError> {
        draft.validate().map_err(ApiError::Validation)?;
        self.post("/pantry", draft).await
    }

    pub async fn update_pantry_item(
        &self,
        id: &str,
        draft: &PantryDraft,
    ) -> Result<PantryItem, ApiError> {
        draft.validate().map_err(ApiError::Validation)?;
        self.put(&format!("/pantry/{}", segment(id)), draft).await
    }

    pub async fn delete_pantry_item(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/pantry/{}", segment(id))).await
    }

    // Ingredients

    pub async fn list_ingredients(&self) -> Result<Vec<Ingredient>, ApiError> {
        self.get("/ingredients").await
    }

    pub async fn get_ingredient(&self, id: &str) -> Result<Ingredient, ApiError> {
        self.get(&format!("/ingredients/{}", segment(id))).await
    }

    // Shopping lists

    pub async fn create_shopping_list(
        &self,
        list: &NewShoppingList,
    ) -> Result<ShoppingList, ApiError> {
        if list.items.is_empty() {
            return Err(ApiError::Validation("The cart is empty".to_string()));
        }
        self.post("/shopping-lists", list).await
    }

    // Auth

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        request.validate()?;
        self.post("/auth/login", request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        request.validate()?;
        self.post("/auth/register", request).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        if update.is_empty() {
            return Err(ApiError::Validation("Nothing to update".to_string()));
        }
        self.put("/auth/profile", update).await
    }
}

/// Text fields of the multipart recipe form.
///
/// List fields travel as JSON-encoded strings and booleans as "true"/"false".
/// Every field is always present; unset optional ones are empty strings.
pub fn recipe_form_fields(draft: &RecipeDraft) -> Result<Vec<(&'static str, String)>, ApiError> {
    Ok(vec![
        ("title", draft.title.clone()),
        ("description", draft.description.clone()),
        ("steps", encode(&draft.steps)?),
        ("ingredients", encode(&draft.ingredients)?),
        ("time", draft.time.map(|t| t.to_string()).unwrap_or_default()),
        ("category", draft.category.clone().unwrap_or_default()),
        (
            "difficulty",
            draft.difficulty.map(|d| d.to_string()).unwrap_or_default(),
        ),
        ("isPublic", draft.is_public.to_string()),
        ("tags", encode(&draft.tags)?),
    ])
}

async fn recipe_form(draft: &RecipeDraft, image: &Path) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for (name, value) in recipe_form_fields(draft)? {
        form = form.text(name, value);
    }

    let bytes = tokio::fs::read(image).await.map_err(|e| {
        ApiError::Validation(format!("Cannot read image {}: {}", image.display(), e))
    })?;
    let file_name = image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let part = Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(image_mime(image))?;

    Ok(form.part("image", part))
}

fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::Decode(e.to_string()))
}
