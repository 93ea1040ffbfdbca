use super::{keys, owned, Service};
use crate::api::ApiError;
use crate::models::{Recipe, RecipeDraft};

impl Service {
    pub async fn recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        let api = self.api.clone();
        self.queries
            .query(keys::recipes(), move || async move { api.list_recipes().await })
            .await
    }

    pub async fn recipe(&self, id: &str) -> Result<Recipe, ApiError> {
        let api = self.api.clone();
        let owned_id = id.to_string();
        self.queries
            .query(keys::recipe(id), move || async move {
                api.get_recipe(&owned_id).await
            })
            .await
    }

    /// Recipes authored by the signed-in user.
    pub async fn my_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        let user_id = self.require_user_id()?;
        let chain = owned::owned_by::<Recipe>(&self.api, user_id.clone());
        self.queries
            .query(keys::my_recipes(&user_id), move || chain.run())
            .await
    }

    pub async fn favorite_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        self.require_user_id()?;
        let api = self.api.clone();
        self.queries
            .query(keys::favorite_recipes(), move || async move {
                api.favorite_recipes().await
            })
            .await
    }

    pub async fn create_recipe(&self, draft: &RecipeDraft) -> Result<Recipe, ApiError> {
        let recipe = self
            .queries
            .mutate(|| self.api.create_recipe(draft), &[keys::recipes()])
            .await?;
        self.seed(keys::recipe(&recipe.id), &recipe);
        tracing::info!("Created recipe {}", recipe.id);
        Ok(recipe)
    }

    pub async fn update_recipe(&self, id: &str, draft: &RecipeDraft) -> Result<Recipe, ApiError> {
        let recipe = self
            .queries
            .mutate(|| self.api.update_recipe(id, draft), &[keys::recipes()])
            .await?;
        self.seed(keys::recipe(&recipe.id), &recipe);
        Ok(recipe)
    }

    pub async fn delete_recipe(&self, id: &str) -> Result<(), ApiError> {
        self.queries
            .mutate(|| self.api.delete_recipe(id), &[keys::recipes()])
            .await?;
        tracing::info!("Deleted recipe {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::api::ApiError;
    use crate::models::{Difficulty, RecipeDraft, RecipeIngredient};
    use crate::service::tests::{service_for, sign_in};
    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Backend {
        recipes: Arc<Mutex<Vec<Value>>>,
        list_hits: Arc<AtomicUsize>,
        my_hits: Arc<AtomicUsize>,
    }

    /// How `GET /api/recipes` treats a `userId` query parameter.
    #[derive(Clone, Copy)]
    enum UserParam {
        Honor,
        Reject,
        Ignore,
    }

    fn recipe(id: &str, title: &str, owner: &str) -> Value {
        json!({ "_id": id, "title": title, "userId": owner, "isPublic": true })
    }

    fn router(backend: Backend, my_status: StatusCode, user_param: UserParam) -> Router {
        Router::new()
            .route(
                "/api/recipes",
                get(
                    move |State(b): State<Backend>, Query(params): Query<HashMap<String, String>>| async move {
                        b.list_hits.fetch_add(1, Ordering::SeqCst);
                        let all = b.recipes.lock().unwrap().clone();
                        let filtered: Vec<Value> = match (params.get("userId"), user_param) {
                            (Some(_), UserParam::Reject) => {
                                return (StatusCode::BAD_REQUEST, Json(json!({ "message": "unknown filter" })));
                            }
                            (Some(uid), UserParam::Honor) => {
                                all.into_iter().filter(|r| r["userId"] == **uid).collect()
                            }
                            _ => all,
                        };
                        (StatusCode::OK, Json(json!({ "data": filtered })))
                    },
                )
                .post(|State(b): State<Backend>, Json(body): Json<Value>| async move {
                    let mut recipes = b.recipes.lock().unwrap();
                    let id = format!("r{}", recipes.len() + 1);
                    let created = recipe(&id, body["title"].as_str().unwrap_or_default(), "u1");
                    recipes.push(created.clone());
                    (StatusCode::CREATED, Json(created))
                }),
            )
            .route(
                "/api/recipes/my",
                get(move |State(b): State<Backend>| async move {
                    b.my_hits.fetch_add(1, Ordering::SeqCst);
                    if my_status.is_success() {
                        let mine: Vec<Value> = b
                            .recipes
                            .lock()
                            .unwrap()
                            .iter()
                            .filter(|r| r["userId"] == "u1")
                            .cloned()
                            .collect();
                        (my_status, Json(json!(mine)))
                    } else {
                        (my_status, Json(json!({ "message": "not here" })))
                    }
                }),
            )
            .with_state(backend)
    }

    fn seeded() -> Backend {
        let backend = Backend::default();
        backend.recipes.lock().unwrap().extend([
            recipe("r1", "Soup", "u1"),
            recipe("r2", "Stew", "u2"),
        ]);
        backend
    }

    #[tokio::test]
    async fn test_concurrent_reads_share_one_request() {
        let backend = seeded();
        let service = service_for(router(backend.clone(), StatusCode::OK, UserParam::Honor)).await;

        let (a, b) = tokio::join!(service.recipes(), service.recipes());
        assert_eq!(a.unwrap().len(), 2);
        assert_eq!(b.unwrap().len(), 2);
        assert_eq!(backend.list_hits.load(Ordering::SeqCst), 1);

        // Fresh cache answers without another request.
        service.recipes().await.unwrap();
        assert_eq!(backend.list_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_create_invalidates_list() {
        let backend = seeded();
        let service = service_for(router(backend.clone(), StatusCode::OK, UserParam::Honor)).await;
        sign_in(&service, "u1");

        assert_eq!(service.recipes().await.unwrap().len(), 2);

        let mut draft = RecipeDraft::new("Salad");
        draft.difficulty = Some(Difficulty::Easy);
        draft.ingredients.push(RecipeIngredient::new("lettuce"));
        let created = service.create_recipe(&draft).await.unwrap();
        assert_eq!(created.id, "r3");

        let after = service.recipes().await.unwrap();
        assert_eq!(after.len(), 3);
        assert_eq!(backend.list_hits.load(Ordering::SeqCst), 2);

        // The created record is readable without a request.
        assert_eq!(service.recipe("r3").await.unwrap().title, "Salad");
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_server() {
        let backend = seeded();
        let service = service_for(router(backend.clone(), StatusCode::OK, UserParam::Honor)).await;

        let err = service
            .create_recipe(&RecipeDraft::new("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(backend.recipes.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_my_recipes_uses_dedicated_endpoint() {
        let backend = seeded();
        let service = service_for(router(backend.clone(), StatusCode::OK, UserParam::Honor)).await;
        sign_in(&service, "u1");

        let mine = service.my_recipes().await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "r1");
        assert_eq!(backend.my_hits.load(Ordering::SeqCst), 1);
        assert_eq!(backend.list_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_my_recipes_falls_back_to_owner_param() {
        let backend = seeded();
        let service = service_for(router(backend.clone(), StatusCode::NOT_FOUND, UserParam::Honor)).await;
        sign_in(&service, "u1");

        let mine = service.my_recipes().await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "r1");
        assert_eq!(backend.list_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_my_recipes_filters_when_server_ignores_owner_param() {
        let backend = seeded();
        let service =
            service_for(router(backend.clone(), StatusCode::NOT_FOUND, UserParam::Ignore)).await;
        sign_in(&service, "u1");

        let mine = service.my_recipes().await.unwrap();
        let ids: Vec<_> = mine.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r1"]);
        // The owner-param answer was used; no extra public list request.
        assert_eq!(backend.my_hits.load(Ordering::SeqCst), 1);
        assert_eq!(backend.list_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_my_recipes_falls_back_to_client_filter() {
        let backend = seeded();
        let service =
            service_for(router(backend.clone(), StatusCode::INTERNAL_SERVER_ERROR, UserParam::Reject)).await;
        sign_in(&service, "u2");

        let mine = service.my_recipes().await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "r2");
        // Rejected param lookup plus the unfiltered list.
        assert_eq!(backend.list_hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_my_recipes_without_session() {
        let backend = seeded();
        let service = service_for(router(backend.clone(), StatusCode::OK, UserParam::Honor)).await;

        assert_eq!(
            service.my_recipes().await.unwrap_err(),
            ApiError::Unauthorized
        );
        assert_eq!(backend.my_hits.load(Ordering::SeqCst), 0);
        assert_eq!(backend.list_hits.load(Ordering::SeqCst), 0);
    }
}
