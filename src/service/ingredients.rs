use super::{keys, Service};
use crate::api::ApiError;
use crate::models::Ingredient;

impl Service {
    pub async fn ingredients(&self) -> Result<Vec<Ingredient>, ApiError> {
        let api = self.api.clone();
        self.queries
            .query(keys::ingredients(), move || async move {
                api.list_ingredients().await
            })
            .await
    }

    /// Looks an ingredient up, preferring the cached catalog over a request.
    pub async fn ingredient(&self, id: &str) -> Result<Ingredient, ApiError> {
        if let Some(catalog) = self
            .queries
            .get_query_data::<Vec<Ingredient>>(&keys::ingredients())
        {
            if let Some(found) = catalog.into_iter().find(|i| i.id == id) {
                return Ok(found);
            }
        }

        let api = self.api.clone();
        let owned_id = id.to_string();
        self.queries
            .query(keys::ingredient(id), move || async move {
                api.get_ingredient(&owned_id).await
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::service::tests::service_for;
    use axum::extract::{Path, State};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn router(hits: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route(
                "/api/ingredients",
                get(|State(hits): State<Arc<AtomicUsize>>| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!([
                        { "_id": "i1", "name": "Milk", "category": "dairy", "unit": "l" },
                        { "_id": "i2", "name": "Bread" }
                    ]))
                }),
            )
            .route(
                "/api/ingredients/{id}",
                get(|State(hits): State<Arc<AtomicUsize>>, Path(id): Path<String>| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({ "data": { "_id": id, "name": "Eggs" } }))
                }),
            )
            .with_state(hits)
    }

    #[tokio::test]
    async fn test_ingredient_served_from_catalog() {
        let hits = Arc::new(AtomicUsize::new(0));
        let service = service_for(router(hits.clone())).await;

        assert_eq!(service.ingredients().await.unwrap().len(), 2);
        let milk = service.ingredient("i1").await.unwrap();
        assert_eq!(milk.category.as_deref(), Some("dairy"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_ingredient_fetched() {
        let hits = Arc::new(AtomicUsize::new(0));
        let service = service_for(router(hits.clone())).await;

        let eggs = service.ingredient("i7").await.unwrap();
        assert_eq!(eggs.id, "i7");
        assert_eq!(eggs.name, "Eggs");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
