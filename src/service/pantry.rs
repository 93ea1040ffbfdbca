use super::{keys, Service};
use crate::api::ApiError;
use crate::models::{PantryDraft, PantryItem};

impl Service {
    pub async fn pantry(&self) -> Result<Vec<PantryItem>, ApiError> {
        self.require_user_id()?;
        let api = self.api.clone();
        self.queries
            .query(keys::pantry(), move || async move { api.list_pantry().await })
            .await
    }

    pub async fn add_pantry_item(&self, draft: &PantryDraft) -> Result<PantryItem, ApiError> {
        self.require_user_id()?;
        let item = self
            .queries
            .mutate(|| self.api.create_pantry_item(draft), &[keys::pantry()])
            .await?;
        tracing::info!("Added {} to the pantry", item.name);
        Ok(item)
    }

    pub async fn update_pantry_item(
        &self,
        id: &str,
        draft: &PantryDraft,
    ) -> Result<PantryItem, ApiError> {
        self.require_user_id()?;
        self.queries
            .mutate(|| self.api.update_pantry_item(id, draft), &[keys::pantry()])
            .await
    }

    pub async fn remove_pantry_item(&self, id: &str) -> Result<(), ApiError> {
        self.require_user_id()?;
        self.queries
            .mutate(|| self.api.delete_pantry_item(id), &[keys::pantry()])
            .await
    }
}
