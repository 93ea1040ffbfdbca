use super::{keys, owned, Service};
use crate::api::ApiError;
use crate::models::{MealPlan, MealPlanDraft};

impl Service {
    pub async fn meal_plans(&self) -> Result<Vec<MealPlan>, ApiError> {
        let api = self.api.clone();
        self.queries
            .query(keys::meal_plans(), move || async move {
                api.list_meal_plans().await
            })
            .await
    }

    pub async fn meal_plan(&self, id: &str) -> Result<MealPlan, ApiError> {
        let api = self.api.clone();
        let owned_id = id.to_string();
        self.queries
            .query(keys::meal_plan(id), move || async move {
                api.get_meal_plan(&owned_id).await
            })
            .await
    }

    /// Plans created or cloned by the signed-in user.
    pub async fn my_meal_plans(&self) -> Result<Vec<MealPlan>, ApiError> {
        let user_id = self.require_user_id()?;
        let chain = owned::owned_by::<MealPlan>(&self.api, user_id.clone());
        self.queries
            .query(keys::my_meal_plans(&user_id), move || chain.run())
            .await
    }

    pub async fn create_meal_plan(&self, draft: &MealPlanDraft) -> Result<MealPlan, ApiError> {
        let plan = self
            .queries
            .mutate(|| self.api.create_meal_plan(draft), &[keys::meal_plans()])
            .await?;
        self.seed(keys::meal_plan(&plan.id), &plan);
        tracing::info!("Created meal plan {}", plan.id);
        Ok(plan)
    }

    pub async fn update_meal_plan(
        &self,
        id: &str,
        draft: &MealPlanDraft,
    ) -> Result<MealPlan, ApiError> {
        let plan = self
            .queries
            .mutate(|| self.api.update_meal_plan(id, draft), &[keys::meal_plans()])
            .await?;
        self.seed(keys::meal_plan(&plan.id), &plan);
        Ok(plan)
    }

    /// Copies a plan into the signed-in user's plans.
    ///
    /// Every cached meal plan query is stale afterwards, so the copy shows up
    /// in "my plans" on the next read.
    pub async fn clone_meal_plan(&self, id: &str) -> Result<MealPlan, ApiError> {
        self.require_user_id()?;
        let plan = self
            .queries
            .mutate(|| self.api.clone_meal_plan(id), &[keys::meal_plans()])
            .await?;
        tracing::info!("Cloned meal plan {} into {}", id, plan.id);
        Ok(plan)
    }
}
