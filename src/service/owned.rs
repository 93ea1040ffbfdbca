//! "Records owned by the current user" lookup.
//!
//! Tried in order: the dedicated `/<resource>/my` endpoint, a server-side
//! `?userId=` filter, then a client-side filter over the public list.
//! Servers that don't know the `userId` parameter answer with the full
//! public list, so both list-based steps keep only the user's records.

use futures::future::{BoxFuture, FutureExt};

use crate::api::{ApiClient, ApiError};
use crate::models::{MealPlan, Owned, Recipe};
use crate::query::FallbackChain;

/// A resource with a "mine" listing and the two list endpoints behind it.
pub(crate) trait OwnedResource: Owned + Sized + Send + 'static {
    fn list_mine(api: &ApiClient) -> BoxFuture<'_, Result<Vec<Self>, ApiError>>;

    fn list_by_owner<'a>(
        api: &'a ApiClient,
        user_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Self>, ApiError>>;

    fn list_public(api: &ApiClient) -> BoxFuture<'_, Result<Vec<Self>, ApiError>>;
}

impl OwnedResource for Recipe {
    fn list_mine(api: &ApiClient) -> BoxFuture<'_, Result<Vec<Self>, ApiError>> {
        api.my_recipes().boxed()
    }

    fn list_by_owner<'a>(
        api: &'a ApiClient,
        user_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Self>, ApiError>> {
        api.recipes_by_owner(user_id).boxed()
    }

    fn list_public(api: &ApiClient) -> BoxFuture<'_, Result<Vec<Self>, ApiError>> {
        api.list_recipes().boxed()
    }
}

impl OwnedResource for MealPlan {
    fn list_mine(api: &ApiClient) -> BoxFuture<'_, Result<Vec<Self>, ApiError>> {
        api.my_meal_plans().boxed()
    }

    fn list_by_owner<'a>(
        api: &'a ApiClient,
        user_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Self>, ApiError>> {
        api.meal_plans_by_owner(user_id).boxed()
    }

    fn list_public(api: &ApiClient) -> BoxFuture<'_, Result<Vec<Self>, ApiError>> {
        api.list_meal_plans().boxed()
    }
}

pub(crate) fn owned_by<T: OwnedResource>(
    api: &ApiClient,
    user_id: String,
) -> FallbackChain<'static, Vec<T>> {
    let (dedicated, filtered, public) = (api.clone(), api.clone(), api.clone());
    let owner = user_id.clone();

    FallbackChain::new()
        .then("dedicated endpoint", move || async move {
            T::list_mine(&dedicated).await
        })
        .then("owner query parameter", move || async move {
            let records = T::list_by_owner(&filtered, &owner).await?;
            Ok::<_, ApiError>(keep_owned(records, &owner))
        })
        .then("client-side filter", move || async move {
            let all = T::list_public(&public).await?;
            Ok::<_, ApiError>(keep_owned(all, &user_id))
        })
}

fn keep_owned<T: Owned>(records: Vec<T>, user_id: &str) -> Vec<T> {
    let total = records.len();
    let mine: Vec<T> = records
        .into_iter()
        .filter(|record| record.is_owned_by(user_id))
        .collect();
    if mine.len() < total {
        tracing::debug!(
            "Dropped {} record(s) not owned by {}",
            total - mine.len(),
            user_id
        );
    }
    mine
}
