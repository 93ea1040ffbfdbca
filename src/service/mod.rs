//! Resource operations built on the API client and the query cache.
//!
//! Reads go through [`QueryClient::query`] under the keys in [`keys`];
//! writes go through [`QueryClient::mutate`] and declare the namespaces they
//! invalidate. Screens hold a [`Service`] and never touch the cache directly.

pub mod keys;

mod ingredients;
mod meal_plans;
mod owned;
mod pantry;
mod recipes;
mod shopping;

use serde::Serialize;
use std::sync::Arc;

use crate::api::{ApiClient, ApiError, LoginRequest, RegisterRequest};
use crate::models::{ProfileUpdate, Session, User};
use crate::query::{QueryClient, QueryKey};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct Service {
    api: ApiClient,
    queries: Arc<QueryClient>,
    session: Arc<SessionStore>,
}

impl Service {
    pub fn new(api: ApiClient, queries: Arc<QueryClient>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            queries,
            session,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn queries(&self) -> &QueryClient {
        &self.queries
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Id of the signed-in user, or `Unauthorized` without any request.
    fn require_user_id(&self) -> Result<String, ApiError> {
        self.session.user_id().ok_or(ApiError::Unauthorized)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let session: Session = self.api.login(&request).await?.into();
        Ok(self.start_session(session))
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, ApiError> {
        let request = RegisterRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let session: Session = self.api.register(&request).await?.into();
        Ok(self.start_session(session))
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.require_user_id()?;
        let user = self
            .queries
            .mutate(|| self.api.update_profile(update), &[keys::profile()])
            .await?;
        self.session.update_user(user.clone());
        Ok(user)
    }

    /// Forgets the session and everything cached for it.
    pub fn logout(&self) {
        self.session.clear();
        self.queries.clear();
        tracing::info!("Signed out");
    }

    /// Caches a record a write returned so the next read skips the request.
    fn seed<T: Serialize>(&self, key: QueryKey, value: &T) {
        if let Err(e) = self.queries.set_query_data(key, value) {
            tracing::warn!("Failed to cache write result: {}", e);
        }
    }

    fn start_session(&self, session: Session) -> User {
        let user = session.user.clone();
        self.session.set(session);
        // Cached reads belong to whoever was signed in before.
        self.queries.clear();
        tracing::info!("Signed in as {}", user.email);
        user
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::DEFAULT_TIMEOUT;
    use crate::query::DEFAULT_STALE_TIME;
    use crate::storage::MemoryStore;
    use crate::test_support::spawn_api;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{post, put};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    /// Builds a service against `router` with an empty session.
    pub(crate) async fn service_for(router: Router) -> Service {
        let url = spawn_api(router).await;
        let session = Arc::new(SessionStore::open(Arc::new(MemoryStore::new())));
        let api = ApiClient::new(&url, DEFAULT_TIMEOUT, session.clone()).unwrap();
        Service::new(api, Arc::new(QueryClient::new(DEFAULT_STALE_TIME)), session)
    }

    pub(crate) fn sign_in(service: &Service, user_id: &str) {
        service.session().set(Session {
            user: User {
                id: user_id.to_string(),
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                avatar: None,
            },
            token: "token-1".to_string(),
        });
    }

    fn auth_router() -> Router {
        Router::new()
            .route(
                "/api/auth/login",
                post(|body: Json<Value>| async move {
                    if body["password"] == "secret" {
                        (
                            StatusCode::OK,
                            Json(json!({ "data": {
                                "user": { "_id": "u1", "name": "Ana", "email": body["email"] },
                                "token": "fresh-token"
                            }})),
                        )
                    } else {
                        (
                            StatusCode::UNAUTHORIZED,
                            Json(json!({ "message": "Invalid credentials" })),
                        )
                    }
                }),
            )
            .route(
                "/api/auth/profile",
                put(|headers: HeaderMap, body: Json<Value>| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    Json(json!({ "id": "u1", "name": body["name"], "email": auth }))
                }),
            )
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        let service = service_for(auth_router()).await;

        let user = service.login(" ana@example.com ", "secret").await.unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(service.session().current().unwrap().token, "fresh-token");
    }

    #[tokio::test]
    async fn test_failed_login_keeps_signed_out() {
        let service = service_for(auth_router()).await;

        let err = service.login("ana@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.display_message(), "Invalid credentials");
        assert!(!service.session().is_signed_in());
    }

    #[tokio::test]
    async fn test_update_profile_sends_token_and_updates_session() {
        let service = service_for(auth_router()).await;
        sign_in(&service, "u1");

        let update = ProfileUpdate {
            name: Some("Ana Maria".to_string()),
            ..Default::default()
        };
        let user = service.update_profile(&update).await.unwrap();

        // The mock echoes the Authorization header into `email`.
        assert_eq!(user.email, "Bearer token-1");
        assert_eq!(service.session().user().unwrap().name, "Ana Maria");
        assert_eq!(service.session().current().unwrap().token, "token-1");
    }

    #[tokio::test]
    async fn test_update_profile_requires_session() {
        let service = service_for(auth_router()).await;
        let update = ProfileUpdate {
            name: Some("x".to_string()),
            ..Default::default()
        };
        assert_eq!(
            service.update_profile(&update).await.unwrap_err(),
            ApiError::Unauthorized
        );
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_cache() {
        let service = service_for(auth_router()).await;
        sign_in(&service, "u1");
        service
            .queries()
            .set_query_data(keys::recipes(), &json!([]))
            .unwrap();

        service.logout();
        assert!(!service.session().is_signed_in());
        assert!(service
            .queries()
            .get_query_data::<Value>(&keys::recipes())
            .is_none());
    }
}
