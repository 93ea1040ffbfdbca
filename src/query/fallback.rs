//! Ordered fallback lookups.
//!
//! A [`FallbackChain`] holds named strategies that are tried one after the
//! other until one succeeds. Strategies are lazy: a later one is only
//! started after every earlier one has failed.

use futures::future::{BoxFuture, FutureExt};
use std::future::Future;

use crate::api::ApiError;

type Strategy<'a, T> = Box<dyn FnOnce() -> BoxFuture<'a, Result<T, ApiError>> + Send + 'a>;

pub struct FallbackChain<'a, T> {
    strategies: Vec<(&'static str, Strategy<'a, T>)>,
}

impl<'a, T: 'a> FallbackChain<'a, T> {
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Appends a strategy.
    pub fn then<F, Fut>(mut self, name: &'static str, strategy: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'a,
    {
        self.strategies
            .push((name, Box::new(move || strategy().boxed())));
        self
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Runs strategies in order and returns the first success.
    ///
    /// If every strategy fails, the last failure is returned.
    pub async fn run(self) -> Result<T, ApiError> {
        let mut last_error = None;

        for (name, strategy) in self.strategies {
            match strategy().await {
                Ok(value) => {
                    tracing::debug!("Lookup succeeded via {}", name);
                    return Ok(value);
                }
                Err(e) => {
                    tracing::debug!("Lookup via {} failed: {}", name, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(ApiError::NoStrategy))
    }
}

impl<'a, T: 'a> Default for FallbackChain<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn api_error(status: u16) -> ApiError {
        ApiError::Api {
            status,
            message: format!("status {}", status),
        }
    }

    #[tokio::test]
    async fn test_first_success_wins_and_later_strategies_not_started() {
        let started = AtomicUsize::new(0);

        let result = FallbackChain::new()
            .then("primary", || async { Ok(1) })
            .then("secondary", || async {
                started.fetch_add(1, Ordering::SeqCst);
                Ok(2)
            })
            .run()
            .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(started.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_falls_through_failures_in_order() {
        let order = std::sync::Mutex::new(Vec::new());

        let result = FallbackChain::new()
            .then("a", || async {
                order.lock().unwrap().push("a");
                Err(api_error(404))
            })
            .then("b", || async {
                order.lock().unwrap().push("b");
                Err(api_error(500))
            })
            .then("c", || async {
                order.lock().unwrap().push("c");
                Ok("found")
            })
            .run()
            .await;

        assert_eq!(result.unwrap(), "found");
        assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_all_failing_returns_last_error() {
        let result: Result<(), _> = FallbackChain::new()
            .then("a", || async { Err(api_error(404)) })
            .then("b", || async { Err(ApiError::Timeout) })
            .run()
            .await;

        assert_eq!(result.unwrap_err(), ApiError::Timeout);
    }

    #[tokio::test]
    async fn test_empty_chain() {
        let chain = FallbackChain::<u32>::new();
        assert!(chain.is_empty());
        assert_eq!(chain.run().await.unwrap_err(), ApiError::NoStrategy);
    }
}
