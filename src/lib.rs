//! Client core for a recipe sharing service.
//!
//! Holds the locally persisted shopping cart and session, a typed client for
//! the remote API, and a query layer that caches reads, deduplicates
//! concurrent requests and invalidates cached data after writes.

pub mod api;
pub mod cart;
pub mod config;
pub mod models;
pub mod query;
pub mod service;
pub mod session;
pub mod storage;
