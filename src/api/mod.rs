//! Client for the remote recipebox API.
//!
//! [`ApiClient`] handles transport concerns (base URL, bearer token,
//! timeout, response envelopes). The typed endpoint methods live in
//! `endpoints`, and every failure is normalized into [`ApiError`].

mod client;
mod endpoints;
mod error;

pub use client::{decode_envelope, Anonymous, ApiClient, TokenSource, DEFAULT_TIMEOUT};
pub use endpoints::{recipe_form_fields, LoginRequest, RegisterRequest};
pub use error::{ApiError, GENERIC_MESSAGE, NETWORK_MESSAGE};
