//! REST API client module for the Auto Deploy backend.
//!
//! This module provides the `ApiClient`, the single pipeline every view's
//! network call goes through. It attaches the session's bearer token and
//! turns a rejected token into a forced logout.

pub mod client;
pub mod endpoints;
pub mod error;

pub use client::{Access, ApiClient, Request};
pub use endpoints::Dashboard;
pub use error::ApiError;
