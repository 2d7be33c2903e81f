//! Core library for the Auto Deploy client.
//!
//! The session store and the authenticated request pipeline live here,
//! together with typed endpoint bindings, routes, form validation and
//! configuration. Front ends only render state and forward input.
//!
//! ```no_run
//! use std::sync::Arc;
//! use autodeploy_core::{ApiClient, Config, FileStore, Navigator, SessionStore};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let store = Arc::new(FileStore::in_dir(&config.data_dir()?));
//! let session = Arc::new(SessionStore::open(store));
//! let (navigator, _routes) = Navigator::channel();
//! let api = ApiClient::new(&config, session, navigator)?;
//! api.login("a@x.com", "secret").await?;
//! let dashboard = api.dashboard().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod forms;
pub mod models;
pub mod navigation;
pub mod storage;
pub mod utils;
pub mod wizard;

pub use api::{Access, ApiClient, ApiError, Dashboard, Request};
pub use auth::{CredentialStore, SessionData, SessionError, SessionStore};
pub use config::Config;
pub use navigation::{guard, Navigator, Route};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
