//! Payload types exchanged with the Auto Deploy backend.
//!
//! - `User` and the login/registration payloads
//! - `Project`, `Deployment`, `NewDeployment`, `LogEntry`: deployment views
//! - `Analytics`: the analytics panel summary
//!
//! Field names follow the backend's camelCase JSON. Unknown fields are
//! ignored and optional fields default, so newer backends stay readable.

pub mod analytics;
pub mod deployment;
pub mod user;

pub use analytics::{Analytics, StatusCount};
pub use deployment::{
    CreatedDeployment, Deployment, DeploymentId, Environment, LogEntry, LogsResponse,
    NewDeployment, Project,
};
pub use user::{AuthResponse, LoginRequest, RegisterRequest, User};
