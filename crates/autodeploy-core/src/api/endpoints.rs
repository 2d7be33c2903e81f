//! Typed bindings for the backend endpoints the views consume.

use reqwest::Url;
use serde::Deserialize;
use tracing::info;

use crate::models::{
    Analytics, AuthResponse, CreatedDeployment, Deployment, DeploymentId, LogEntry, LogsResponse,
    LoginRequest, NewDeployment, Project, RegisterRequest, User,
};
use crate::navigation::Route;

use super::{ApiClient, ApiError, Request};

/// Data behind the dashboard view
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub user: User,
    pub deployments: Vec<Deployment>,
}

/// Join segments into an absolute path, percent-encoding each one so an id
/// containing `/` or `?` stays a single segment.
fn encode_path(segments: &[&str]) -> Result<String, ApiError> {
    let mut url = Url::parse("http://localhost/").map_err(|e| ApiError::InvalidPath(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| ApiError::InvalidPath(segments.join("/")))?
        .clear()
        .extend(segments);
    Ok(url.path().to_string())
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: Option<String>,
}

impl ApiClient {
    // ===== Authentication =====

    /// Log in and establish the session from the returned token and user
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse = self
            .send(Request::post("/auth/login").json(&body)?.public())
            .await?;

        self.session().establish(auth.token, auth.user.clone())?;
        Ok(auth.user)
    }

    /// Create an account. Does not log in; returns the backend's message.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Option<String>, ApiError> {
        let resp: Option<MessageResponse> = self
            .send(Request::post("/auth/register").json(request)?.public())
            .await?;
        info!(email = %request.email, "Account registered");
        Ok(resp.and_then(|r| r.message))
    }

    /// Explicit user-initiated logout
    pub fn logout(&self) {
        self.session().clear();
        self.navigator().navigate(Route::Login);
    }

    // ===== Data Fetching Methods =====

    pub async fn profile(&self) -> Result<User, ApiError> {
        self.get("/user/profile").await
    }

    pub async fn projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get("/projects").await
    }

    pub async fn deployments(&self) -> Result<Vec<Deployment>, ApiError> {
        self.get("/deployments").await
    }

    /// Fetch the profile and deployment list concurrently.
    /// The first failure wins.
    pub async fn dashboard(&self) -> Result<Dashboard, ApiError> {
        let (user, deployments) = futures::try_join!(self.profile(), self.deployments())?;
        Ok(Dashboard { user, deployments })
    }

    pub async fn create_deployment(
        &self,
        deployment: &NewDeployment,
    ) -> Result<CreatedDeployment, ApiError> {
        let created: CreatedDeployment = self.post("/deployments", deployment).await?;
        info!(deployment_id = %created.deployment_id, "Deployment created");
        Ok(created)
    }

    pub async fn deployment_logs(&self, id: &DeploymentId) -> Result<Vec<LogEntry>, ApiError> {
        let path = encode_path(&["deployments", id.as_str(), "logs"])?;
        let resp: Option<LogsResponse> = self.get(&path).await?;
        Ok(resp.map(|r| r.logs).unwrap_or_default())
    }

    pub async fn analytics(&self) -> Result<Analytics, ApiError> {
        self.get("/analytics").await
    }
}
