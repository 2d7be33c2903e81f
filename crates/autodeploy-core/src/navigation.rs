//! Routes of the presentation layer and the navigation signal the API client
//! emits when it forces a logout.

use tokio::sync::mpsc;
use tracing::debug;

use crate::auth::SessionStore;
use crate::models::DeploymentId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Unauthenticated entry view
    Login,
    Register,
    Dashboard,
    NewDeployment,
    DeploymentLogs(DeploymentId),
    Analytics,
    Wizard,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::NewDeployment => "/deployment/new".to_string(),
            Route::DeploymentLogs(id) => format!("/deployment/logs/{}", id),
            Route::Analytics => "/analytics".to_string(),
            Route::Wizard => "/wizard".to_string(),
        }
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }
}

/// Resolve the route to render: protected routes redirect to `Login` while
/// the session is unauthenticated.
pub fn guard(route: Route, session: &SessionStore) -> Route {
    if route.requires_auth() && !session.is_authenticated() {
        debug!(requested = %route.path(), "Redirecting unauthenticated access to login");
        Route::Login
    } else {
        route
    }
}

/// Sending half of the navigation channel. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Navigator {
    tx: mpsc::UnboundedSender<Route>,
}

impl Navigator {
    /// Create a navigator and the receiver the presentation layer drains
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Emit a navigation signal. Ignored if nobody is listening any more.
    pub fn navigate(&self, route: Route) {
        if self.tx.send(route).is_err() {
            debug!("Navigation receiver dropped, signal discarded");
        }
    }
}
