//! Command handlers for the CLI.
//!
//! The `App` owns the configuration, the shared session and the API client.
//! Protected commands are routed through `guard` first, and every API
//! failure except a rejected token is shown inline.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

use autodeploy_core::forms::{filter_logs, DeploymentForm, LoginForm, RegisterForm};
use autodeploy_core::models::{DeploymentId, Environment};
use autodeploy_core::wizard::{Wizard, WizardStep};
use autodeploy_core::{
    guard, ApiClient, ApiError, Config, CredentialStore, FileStore, Navigator, Route,
    SessionStore,
};

use crate::render;

pub struct App {
    config: Config,
    session: Arc<SessionStore>,
    api: ApiClient,
    routes: UnboundedReceiver<Route>,
}

impl App {
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let data_dir = config.data_dir().unwrap_or_else(|_| PathBuf::from("./data"));
        debug!(?data_dir, "Data directory configured");

        let store = Arc::new(FileStore::in_dir(&data_dir));
        let session = Arc::new(SessionStore::open(store));
        let (navigator, routes) = Navigator::channel();
        let api = ApiClient::new(&config, session.clone(), navigator)
            .context("Failed to create API client")?;

        Ok(Self {
            config,
            session,
            api,
            routes,
        })
    }

    pub fn base_url(&self) -> &str {
        self.api.base_url()
    }

    /// Handle navigation signals emitted during the command. A forced logout
    /// is an expected transition, so it gets a hint rather than an error.
    pub fn drain_navigation(&mut self) {
        while let Ok(route) = self.routes.try_recv() {
            debug!(route = %route.path(), "Navigation requested");
            if route == Route::Login && !self.session.is_authenticated() {
                println!("Session expired, please log in again: autodeploy login");
            }
        }
    }

    /// Resolve a protected route; false if the user was sent to login
    fn enter(&self, route: Route) -> bool {
        match guard(route, &self.session) {
            Route::Login => {
                println!("You are not logged in. Run: autodeploy login");
                false
            }
            _ => true,
        }
    }

    /// Inline error for a failed call. Rejected tokens are handled by the
    /// navigation signal instead.
    fn show_failure(err: &ApiError) {
        if err.is_unauthorized() {
            return;
        }
        eprintln!("Error: {}", err.user_message());
        if err.is_retryable() {
            eprintln!("Run the same command again to retry.");
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub async fn login(&mut self, email: Option<String>) -> Result<()> {
        println!("\n=== Auto Deploy Login ===\n");

        let email = match email {
            Some(email) => email,
            None => match self.config.last_email.clone() {
                Some(last) => prompt_with_default("Email", &last)?,
                None => prompt("Email")?,
            },
        };

        let password = if CredentialStore::has_credentials(&email)
            && confirm("Use stored password? [Y/n]: ")?
        {
            CredentialStore::get_password(&email)?
        } else {
            prompt_password()?
        };

        let form = LoginForm { email, password };
        if let Err(e) = form.validate() {
            eprintln!("{}", e);
            return Ok(());
        }

        println!("\nLogging in...");
        match self.api.login(&form.email, &form.password).await {
            Ok(user) => {
                if let Err(e) = CredentialStore::store(&form.email, &form.password) {
                    warn!(error = %e, "Failed to store credentials");
                }
                self.config.last_email = Some(form.email);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }
                println!("Welcome, {}!", user.name);
            }
            Err(e) => Self::show_failure(&e),
        }
        Ok(())
    }

    pub async fn register(&mut self) -> Result<()> {
        println!("\n=== Create an Account ===\n");

        let form = RegisterForm {
            name: prompt("Name")?,
            email: prompt("Email")?,
            password: prompt_password()?,
            confirm_password: rpassword::prompt_password("Confirm password: ")?,
        };

        let request = match form.to_request() {
            Ok(request) => request,
            Err(e) => {
                eprintln!("{}", e);
                return Ok(());
            }
        };

        println!("\nRegistering...");
        match self.api.register(&request).await {
            Ok(message) => {
                println!(
                    "{}",
                    message.unwrap_or_else(|| "Registration successful!".to_string())
                );
                println!("You can now log in: autodeploy login {}", request.email);
            }
            Err(e) => Self::show_failure(&e),
        }
        Ok(())
    }

    pub fn logout(&mut self, forget: bool) -> Result<()> {
        if forget {
            if let Some(ref email) = self.config.last_email {
                if let Err(e) = CredentialStore::delete(email) {
                    warn!(error = %e, "Failed to delete stored password");
                }
            }
        }
        self.api.logout();
        // Explicit logout needs no hint
        while self.routes.try_recv().is_ok() {}
        println!("Logged out.");
        Ok(())
    }

    pub fn whoami(&self) {
        match self.session.current_user() {
            Some(user) => println!("{} <{}>", user.name, user.email),
            None => println!("Not logged in."),
        }
    }

    // =========================================================================
    // Views
    // =========================================================================

    pub async fn dashboard(&mut self) -> Result<()> {
        if !self.enter(Route::Dashboard) {
            return Ok(());
        }
        println!("Loading dashboard...");
        match self.api.dashboard().await {
            Ok(dashboard) => render::dashboard(&dashboard),
            Err(e) => Self::show_failure(&e),
        }
        Ok(())
    }

    pub async fn deploy(&mut self) -> Result<()> {
        if !self.enter(Route::NewDeployment) {
            return Ok(());
        }
        println!("\n=== New Deployment ===\n");

        let mut form = DeploymentForm {
            name: prompt("Name")?,
            description: prompt("Description")?,
            repository_url: prompt("Repository URL")?,
            environment: Environment::default(),
        };
        let choices: Vec<&str> = Environment::ALL.iter().map(|e| e.as_str()).collect();
        let label = format!("Environment ({})", choices.join("/"));
        let env_input = prompt_with_default(&label, Environment::default().as_str())?;
        if let Err(e) = form.set_environment(&env_input) {
            eprintln!("{}", e);
            return Ok(());
        }

        let request = match form.to_request() {
            Ok(request) => request,
            Err(e) => {
                eprintln!("{}", e);
                return Ok(());
            }
        };

        println!("\nSubmitting...");
        match self.api.create_deployment(&request).await {
            Ok(created) => {
                println!("Deployment created successfully!");
                println!(
                    "Follow its logs: autodeploy logs {}",
                    created.deployment_id
                );
            }
            Err(e) => Self::show_failure(&e),
        }
        Ok(())
    }

    pub async fn logs(&mut self, id: &str, filter: Option<&str>) -> Result<()> {
        let id = DeploymentId::new(id);
        if !self.enter(Route::DeploymentLogs(id.clone())) {
            return Ok(());
        }
        match self.api.deployment_logs(&id).await {
            Ok(logs) => {
                let shown = filter_logs(&logs, filter.unwrap_or_default());
                render::logs(&id, &shown, logs.len());
            }
            Err(e) => Self::show_failure(&e),
        }
        Ok(())
    }

    pub async fn analytics(&mut self) -> Result<()> {
        if !self.enter(Route::Analytics) {
            return Ok(());
        }
        println!("Loading analytics...");
        match self.api.analytics().await {
            Ok(analytics) => render::analytics(&analytics),
            Err(e) => Self::show_failure(&e),
        }
        Ok(())
    }

    pub fn wizard(&mut self) -> Result<()> {
        if !self.enter(Route::Wizard) {
            return Ok(());
        }
        let mut wizard = Wizard::new();

        loop {
            render::wizard_step(&wizard);
            match wizard.step() {
                WizardStep::BasicInfo => {
                    wizard.project_name =
                        prompt_with_default("Project name", &wizard.project_name)?;
                    wizard.description =
                        prompt_with_default("Description", &wizard.description)?;
                    if let Err(e) = wizard.next() {
                        eprintln!("{}", e);
                    }
                }
                WizardStep::Features => {
                    if confirm("Continue? [Y/n] (n goes back): ")? {
                        wizard.next()?;
                    } else {
                        wizard.previous();
                    }
                }
                WizardStep::Summary => {
                    if confirm("Finish? [Y/n] (n goes back): ")? {
                        return Ok(());
                    }
                    wizard.previous();
                }
            }
        }
    }
}

// =============================================================================
// Prompts
// =============================================================================

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn prompt_with_default(label: &str, default: &str) -> Result<String> {
    if default.is_empty() {
        return prompt(label);
    }
    let input = prompt(&format!("{} [{}]", label, default))?;
    Ok(if input.is_empty() {
        default.to_string()
    } else {
        input
    })
}

fn prompt_password() -> Result<String> {
    let password = rpassword::prompt_password("Password: ")?;
    Ok(password)
}

/// Yes unless the answer is "n"
fn confirm(question: &str) -> Result<bool> {
    print!("{}", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_lowercase() != "n")
}
