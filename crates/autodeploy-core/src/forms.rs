//! Client-side form validation for the login, registration and deployment
//! views. Validation runs before any request is issued.

use thiserror::Error;

use crate::models::{Environment, LogEntry, NewDeployment, RegisterRequest};
use crate::utils::contains_ignore_case;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required.")]
    Required(&'static str),

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("{0}")]
    InvalidEnvironment(String),
}

fn required(value: &str, field: &'static str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        Err(FormError::Required(field))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FormError> {
        required(&self.email, "Email")?;
        required(&self.password, "Password")
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    /// Check the form and build the registration body
    pub fn to_request(&self) -> Result<RegisterRequest, FormError> {
        required(&self.name, "Name")?;
        required(&self.email, "Email")?;
        required(&self.password, "Password")?;
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        Ok(RegisterRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeploymentForm {
    pub name: String,
    pub description: String,
    pub repository_url: String,
    pub environment: Environment,
}

impl DeploymentForm {
    /// Set the environment from user input
    pub fn set_environment(&mut self, input: &str) -> Result<(), FormError> {
        self.environment = input.parse().map_err(FormError::InvalidEnvironment)?;
        Ok(())
    }

    pub fn to_request(&self) -> Result<NewDeployment, FormError> {
        required(&self.name, "Name")?;
        required(&self.repository_url, "Repository URL")?;
        Ok(NewDeployment {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            repository_url: self.repository_url.trim().to_string(),
            environment: self.environment,
        })
    }
}

/// Entries whose message contains `query`, ignoring case
pub fn filter_logs<'a>(logs: &'a [LogEntry], query: &str) -> Vec<&'a LogEntry> {
    logs.iter()
        .filter(|log| contains_ignore_case(&log.message, query))
        .collect()
}
