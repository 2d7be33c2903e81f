//! Auto Deploy CLI - a command-line front end for the Auto Deploy service.
//!
//! Every command renders state fetched through the core library's
//! authenticated client; no business logic lives here.

mod app;
mod render;

use std::io;

use anyhow::{bail, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;

const USAGE: &str = "\
Usage: autodeploy <command>

Commands:
  login [email]        Log in and remember the session
  register             Create an account
  logout [--forget]    End the session (--forget also drops the stored password)
  whoami               Show the logged-in user
  dashboard            Show your profile and deployments
  deploy               Create a deployment
  logs <id> [filter]   Show a deployment's logs, optionally filtered
  analytics            Show deployment analytics
  wizard               Walk through the onboarding wizard";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Login(Option<String>),
    Register,
    Logout { forget: bool },
    Whoami,
    Dashboard,
    Deploy,
    Logs { id: String, filter: Option<String> },
    Analytics,
    Wizard,
    Help,
}

fn parse_command(args: &[String]) -> Result<Command> {
    let mut args = args.iter().map(String::as_str);
    let command = match args.next() {
        None | Some("help") | Some("--help") | Some("-h") => Command::Help,
        Some("login") => Command::Login(args.next().map(str::to_string)),
        Some("register") => Command::Register,
        Some("logout") => Command::Logout {
            forget: args.next() == Some("--forget"),
        },
        Some("whoami") => Command::Whoami,
        Some("dashboard") => Command::Dashboard,
        Some("deploy") => Command::Deploy,
        Some("logs") => match args.next() {
            Some(id) => Command::Logs {
                id: id.to_string(),
                filter: args.next().map(str::to_string),
            },
            None => bail!("No deployment ID provided. Please select a valid deployment."),
        },
        Some("analytics") => Command::Analytics,
        Some("wizard") => Command::Wizard,
        Some(other) => bail!("Unknown command: {}\n\n{}", other, USAGE),
    };
    Ok(command)
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_command(&args)?;
    if command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let mut app = App::new()?;
    info!(base_url = %app.base_url(), "Auto Deploy CLI starting");

    let result = match command {
        Command::Login(email) => app.login(email).await,
        Command::Register => app.register().await,
        Command::Logout { forget } => app.logout(forget),
        Command::Whoami => {
            app.whoami();
            Ok(())
        }
        Command::Dashboard => app.dashboard().await,
        Command::Deploy => app.deploy().await,
        Command::Logs { id, filter } => app.logs(&id, filter.as_deref()).await,
        Command::Analytics => app.analytics().await,
        Command::Wizard => app.wizard(),
        Command::Help => Ok(()),
    };

    app.drain_navigation();
    result
}
