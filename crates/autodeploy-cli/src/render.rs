//! Plain-text rendering of fetched data.

use autodeploy_core::models::{Analytics, DeploymentId, LogEntry};
use autodeploy_core::utils::{format_timestamp, truncate_string};
use autodeploy_core::wizard::{Wizard, WizardStep};
use autodeploy_core::Dashboard;

/// Column width for deployment names in listings
const NAME_WIDTH: usize = 24;

pub fn dashboard(dashboard: &Dashboard) {
    println!("\nWelcome, {}\n", dashboard.user.name);

    if dashboard.deployments.is_empty() {
        println!("No deployments yet. Create one with: autodeploy deploy");
        return;
    }

    println!("{:<8} {:<NAME_WIDTH$} {:<12} {:<12} CREATED", "ID", "NAME", "ENV", "STATUS");
    for d in &dashboard.deployments {
        println!(
            "{:<8} {:<NAME_WIDTH$} {:<12} {:<12} {}",
            d.id.as_str(),
            truncate_name(&d.name),
            d.environment.map(|e| e.as_str()).unwrap_or("-"),
            d.status_display(),
            d.created_at.as_deref().map(format_timestamp).unwrap_or_default(),
        );
    }
}

fn truncate_name(name: &str) -> String {
    if name.chars().count() <= NAME_WIDTH {
        name.to_string()
    } else {
        let short: String = name.chars().take(NAME_WIDTH - 1).collect();
        format!("{}…", short)
    }
}

pub fn logs(id: &DeploymentId, shown: &[&LogEntry], total: usize) {
    println!("\nDeployment Logs ({})\n", id);

    if total == 0 {
        println!("No logs available for this deployment.");
        return;
    }
    if shown.is_empty() {
        println!("No logs match your filter.");
        return;
    }

    for log in shown {
        let marker = if log.is_error() { "!" } else { " " };
        println!(
            "{} {:<20} {}",
            marker,
            log.timestamp_display(),
            truncate_string(&log.message, 2000)
        );
    }
    if shown.len() < total {
        println!("\n{} of {} entries shown", shown.len(), total);
    }
}

pub fn analytics(analytics: &Analytics) {
    println!("\nDeployment Analytics\n");
    println!("Total Deployments:  {}", analytics.total_deployments);
    println!("Active Deployments: {}", analytics.active_deployments);
    println!("Failed Deployments: {}", analytics.failed_deployments);
    println!("Global Traffic:     {}", analytics.traffic_display());
    println!("Average Latency:    {}", analytics.latency_display());

    println!("\nDeployment Status Breakdown");
    match analytics.deployment_status {
        Some(ref statuses) if !statuses.is_empty() => {
            for status in statuses {
                println!("  {:<16} {}", status.name, status.count);
            }
        }
        _ => println!("  No deployment status data available at the moment."),
    }
}

pub fn wizard_step(wizard: &Wizard) {
    let title = match wizard.step() {
        WizardStep::BasicInfo => "Basic Information",
        WizardStep::Features => "Explore Core Features",
        WizardStep::Summary => "All Set",
    };
    println!("\n--- Step {} of 3: {} ---", wizard.step().number(), title);

    if wizard.step() == WizardStep::Summary {
        println!("Project:     {}", wizard.project_name);
        println!("Description: {}", wizard.description);
    }
}
