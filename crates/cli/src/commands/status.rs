//! Service status command

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::client::{ApiClient, HealthStatus, ServiceStatus};
use crate::output::{color_status, print_info, OutputFormat};

#[derive(Serialize)]
struct StatusReport {
    service: ServiceStatus,
    health: HealthStatus,
}

/// Show whether the service is up and which components are healthy
pub async fn show_status(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let service = client.service_status().await?;
    let health = client.health().await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&StatusReport { service, health })?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            println!("{}", "Grade Predictor".bold());
            println!("{}", "=".repeat(40));
            println!("Service: {}", color_status(&service.status));
            println!("Model:   {}", service.model.cyan());
            println!("Health:  {}", color_status(&health.status));

            let mut components: Vec<_> = health.components.iter().collect();
            components.sort_by(|a, b| a.0.cmp(b.0));
            for (name, component) in components {
                match &component.message {
                    Some(message) => println!("  {:<8} {} ({})", name, color_status(&component.status), message),
                    None => println!("  {:<8} {}", name, color_status(&component.status)),
                }
            }

            if health.components.is_empty() {
                print_info("No component details reported");
            }
        }
    }

    Ok(())
}
