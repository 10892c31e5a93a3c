//! Rendering the routing config to its YAML file

use crate::pipeline::models::RoutingConfig;
use crate::Result;
use chrono::Local;
use std::fs;
use std::path::Path;
use tracing::info;

/// Render the config as YAML with an update-time header comment.
pub fn render(config: &RoutingConfig) -> Result<String> {
    let body = serde_yaml::to_string(config)?;
    let stamp = Local::now().format("%Y-%m-%d %H:%M");
    Ok(format!("# Update: {stamp}\n{body}"))
}

/// Render and write the config file.
pub fn write_file(config: &RoutingConfig, path: &Path) -> Result<()> {
    fs::write(path, render(config)?)?;
    info!(path = %path.display(), "routing config written");
    Ok(())
}
