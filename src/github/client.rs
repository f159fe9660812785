use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::process::Command;
use tracing::debug;

/// Execute gh CLI command and return stdout
/// Uses spawn_blocking to avoid blocking the tokio runtime
pub async fn gh_command(args: &[&str]) -> Result<String> {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    debug!(?args, "running gh");

    tokio::task::spawn_blocking(move || {
        let output = Command::new("gh")
            .args(&args)
            .output()
            .context("Failed to execute gh CLI - is it installed?")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("gh command failed: {}", stderr.trim());
        }

        String::from_utf8(output.stdout).context("gh output contains invalid UTF-8")
    })
    .await
    .context("spawn_blocking task panicked")?
}

/// Execute gh command that prints JSON and parse it
pub async fn gh_json<T: DeserializeOwned>(args: &[&str], error_context: &'static str) -> Result<T> {
    let output = gh_command(args).await?;
    serde_json::from_str(&output).context(error_context)
}

/// Split newline separated gh output into non-empty trimmed entries
pub(crate) fn non_empty_lines(output: &str) -> impl Iterator<Item = &str> {
    output.lines().map(str::trim).filter(|l| !l.is_empty())
}
