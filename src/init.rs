use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config;

/// Default config.toml content
pub const DEFAULT_CONFIG: &str = r#"# prnews configuration.
# Every key is optional; missing keys fall back to the values shown here.

[github]
# Repositories listed per owner (you and each of your organizations)
repo_limit = 30
# Merged PRs fetched per run
pr_limit = 50
include_orgs = true
# Diff excerpt length per PR
diff_max_lines = 500
# PRs above either threshold are listed without their diff
large_pr_files = 10
large_pr_changes = 500

[search]
default_days = 7
# Empty means all base branches
default_branch = ""

[summary]
# Any CLI that reads a prompt on stdin and prints the answer works here.
command = "claude"
args = ["-p"]
timeout_secs = 600
# system_prompt = "You summarize merged pull requests for a team..."

[ui]
copy_feedback_ms = 2000
"#;

/// Run the init command
pub fn run_init(force: bool) -> Result<()> {
    init_in(&config::config_dir(), force)
}

fn init_in(config_home: &Path, force: bool) -> Result<()> {
    if !config_home.exists() {
        println!(
            "Creating configuration directory: {}",
            config_home.display()
        );
        fs::create_dir_all(config_home).context("Failed to create config directory")?;
    }

    let config_path = config_home.join("config.toml");
    write_file_if_needed(&config_path, DEFAULT_CONFIG, force, "config.toml")?;

    println!();
    println!("Initialization complete!");
    println!("Edit {} to customize prnews.", config_path.display());

    Ok(())
}

/// Write a file if it doesn't exist or force is true
fn write_file_if_needed(path: &Path, content: &str, force: bool, name: &str) -> Result<()> {
    if path.exists() && !force {
        println!(
            "Skipping {} (already exists, use --force to overwrite)",
            name
        );
        return Ok(());
    }

    println!("Writing {}...", name);
    fs::write(path, content).with_context(|| format!("Failed to write {}", name))?;
    Ok(())
}
