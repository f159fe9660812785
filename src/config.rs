use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use xdg::BaseDirectories;

/// Lookback window used when the days field cannot be parsed.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github: GithubConfig,
    pub search: SearchConfig,
    pub summary: SummaryConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Max repositories listed per owner (user and each org)
    pub repo_limit: u32,
    /// Max merged PRs fetched per run
    pub pr_limit: u32,
    /// Also list repositories of the organizations the user belongs to
    pub include_orgs: bool,
    /// Diff excerpt is cut after this many lines
    pub diff_max_lines: usize,
    /// PRs touching more files than this are not expanded
    pub large_pr_files: u32,
    /// PRs with more changed lines than this are not expanded
    pub large_pr_changes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Initial value of the days field
    pub default_days: u32,
    /// Initial value of the branch field (empty = all branches)
    pub default_branch: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// LLM CLI used for summarizing (must read the prompt from stdin)
    pub command: String,
    /// Extra arguments placed before `--system-prompt`
    pub args: Vec<String>,
    pub timeout_secs: u64,
    /// Overrides the built-in system prompt
    pub system_prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long the "Copied!" feedback stays visible
    pub copy_feedback_ms: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            repo_limit: 30,
            pr_limit: 50,
            include_orgs: true,
            diff_max_lines: 500,
            large_pr_files: 10,
            large_pr_changes: 500,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_days: DEFAULT_LOOKBACK_DAYS,
            default_branch: String::new(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            command: "claude".to_owned(),
            args: vec!["-p".to_owned()],
            timeout_secs: 600,
            system_prompt: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            copy_feedback_ms: 2000,
        }
    }
}

impl Config {
    /// Load `~/.config/prnews/config.toml`, falling back to defaults when absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Config directory: `$XDG_CONFIG_HOME/prnews`
pub fn config_dir() -> PathBuf {
    BaseDirectories::with_prefix("prnews")
        .map(|dirs| dirs.get_config_home())
        .unwrap_or_else(|_| PathBuf::from(".config/prnews"))
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}
