use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use super::prompts::{build_summary_prompt, SummaryRequest, SYSTEM_PROMPT};
use crate::config::SummaryConfig;

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("summarizer command '{0}' not found in PATH")]
    CommandNotFound(String),
    #[error("failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{command}' exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("'{command}' timed out after {secs}s")]
    Timeout { command: String, secs: u64 },
    #[error("'{0}' returned an empty summary")]
    EmptyOutput(String),
}

/// Arguments passed to the summarizer: configured args then the system prompt.
pub fn summarizer_args(config: &SummaryConfig) -> Vec<String> {
    let system_prompt = config.system_prompt.as_deref().unwrap_or(SYSTEM_PROMPT);
    let mut args = config.args.clone();
    args.push("--system-prompt".to_string());
    args.push(system_prompt.to_string());
    args
}

/// Turn collected PR text into a digest using the configured LLM CLI.
pub async fn summarize(
    config: &SummaryConfig,
    request: &SummaryRequest,
) -> Result<String, SummarizeError> {
    if which::which(&config.command).is_err() {
        return Err(SummarizeError::CommandNotFound(config.command.clone()));
    }

    let prompt = build_summary_prompt(request);
    info!(
        repo = %request.repo,
        prs = request.pr_count,
        prompt_bytes = prompt.len(),
        "summarizing"
    );

    run_command(
        &config.command,
        &summarizer_args(config),
        &prompt,
        Duration::from_secs(config.timeout_secs),
    )
    .await
}

/// Spawn `program`, feed `input` on stdin and return trimmed stdout.
pub(crate) async fn run_command(
    program: &str,
    args: &[String],
    input: &str,
    timeout: Duration,
) -> Result<String, SummarizeError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| SummarizeError::Spawn {
            command: program.to_string(),
            source,
        })?;

    // Feed stdin while draining stdout so a large prompt cannot fill both pipes
    let stdin = child.stdin.take();
    let feed = async move {
        if let Some(mut stdin) = stdin {
            // A child that exits early closes stdin; its exit status is checked below
            if let Err(e) = stdin.write_all(input.as_bytes()).await {
                debug!("Failed to write prompt to {}: {}", program, e);
            }
        }
    };
    let exchange = async {
        let ((), output) = tokio::join!(feed, child.wait_with_output());
        output
    };

    // The child is killed on drop when the deadline passes
    let output = match tokio::time::timeout(timeout, exchange).await {
        Ok(result) => result.map_err(|source| SummarizeError::Spawn {
            command: program.to_string(),
            source,
        })?,
        Err(_) => {
            return Err(SummarizeError::Timeout {
                command: program.to_string(),
                secs: timeout.as_secs(),
            })
        }
    };

    if !output.status.success() {
        return Err(SummarizeError::Failed {
            command: program.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let summary = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if summary.is_empty() {
        return Err(SummarizeError::EmptyOutput(program.to_string()));
    }
    Ok(summary)
}
