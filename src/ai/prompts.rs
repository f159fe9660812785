/// Built-in system prompt for the summarizer
pub const SYSTEM_PROMPT: &str = r#"You analyze merged GitHub pull requests and summarize what a team member needs to catch up on.

Focus on:
1. Major features added or changed
2. Important technical decisions and architecture changes
3. Bug fixes and improvements
4. Feedback and lessons from team reviews
5. Code patterns and conventions contributors should know

Output format:
- Concise and practical
- Use bullet points
- Extract only what matters, skip filler"#;

/// Everything the summarizer needs for one digest
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRequest {
    pub repo: String,
    pub pr_count: usize,
    pub date_range: String,
    pub collected_text: String,
}

pub fn build_summary_prompt(req: &SummaryRequest) -> String {
    format!(
        r#"Below are the {count} most recently merged PRs of the {repo} repository.
Period: {range}
Summarize the key points a contributor should catch up on.

---
{data}
---

Analyze the PRs above and summarize them using these sections:

# {repo} PR Summary ({range})

## 📦 Key Changes
(new features, improvements, refactoring)

## 🐛 Bug Fixes
(only if any)

## 💡 Learning Points
(insights from review comments, code patterns)

## ⚠️ Heads-up
(breaking changes, required migrations - only if any)"#,
        count = req.pr_count,
        repo = req.repo,
        range = req.date_range,
        data = req.collected_text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_request_fields() {
        let req = SummaryRequest {
            repo: "org/a".to_string(),
            pr_count: 3,
            date_range: "2026-01-26 ~ 2026-02-02".to_string(),
            collected_text: "## PR #1: Something".to_string(),
        };
        let prompt = build_summary_prompt(&req);

        assert!(prompt.starts_with("Below are the 3 most recently merged PRs of the org/a repository."));
        assert!(prompt.contains("Period: 2026-01-26 ~ 2026-02-02"));
        assert!(prompt.contains("---\n## PR #1: Something\n---"));
        assert!(prompt.contains("# org/a PR Summary (2026-01-26 ~ 2026-02-02)"));
    }
}
