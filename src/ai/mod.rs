pub mod prompts;
pub mod summarizer;

pub use prompts::{build_summary_prompt, SummaryRequest};
pub use summarizer::{summarize, SummarizeError};
