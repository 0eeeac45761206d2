pub mod analyzer;
pub mod chunker;
pub mod diff_parser;
pub mod language;
pub mod pipeline;
pub mod prompt;
pub mod redact;
pub mod review;

pub use analyzer::{AnalyzedDiff, DiffAnalyzer, PullRequestContext};
pub use pipeline::{FailurePolicy, ReviewPipeline};
pub use prompt::PromptBuilder;
