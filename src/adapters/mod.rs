pub mod gemini;
pub mod github;
pub mod llm;

pub use gemini::GeminiAdapter;
pub use github::{GitHubClient, PullRequestRef};
