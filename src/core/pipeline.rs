use crate::adapters::llm::Generator;
use crate::core::analyzer::AnalyzedDiff;
use crate::core::prompt::PromptBuilder;
use crate::core::review::ReviewAssembler;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    #[default]
    Placeholder,
    Abort,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("review generation failed for {file} (chunk {chunk})")]
    Failed {
        file: String,
        chunk: usize,
        #[source]
        source: anyhow::Error,
    },
    #[error("review generation timed out after {timeout:?} for {file} (chunk {chunk})")]
    TimedOut {
        file: String,
        chunk: usize,
        timeout: Duration,
    },
}

impl GenerationError {
    fn placeholder(&self) -> String {
        let (file, chunk) = match self {
            GenerationError::Failed { file, chunk, .. } => (file, chunk),
            GenerationError::TimedOut { file, chunk, .. } => (file, chunk),
        };
        format!(
            "### 📄 `{}`\n\n> ⚠️ _Review unavailable for this chunk (part {}): {}_",
            file,
            chunk + 1,
            self.reason()
        )
    }

    fn reason(&self) -> String {
        match self {
            GenerationError::Failed { source, .. } => format!("{source:#}"),
            GenerationError::TimedOut { timeout, .. } => format!("timed out after {timeout:?}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub concurrency: usize,
    pub request_timeout: Duration,
    pub failure_policy: FailurePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            request_timeout: Duration::from_secs(120),
            failure_policy: FailurePolicy::Placeholder,
        }
    }
}

pub struct ReviewPipeline {
    generator: Arc<dyn Generator>,
    config: PipelineConfig,
}

impl ReviewPipeline {
    pub fn new(generator: Arc<dyn Generator>, config: PipelineConfig) -> Self {
        Self { generator, config }
    }

    pub async fn run(&self, analyzed: &AnalyzedDiff) -> Result<String> {
        let reviews = self.generate_reviews(analyzed).await?;
        Ok(ReviewAssembler::assemble(
            &analyzed.pr_context,
            analyzed.file_count(),
            &analyzed.languages(),
            &reviews,
        ))
    }

    pub async fn generate_reviews(&self, analyzed: &AnalyzedDiff) -> Result<Vec<String>> {
        let units = analyzed.review_units();
        info!(
            "Generating {} reviews with {} (concurrency {})",
            units.len(),
            self.generator.model_name(),
            self.config.concurrency
        );

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for (index, unit) in units.iter().enumerate() {
            let prompt = PromptBuilder::build_for_unit(&analyzed.pr_context, unit);
            let file = unit.file_name.to_string();
            let chunk = unit.chunk_index;
            let generator = Arc::clone(&self.generator);
            let semaphore = Arc::clone(&semaphore);
            let timeout = self.config.request_timeout;

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                debug!("Reviewing {} chunk {}", file, chunk);
                let result = match tokio::time::timeout(timeout, generator.generate(&prompt)).await {
                    Ok(Ok(text)) => Ok(text),
                    Ok(Err(source)) => Err(GenerationError::Failed { file, chunk, source }),
                    Err(_) => Err(GenerationError::TimedOut {
                        file,
                        chunk,
                        timeout,
                    }),
                };
                (index, result)
            });
        }

        let mut results: Vec<Option<Result<String, GenerationError>>> =
            (0..units.len()).map(|_| None).collect();
        // lowest index not yet known to have succeeded
        let mut pending = 0;
        while let Some(joined) = tasks.join_next().await {
            let (index, result) = joined?;
            if let Err(err) = &result {
                warn!("{}: {}", err, err.reason());
            }
            results[index] = Some(result);

            if self.config.failure_policy == FailurePolicy::Abort {
                while matches!(results.get(pending), Some(Some(Ok(_)))) {
                    pending += 1;
                }
                if let Some(Some(Err(_))) = results.get(pending) {
                    info!("Aborting {} outstanding reviews", tasks.len());
                    tasks.abort_all();
                    if let Some(Err(err)) = results[pending].take() {
                        return Err(err.into());
                    }
                }
            }
        }

        let mut reviews = Vec::with_capacity(results.len());
        for result in results.into_iter().flatten() {
            match result {
                Ok(text) => reviews.push(text),
                Err(err) => match self.config.failure_policy {
                    FailurePolicy::Placeholder => reviews.push(err.placeholder()),
                    FailurePolicy::Abort => return Err(err.into()),
                },
            }
        }

        Ok(reviews)
    }
}
