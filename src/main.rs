mod adapters;
mod config;
mod core;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "prlens")]
#[command(about = "AI pull request reviews from bounded, secret-scrubbed diff chunks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    model: Option<String>,

    #[arg(long, global = true, help = "Maximum characters per diff chunk")]
    max_chunk_size: Option<usize>,

    #[arg(long, global = true, help = "Concurrent model requests")]
    concurrency: Option<usize>,

    #[arg(long, global = true, value_enum, help = "What to do when a chunk review fails")]
    on_failure: Option<core::FailurePolicy>,

    #[arg(long, global = true, value_enum, default_value = "markdown")]
    output_format: OutputFormat,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Review a GitHub pull request and post the result as a comment")]
    Review {
        #[arg(help = "Pull request URL, e.g. https://github.com/owner/repo/pull/1")]
        pr_url: String,

        #[arg(long, help = "GitHub API token (defaults to GITHUB_TOKEN)")]
        token: Option<String>,

        #[arg(long, help = "Print the review instead of posting it")]
        no_post: bool,

        #[arg(short, long, help = "Also write the review to this file")]
        output: Option<PathBuf>,
    },
    #[command(about = "Split a local diff into review units without calling a model")]
    Analyze {
        #[arg(long, help = "Path to diff file (reads from stdin if not provided)")]
        diff: Option<PathBuf>,

        #[arg(long, default_value = "Local changes")]
        title: String,

        #[arg(long)]
        body: Option<String>,

        #[arg(long, help = "Print the full prompt for every unit")]
        prompts: bool,
    },
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = config::Config::load()?;
    let token = match &cli.command {
        Commands::Review { token, .. } => token.clone(),
        Commands::Analyze { .. } => None,
    };
    config.merge_with_cli(config::CliOverrides {
        model: cli.model.clone(),
        github_token: token,
        max_chunk_size: cli.max_chunk_size,
        concurrency: cli.concurrency,
        on_failure: cli.on_failure,
    });
    config.apply_env();

    match cli.command {
        Commands::Review {
            pr_url,
            no_post,
            output,
            ..
        } => {
            review_command(config, pr_url, no_post, output).await?;
        }
        Commands::Analyze {
            diff,
            title,
            body,
            prompts,
        } => {
            analyze_command(config, diff, title, body, prompts, cli.output_format).await?;
        }
    }

    Ok(())
}

async fn review_command(
    config: config::Config,
    pr_url: String,
    no_post: bool,
    output_path: Option<PathBuf>,
) -> Result<()> {
    config.validate_for_review()?;
    let pr = adapters::PullRequestRef::parse(&pr_url)?;
    let generator = adapters::llm::create_generator(&config.model_config())?;
    let github = adapters::GitHubClient::new(
        config.github_token.clone().unwrap_or_default(),
        config.github_api_url.clone(),
    )?;

    info!("Reviewing {} with model: {}", pr, config.model);

    let pr_context = github.get_pull_request(&pr).await?;
    let diff_content = github.get_diff(&pr).await?;

    let analyzed = core::DiffAnalyzer::new(config.max_chunk_size)
        .with_exclude(config.exclude_patterns())
        .analyze(&diff_content, pr_context);

    let pipeline = core::ReviewPipeline::new(Arc::from(generator), config.pipeline_config());
    let review = pipeline.run(&analyzed).await?;

    if let Some(path) = output_path {
        tokio::fs::write(&path, &review)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote review to {}", path.display());
    }

    if no_post {
        println!("{}", review);
    } else {
        github.post_comment(&pr, &review).await?;
        println!("Review comment posted to {}", pr);
    }

    Ok(())
}

async fn analyze_command(
    config: config::Config,
    diff_path: Option<PathBuf>,
    title: String,
    body: Option<String>,
    prompts: bool,
    format: OutputFormat,
) -> Result<()> {
    config.validate()?;

    let diff_content = if let Some(path) = diff_path {
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?
    } else if std::io::stdin().is_terminal() {
        anyhow::bail!("No diff provided. Pass --diff <FILE> or pipe a diff on stdin.");
    } else {
        use std::io::Read;
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    let analyzed = core::DiffAnalyzer::new(config.max_chunk_size)
        .with_exclude(config.exclude_patterns())
        .analyze(&diff_content, core::PullRequestContext::new(title, body));

    let output = if prompts {
        format_prompts(&analyzed, format)?
    } else {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(&analyzed)?,
            OutputFormat::Markdown => format_units_as_markdown(&analyzed),
        }
    };

    println!("{}", output);
    Ok(())
}

fn format_prompts(analyzed: &core::AnalyzedDiff, format: OutputFormat) -> Result<String> {
    let prompts: Vec<String> = analyzed
        .review_units()
        .iter()
        .map(|unit| core::PromptBuilder::build_for_unit(&analyzed.pr_context, unit))
        .collect();

    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(&prompts)?,
        OutputFormat::Markdown => prompts.join("\n\n<!-- next unit -->\n\n"),
    })
}

fn format_units_as_markdown(analyzed: &core::AnalyzedDiff) -> String {
    let mut output = String::new();
    output.push_str(&format!("# {}\n\n", analyzed.pr_context.title));
    output.push_str(&format!(
        "{} files, {} review units\n\n",
        analyzed.file_count(),
        analyzed.review_units().len()
    ));
    output.push_str("| File | Language | Chunk | Characters |\n");
    output.push_str("|------|----------|-------|------------|\n");

    for file in &analyzed.files {
        if file.chunks.is_empty() {
            output.push_str(&format!(
                "| `{}` | {} | - | 0 |\n",
                file.file_name, file.language.display_name
            ));
        }
        for (index, chunk) in file.chunks.iter().enumerate() {
            output.push_str(&format!(
                "| `{}` | {} | {} | {} |\n",
                file.file_name,
                file.language.display_name,
                index + 1,
                chunk.chars().count()
            ));
        }
    }

    output
}
