use std::fs;
use std::path::PathBuf;

use ai_llm_service::{LlmServiceProfiles, telemetry};
use anyhow::{Context, Result};
use clap::Parser;
use listing_insight::{AnalysisRequest, PipelineConfig, analyze};
use tracing::{Level, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "listing-insight")]
#[command(about = "Student sentiment and grounded landlord questions for one listing", long_about = None)]
struct Cli {
    /// JSON analysis request
    #[arg(long)]
    input: PathBuf,
    /// Pretty-print the report
    #[arg(long)]
    pretty: bool,
    /// Run without any model service (lexical sentiment, fallback questions)
    #[arg(long)]
    rules_only: bool,
    /// Log level for the workspace crates
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env in the working directory is optional.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("warn", cli.log_level))
        .with(telemetry::layer())
        .try_init()
        .context("installing tracing subscriber")?;

    let body = fs::read_to_string(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let request: AnalysisRequest =
        serde_json::from_str(&body).context("parsing analysis request")?;

    let mut config = PipelineConfig::from_env()?;
    let report = if cli.rules_only {
        config = config.rules_only();
        analyze::<LlmServiceProfiles>(request, None, &config).await
    } else {
        let services = LlmServiceProfiles::from_env().context("configuring model service")?;
        let (sentiment, questions) = services.profiles();
        info!(
            sentiment_model = %sentiment.model,
            question_model = %questions.model,
            "model service ready"
        );
        analyze(request, Some(&services), &config).await
    };

    let out = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{out}");
    Ok(())
}
