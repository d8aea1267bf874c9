use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use quiz_core::DEFAULT_POOL_SIZE;
use services::{AiConfig, BackendSelection, EngineConfig, QuizEngine, TutorService};

mod http;

#[derive(Parser, Debug)]
#[command(name = "quiz-engine", about = "Adaptive multiple-choice quiz engine")]
#[command(version)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "QUIZ_BIND", default_value = "127.0.0.1:8001")]
    bind: SocketAddr,

    /// Seed for item and option shuffling
    #[arg(long, env = "QUIZ_SEED")]
    seed: Option<u64>,

    /// Items held per difficulty band
    #[arg(long, default_value_t = DEFAULT_POOL_SIZE)]
    pool_size: usize,

    /// AI backend: auto, openai, anthropic or off (overrides QUIZ_AI_BACKEND)
    #[arg(long)]
    ai_backend: Option<BackendSelection>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut ai = AiConfig::from_env().context("invalid AI backend configuration")?;
    if let Some(selection) = cli.ai_backend {
        ai.selection = selection;
    }
    let tutor = Arc::new(TutorService::from_config(&ai));

    let config = EngineConfig {
        pool_size: cli.pool_size,
        rng_seed: cli.seed,
        ..EngineConfig::default()
    };
    let engine = QuizEngine::new(&config, tutor).context("failed to build item banks")?;
    for topic in engine.topics() {
        tracing::info!(topic, "serving topic");
    }

    let router = http::create_router(Arc::new(engine));
    let listener = TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;
    tracing::info!("quiz engine listening on {}", cli.bind);

    axum::serve(listener, router)
        .await
        .context("server stopped unexpectedly")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_and_overrides() {
        let cli = Cli::try_parse_from(["quiz-engine", "--seed", "5", "--ai-backend", "off"]).unwrap();
        assert_eq!(cli.seed, Some(5));
        assert_eq!(cli.pool_size, DEFAULT_POOL_SIZE);
        assert_eq!(cli.ai_backend, Some(BackendSelection::Disabled));
        assert!(!cli.verbose);

        assert!(Cli::try_parse_from(["quiz-engine", "--ai-backend", "gemini"]).is_err());
    }
}
