//! Tool Agent server binary.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tool_agent::adapters::ai::{OpenAICompatibleClient, ScriptedModelClient};
use tool_agent::adapters::http::{app_router, ChatAppState, ToolsAppState};
use tool_agent::adapters::tools::{builtin_registry, UpstreamClient};
use tool_agent::application::{AgentOrchestrator, ToolExecutor};
use tool_agent::config::{AppConfig, ModelProvider};
use tool_agent::ports::ModelClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config);
    config.validate().context("invalid configuration")?;

    // 1. Tools
    let upstream = UpstreamClient::new(
        config.tools.max_connections_per_host,
        config.tools.http_timeout(),
    )
    .context("failed to build upstream HTTP client")?;
    let registry = builtin_registry(
        config.tools.weather_config(),
        config.tools.search_config(),
        upstream,
    )
    .context("failed to register built-in tools")?;
    tracing::info!(tools = ?registry.names(), "tool registry ready");

    let executor = Arc::new(
        ToolExecutor::new(Arc::new(registry))
            .with_timeout(config.executor.timeout())
            .with_max_retries(config.executor.max_retries)
            .with_retry_base_delay(config.executor.retry_base_delay()),
    );

    // 2. Model
    let model = build_model_client(&config)?;
    tracing::info!(model = model.model_name(), "model client ready");

    let orchestrator = Arc::new(
        AgentOrchestrator::new(model, executor.clone())
            .with_max_tool_rounds(config.agent.max_tool_rounds)
            .with_system_prompt(config.agent.system_prompt.clone()),
    );

    // 3. Serve
    let shutdown = CancellationToken::new();
    let app = app_router(
        ChatAppState::new(orchestrator, shutdown.clone()),
        ToolsAppState::new(executor),
        &config.server,
    );

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, environment = ?config.server.environment, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("server error")?;

    tracing::info!("shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

fn build_model_client(config: &AppConfig) -> anyhow::Result<Arc<dyn ModelClient>> {
    match config.model.provider {
        ModelProvider::OpenAI => {
            let client_config = config
                .model
                .client_config()
                .context("model API key is not configured")?;
            let client = OpenAICompatibleClient::new(client_config)?;
            Ok(Arc::new(client))
        }
        ModelProvider::Scripted => {
            tracing::warn!("using scripted model client; answers are canned");
            Ok(Arc::new(ScriptedModelClient::new()))
        }
    }
}

/// Resolves on ctrl-c or SIGTERM and cancels in-flight turns.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
    shutdown.cancel();
}
