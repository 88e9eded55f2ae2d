mod config;
mod heartbeat;

use std::sync::Arc;

use anyhow::Context;
use axum::{Router, routing::get};
use serenity::all::{Client, GatewayIntents, Http};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use trawler_core::{
    ChatSurface, ModerationProcessor, OutboundQueue, ReviewMessageSync, SubmissionCoordinator,
};
use trawler_gateway::{Handler, SerenityChatSurface};
use trawler_phisherman::{BrandCache, PhishermanClient, ReputationBackend};

use crate::config::Config;

const DEFAULT_LOG_FILTER: &str =
    "trawler=debug,trawler_core=debug,trawler_gateway=debug,serenity=warn,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    let config = Config::from_env()?;
    info!(?config, "Starting trawler");

    // Reputation backend
    let backend: Arc<dyn ReputationBackend> = Arc::new(
        PhishermanClient::new(&config.api_url, &config.api_key)
            .context("Failed to build Phisherman client")?,
    );
    let brands = Arc::new(BrandCache::new(backend.clone()));

    // Chat surface; edits to public messages go through the paced queue
    let http = Arc::new(Http::new(&config.discord_token));
    let surface: Arc<dyn ChatSurface> = Arc::new(SerenityChatSurface::new(http));
    let queue = OutboundQueue::spawn(surface.clone(), config.fanout_delay);

    let review = Arc::new(ReviewMessageSync::new(
        surface.clone(),
        backend.clone(),
        config.review_channel.clone(),
    ));
    let coordinator = Arc::new(SubmissionCoordinator::new(
        backend.clone(),
        brands.clone(),
        review,
        config.is_production(),
    ));
    let moderation = Arc::new(ModerationProcessor::new(
        backend,
        surface,
        queue,
        config.reject_mode,
    ));

    let mut client = Client::builder(&config.discord_token, GatewayIntents::GUILDS)
        .event_handler(Handler::new(coordinator, moderation, brands))
        .await
        .context("Failed to create Discord client")?;

    if let Some(url) = config.heartbeat_url.clone() {
        tokio::spawn(heartbeat::run(reqwest::Client::new(), url));
    }

    // Health endpoint
    let app = Router::new()
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(config.health_addr)
        .await
        .with_context(|| format!("Failed to bind health endpoint on {}", config.health_addr))?;
    info!("Health endpoint listening on {}", config.health_addr);

    let health_server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            error!("Health endpoint failed: {}", e);
        }
    });

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        shard_manager.shutdown_all().await;
    });

    client.start().await.context("Discord client stopped")?;

    let _ = health_server.await;
    info!("Trawler stopped");
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => tokio::select! {
                _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
            },
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
