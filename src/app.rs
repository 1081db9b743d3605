/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → 依存生成 (ServiceRegistry, strategy ごとの handler) → Router 組み立て
 * - Middleware の適用 (request-id / trace / timeout)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc, time::Duration};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::services::authentication::{
    AuthenticationHandler, RemoteAuthenticationService, ServiceRegistry,
};
use crate::{api, config::Config, middleware, state::AppState};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,auth_handler=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_state(config: &Config) -> Result<AppState> {
    // Fail fast when the auth server is down; the overall request bound is the TimeoutLayer.
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .build()?;

    // Every strategy resolves the same remote authentication service by path.
    let remote =
        RemoteAuthenticationService::with_client(client, config.auth_service_url.clone());
    let registry = Arc::new(
        ServiceRegistry::new().with_service(config.auth_service_path.clone(), Arc::new(remote)),
    );

    let handlers = config
        .strategies
        .iter()
        .map(|strategy| {
            tracing::info!(
                strategy = %strategy.name,
                entity = %strategy.entity,
                service_path = %strategy.service_path(),
                success_redirect = ?strategy.success_redirect,
                failure_redirect = ?strategy.failure_redirect,
                "registering authentication strategy"
            );
            AuthenticationHandler::new(strategy.clone(), registry.clone())
        })
        .collect();

    Ok(AppState::new(handlers))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(&state))
        .with_state(state);

    middleware::http::apply(router, config)
}
