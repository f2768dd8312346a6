/*
 * Responsibility
 * - Config読み込み → 依存生成 (JWKS source / key cache / TokenGate) → Router 組み立て
 * - Middleware の適用 (token gate, request-id / trace / timeout)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::{Config, GateConfig, TokenSource};
use crate::middleware;
use crate::services::gate::TokenGate;
use crate::services::jwks::{HttpKeySource, SigningKeyCache};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,token_gate=debug,tower_http=debug cargo run
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
        // Always surface panic via tracing so they don't get "lost"
        // (stderr can be hidden depending on how the process is launched.)
        tracing::error!(?info, "panic");

        // In development, fail fast: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();

    // Refuse to start on bad gate configuration.
    let config = Config::from_env().context("invalid configuration")?;

    init_panic_hook(!config.app_env.is_production());

    log_gate_config(&config.gate);
    tracing::info!(
        "starting token gate in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config.gate)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Build the process-wide gate (one key cache for the whole process).
pub fn build_state(gate: &GateConfig) -> Result<AppState> {
    let source = HttpKeySource::new(gate.jwks_uri.clone()).context("failed to build JWKS client")?;
    let keys = SigningKeyCache::new(Arc::new(source));
    let gate = TokenGate::new(gate, keys);

    Ok(AppState::new(Arc::new(gate)))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new().nest("/api/v1", api::v1::routes());
    let router = middleware::gate::apply(router, state.clone()).with_state(state);

    // HTTP-level layers wrap the gate so the timeout also covers key fetches.
    middleware::http::apply(router, config.request_timeout)
}

fn log_gate_config(gate: &GateConfig) {
    let source = match &gate.source {
        TokenSource::Header(name) => format!("header {}", name),
        TokenSource::Cookie(name) => format!("cookie {}", name),
    };

    tracing::info!(
        token_source = %source,
        jwks_uri = %gate.jwks_uri,
        issuer = gate.issuer.as_deref().unwrap_or("-"),
        audience = gate.audience.as_deref().unwrap_or("-"),
        tenant_check = gate.tenant.is_some(),
        exempt_patterns = gate.exempt_paths.len(),
        "token gate configured"
    );
}
