//! Plan Gate HTTP service.
//!
//! Loads configuration, wires the collaborator adapters into the plan-change
//! handler and serves the gate over HTTP.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use plan_gate::adapters::http::{gate_router, GateAppState};
use plan_gate::adapters::{
    BillingApiClient, CallbackOutcomeEmitter, LoggingOutcomeEmitter, RestClient, UsageApiClient,
};
use plan_gate::application::{EvaluatePlanChangeHandler, GateTimeouts};
use plan_gate::config::AppConfig;
use plan_gate::ports::OutcomeEmitter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let handler = Arc::new(build_handler(&config)?);
    let app = gate_router(GateAppState::new(handler), config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        feature = %config.gate.feature_key,
        usage_fallback = ?config.gate.usage_fallback,
        "Plan gate listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Plan gate stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_handler(
    config: &AppConfig,
) -> Result<EvaluatePlanChangeHandler, Box<dyn std::error::Error + Send + Sync>> {
    let billing = Arc::new(BillingApiClient::new(RestClient::new(
        &config.billing.api_base_url,
        config.billing.api_token.clone(),
    )?));
    let usage = Arc::new(UsageApiClient::new(RestClient::new(
        &config.usage.api_base_url,
        config.usage.api_token.clone(),
    )?));

    let emitter: Arc<dyn OutcomeEmitter> = match &config.host.deny_callback_url {
        Some(url) => Arc::new(CallbackOutcomeEmitter::new(RestClient::new(
            url,
            config.host.callback_token.clone(),
        )?)),
        None => {
            tracing::info!("No deny callback configured, denials are only logged");
            Arc::new(LoggingOutcomeEmitter)
        }
    };

    let timeouts = GateTimeouts {
        billing_identity: config.billing.timeout(),
        entitlements: config.billing.timeout(),
        usage: config.usage.timeout(),
        emit: config.host.callback_timeout(),
    };

    Ok(EvaluatePlanChangeHandler::new(
        billing.clone(),
        billing,
        usage,
        emitter,
        config.gate.tracked_feature()?,
    )
    .with_usage_fallback(config.gate.usage_fallback)
    .with_timeouts(timeouts))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
