//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create the Axum router with the content and health handlers
//! - Wire up middleware (request ID, tracing, timeout, panic fallback)
//! - Serve with graceful shutdown on the coordinator signal
//!
//! # Readiness strategy: serve-with-fallback
//! The content endpoint is registered unconditionally and always answers.
//! While the flag client has no snapshot yet, the configured fallback value
//! stands in for the flag; once ready, every request evaluates against the
//! current snapshot. `/health` never consults the flag client at all, so
//! liveness probes cannot be taken down by the provider.

use std::any::Any;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, FallbackConfig, MessageConfig};
use crate::flags::{EvaluationContext, FlagClient};
use crate::http::request::MakeRequestUuid;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub flags: FlagClient,
    pub message: MessageConfig,
    pub fallback: FallbackConfig,
}

/// HTTP server for the service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and flag client.
    pub fn new(config: &AppConfig, flags: FlagClient) -> Self {
        let state = AppState {
            flags,
            message: config.message.clone(),
            fallback: config.fallback,
        };
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(root))
            .route("/health", get(health))
            .fallback(not_found)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(CatchPanicLayer::custom(handle_panic))
    }

    /// Run the server, accepting connections on the given listener until the
    /// shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Content handler: welcome message, beta suffix gated by the flag.
async fn root(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let ctx = EvaluationContext::new(&state.message.context_user_id);

    let beta_enabled = if state.flags.is_ready() {
        state.flags.is_enabled(&state.message.flag_name, &ctx)
    } else {
        tracing::debug!(
            flag = %state.message.flag_name,
            fallback = state.fallback.beta_enabled,
            "flag client not ready, using configured fallback"
        );
        state.fallback.beta_enabled
    };

    tracing::debug!(
        flag = %state.message.flag_name,
        enabled = beta_enabled,
        state = state.flags.state().as_str(),
        "serving content"
    );

    metrics::record_request("GET", "/", StatusCode::OK.as_u16(), start);
    compose_message(&state.message, beta_enabled)
}

/// Health handler. Fixed response, independent of flag state.
async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "No matching route")
}

/// Last-resort handler for faults in the HTTP layer itself.
fn handle_panic(_err: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("request handler panicked");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}

fn compose_message(message: &MessageConfig, beta_enabled: bool) -> String {
    let mut body = message.base.clone();
    if beta_enabled {
        body.push_str(&message.beta_suffix);
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_with_flag_on_appends_suffix_exactly() {
        let message = MessageConfig::default();
        assert_eq!(
            compose_message(&message, true),
            "Welcome to the CI/CD Release Engineering Lab 🚀\n🧪 Beta Feature: Releasing smarter, one flag at a time."
        );
    }

    #[test]
    fn message_with_flag_off_is_base_only() {
        let message = MessageConfig::default();
        assert_eq!(
            compose_message(&message, false),
            "Welcome to the CI/CD Release Engineering Lab 🚀"
        );
    }
}
