use std::time::Duration;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use checkin_application::commands::scan_commands::{self, MAX_PAYLOAD_BYTES};
use checkin_application::queries::check_in_queries;
use checkin_application::AppState;
use checkin_domain::RecentCheckInsQuery;
use checkin_interfaces_http::{build_router, ScanReply};

use crate::context::AppContext;

// Room for the JSON envelope around the largest accepted payload.
const MAX_BODY_BYTES: usize = MAX_PAYLOAD_BYTES * 2;

fn build_router_with_layers(state: AppState) -> Router {
    // The resolution itself is bounded by the client timeout; leave it room
    // to answer before the layer cuts the request.
    let request_timeout = Duration::from_secs(state.config.request_timeout_seconds + 5);
    build_router(state)
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}

pub async fn run_standalone(context: AppContext) -> Result<()> {
    let state = context.state;
    let app = build_router_with_layers(state.clone());
    let addr: std::net::SocketAddr = state.config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("check-in station stopped");
    Ok(())
}

/// Runs each payload through the session in order, exactly as consecutive
/// camera callbacks would arrive, and prints one JSON line per scan.
pub async fn run_scans(context: AppContext, payloads: Vec<String>) -> Result<()> {
    let state = context.state;
    for raw in payloads {
        let disposition = scan_commands::submit_scan(&state, raw).await?;
        println!("{}", serde_json::to_string(&ScanReply::from(disposition))?);
    }
    Ok(())
}

pub async fn print_recent(context: AppContext, limit: usize) -> Result<()> {
    let records = check_in_queries::list_recent_check_ins(
        &context.state,
        RecentCheckInsQuery { limit: Some(limit) },
    )
    .await?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for ctrl-c: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("failed to install SIGTERM handler: {}", err);
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
    info!("shutdown signal received");
}
