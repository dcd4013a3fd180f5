// src/server/mod.rs

use anyhow::{Context, Result};
use serde::Serialize;
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Instant};
use tracing::{debug, error, info, warn};
use warp::{
    http::StatusCode,
    reject::Rejection,
    reply::{Reply, Response},
    Filter,
};

use crate::{
    context::DashboardContext, filter::FilterParams, handler::update_charts,
    layout::DashboardLayout,
};

const INDEX_HTML: &str = include_str!("index.html");
const MAX_BODY_BYTES: u64 = 64 * 1024;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    details: Option<String>,
}

fn error_reply(status: StatusCode, error: &str, details: Option<String>) -> Response {
    let body = ErrorResponse {
        error: error.to_string(),
        details,
    };
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

async fn health_check() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&serde_json::json!({
        "status": "healthy",
        "service": "prenoms-dashboard"
    })))
}

async fn update(params: FilterParams, ctx: Arc<DashboardContext>) -> Result<Response, Rejection> {
    let start = Instant::now();
    debug!(?params, "update requested");

    // filtering is CPU-bound; keep it off the reactor
    let join = tokio::task::spawn_blocking(move || {
        update_charts(&ctx, &params).map(|charts| charts.figures(&ctx))
    })
    .await;

    match join {
        Ok(Ok(figures)) => {
            debug!(elapsed = ?start.elapsed(), "charts updated");
            Ok(warp::reply::json(&figures).into_response())
        }
        Ok(Err(e)) => {
            error!("chart update failed: {:?}", e);
            Ok(error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Update failed",
                Some(format!("{:#}", e)),
            ))
        }
        Err(e) => {
            error!("chart update task failed: {}", e);
            Ok(error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Update failed",
                Some(format!("join error: {}", e)),
            ))
        }
    }
}

async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let reply = if err.is_not_found() {
        error_reply(StatusCode::NOT_FOUND, "Not found", None)
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        warn!("rejected filter parameters: {}", e);
        error_reply(
            StatusCode::BAD_REQUEST,
            "Invalid filter parameters",
            Some(e.to_string()),
        )
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        error_reply(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large", None)
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        error_reply(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed", None)
    } else {
        error!("unhandled rejection: {:?}", err);
        error_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal error",
            Some(format!("{:?}", err)),
        )
    };
    Ok(reply)
}

/// All dashboard routes, with rejections turned into JSON errors.
pub fn routes(
    ctx: Arc<DashboardContext>,
    layout: Arc<DashboardLayout>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let index = warp::path::end()
        .and(warp::get())
        .map(|| warp::reply::html(INDEX_HTML));

    let health = warp::path("healthz")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(health_check);

    let layout_route = warp::path!("api" / "layout")
        .and(warp::get())
        .map(move || warp::reply::json(layout.as_ref()));

    let update_route = warp::path!("api" / "update")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(warp::any().map(move || Arc::clone(&ctx)))
        .and_then(update);

    index
        .or(health)
        .or(layout_route)
        .or(update_route)
        .recover(handle_rejection)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(
    addr: SocketAddr,
    ctx: Arc<DashboardContext>,
    layout: Arc<DashboardLayout>,
) -> Result<()> {
    let (bound, server) = warp::serve(routes(ctx, layout))
        .try_bind_ephemeral(addr)
        .with_context(|| format!("binding {}", addr))?;

    info!("Server listening on http://{}", bound);
    info!("Update endpoint: POST http://{}/api/update", bound);
    server.await;
    Ok(())
}
