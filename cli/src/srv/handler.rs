//! # devsrv Request Handler
//!
//! File: cli/src/srv/handler.rs
//!
//! ## Overview
//!
//! Builds the single axum `Router` that answers every request. The router
//! itself contains no file-serving logic; it stacks three pieces:
//!
//! 1. A `TraceLayer` whose `on_request` hook logs `METHOD uri` for each request
//! 2. An optional `SetResponseHeaderLayer` adding `Access-Control-Allow-Origin`
//! 3. `ServeDir` as the fallback service, which maps the URL path onto the root
//!    directory, rejects `..` segments, answers conditional and range requests
//!    and serves `index.html` for directories. What it cannot find is handed to
//!    `listing::list_directory`, which lists directories without an index and
//!    returns 404 for anything else
//!
//! The CORS layer wraps the fallback, so the header is present on *every*
//! response, 404s included, and is never present when no origin is configured.
//!
use super::listing;
use axum::{
    body::Body,
    handler::Handler,
    http::{header, HeaderValue, Request},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    classify::ServerErrorsFailureClass,
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{debug, info, warn, Span};

/// # Server Context (`ServerContext`)
///
/// Read-only state shared by all requests for the lifetime of the listener.
#[derive(Debug, Clone)]
pub struct ServerContext {
    /// Absolute path of the directory at the top of the served tree.
    pub root: PathBuf,

    /// Value sent as `Access-Control-Allow-Origin`, or `None` for no header.
    pub cors_allow_origin: Option<HeaderValue>,
}

/// # Create Router (`create_app`)
///
/// Assembles the router for `ctx`. Layers added later wrap the earlier ones,
/// so the trace layer is outermost and sees every request first.
pub fn create_app(ctx: &ServerContext) -> Router {
    let listing = listing::list_directory.with_state(Arc::new(ctx.clone()));
    let mut app = Router::new().fallback_service(ServeDir::new(&ctx.root).fallback(listing));

    if let Some(origin) = &ctx.cors_allow_origin {
        debug!("Adding Access-Control-Allow-Origin: {:?}", origin);
        app = app.layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            origin.clone(),
        ));
    }

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|_req: &Request<Body>| Span::none())
        .on_request(|req: &Request<Body>, _span: &Span| {
            info!("{} {}", req.method(), req.uri());
        })
        .on_response(())
        .on_failure(
            |class: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
                warn!("Request failed after {:?}: {}", latency, class);
            },
        );

    app.layer(trace_layer)
}

// --- Unit Tests ---
