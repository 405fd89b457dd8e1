//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the auth proxy endpoints and stitches them with Leptos
//! SSR rendering under a single Axum router. The route gate wraps everything;
//! it skips `/api` and asset paths on its own.

pub mod auth;
pub mod error;
pub mod gate;
pub mod users;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Auth proxy API shared by the SSR app and the API-only fallback.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/users/{id}/profile", get(users::user_profile))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// API-only router with the route gate, used when Leptos is not configured.
pub fn app(state: AppState) -> Router {
    api_routes(state)
        .fallback(not_found)
        .layer(from_fn(gate::route_gate))
        .layer(TraceLayer::new_for_http())
}

/// Leptos SSR frontend: API routes + SSR pages + `/pkg` assets, all gated.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded (missing
/// `LEPTOS_*` environment or `[package.metadata.leptos]` section).
pub fn leptos_app(state: AppState) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| format!("leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());

    Ok(api_routes(state)
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg")))
        .fallback(not_found)
        .layer(from_fn(gate::route_gate))
        .layer(TraceLayer::new_for_http()))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
