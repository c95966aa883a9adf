/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod authorization;
pub mod endpoints;
pub mod error;


use axum::routing::{get, patch, post};
use axum::{Router, middleware};
use gigsly_core::types::ServerState;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderValue, Method};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use endpoints::*;

pub fn cors_layer(state: &ServerState) -> CorsLayer {
    let allow_origin = match HeaderValue::from_str(&state.cli.serve_url) {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(_) => {
            tracing::warn!(
                "Invalid serve url {}, allowing any origin",
                state.cli.serve_url
            );
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
}

pub fn create_router(state: Arc<ServerState>) -> Router {
    let protected = Router::new()
        .route("/api/users", patch(users::patch_user))
        .route("/api/tasks", post(tasks::post_task))
        .route("/api/tasks/{task}/complete", post(tasks::post_task_complete))
        .route("/api/applications", post(applications::post_application))
        .route(
            "/api/applications/{application}/accept",
            post(applications::post_application_accept),
        )
        .route(
            "/api/applications/{application}/withdraw",
            post(applications::post_application_withdraw),
        )
        .route("/api/reviews", post(reviews::post_review))
        .route(
            "/api/withdrawals",
            get(withdrawals::get_withdrawals).post(withdrawals::post_withdrawal),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            authorization::authorize,
        ));

    let public = Router::new()
        .route("/api/health", get(get_health))
        .route("/api/categories", get(get_categories))
        .route("/api/send-otp", post(auth::post_send_otp))
        .route("/api/verify-otp", post(auth::post_verify_otp))
        .route("/api/users", get(users::get_users).post(users::post_user))
        .route("/api/users/{user}", get(users::get_user))
        .route("/api/users/{user}/rating", get(users::get_user_rating))
        .route("/api/tasks", get(tasks::get_tasks))
        .route("/api/tasks/{task}", get(tasks::get_task))
        .route("/api/applications", get(applications::get_applications))
        .route("/api/reviews", get(reviews::get_reviews));

    Router::new()
        .merge(protected)
        .merge(public)
        .fallback(handle_404)
        .with_state(state)
}

pub async fn serve_web(state: Arc<ServerState>) -> std::io::Result<()> {
    let server_url = format!("{}:{}", state.cli.ip, state.cli.port);

    let app = create_router(Arc::clone(&state)).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&state)),
    );

    let listener = tokio::net::TcpListener::bind(&server_url).await?;
    tracing::info!("Listening on {}", server_url);

    axum::serve(listener, app).await
}
