//! HTTP API Layer
//!
//! This crate provides the REST API of the training journal using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: request handlers per resource
//! - **Access**: owner / linked coach / admin checks
//! - **Services**: orchestration of domain logic and ports, including
//!   recompute-on-write of the progress report
//! - **Middleware**: authentication and audit logging
//! - **DTOs**: validated request bodies
//! - **Error Handling**: one JSON error taxonomy
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::from_store(config, store)?;
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod access;
pub mod services;
pub mod handlers;
pub mod dto;
pub mod auth;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_journal::{ExtractionPort, JournalPort, KeywordExtractor};
use domain_progress::ProgressPort;
use infra_store::{JournalRepository, KeyValueStore, ProgressRepository};

use crate::config::ApiConfig;
use crate::handlers::{entries, health, me, partners, progress, searches};
use crate::middleware::{audit_middleware, auth_middleware};
use crate::services::{JournalService, ProgressService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub journal: JournalService,
    pub progress: ProgressService,
}

impl AppState {
    /// Wires the services over explicit ports
    pub fn new(
        config: ApiConfig,
        journal: Arc<dyn JournalPort>,
        progress: Arc<dyn ProgressPort>,
        extractor: Arc<dyn ExtractionPort>,
    ) -> Result<Self, config::ConfigError> {
        config.validate()?;
        let timezone = config.timezone()?;
        let progress = ProgressService::new(
            journal.clone(),
            progress,
            timezone,
            config.evidence_threshold,
        );
        let journal = JournalService::new(
            journal,
            extractor,
            progress.clone(),
            timezone,
            config.max_page_size,
        );
        Ok(Self {
            config,
            journal,
            progress,
        })
    }

    /// Repositories over one store plus the keyword extractor
    pub fn from_store(config: ApiConfig, store: Arc<dyn KeyValueStore>) -> Result<Self, config::ConfigError> {
        Self::new(
            config,
            Arc::new(JournalRepository::new(store.clone())),
            Arc::new(ProgressRepository::new(store)),
            Arc::new(KeywordExtractor::new()),
        )
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Everything scoped to one athlete
    let athlete_routes = Router::new()
        .route("/coaches", post(me::link_coach).get(me::list_coaches))
        .route("/coaches/:coach", delete(me::unlink_coach))
        .route("/entries", post(entries::create_entry).get(entries::list_entries))
        .route(
            "/entries/:entry",
            get(entries::get_entry)
                .put(entries::update_entry)
                .delete(entries::delete_entry),
        )
        .route("/entries/:entry/extract", post(entries::extract_entry))
        .route(
            "/entries/:entry/comments",
            post(entries::create_comment).get(entries::list_comments),
        )
        .route(
            "/entries/:entry/comments/:comment",
            delete(entries::delete_comment),
        )
        .route("/partners", post(partners::create_partner).get(partners::list_partners))
        .route(
            "/partners/:partner",
            get(partners::get_partner)
                .put(partners::update_partner)
                .delete(partners::delete_partner),
        )
        .route("/searches", post(searches::create_search).get(searches::list_searches))
        .route(
            "/searches/:search",
            get(searches::get_search).delete(searches::delete_search),
        )
        .route("/searches/:search/results", get(searches::search_results))
        .route(
            "/checkoffs",
            post(progress::create_checkoff).get(progress::list_checkoffs),
        )
        .route("/checkoffs/:checkoff", get(progress::get_checkoff))
        .route("/checkoffs/:checkoff/evidence", post(progress::submit_evidence))
        .route(
            "/checkoffs/:checkoff/evidence/:evidence/review",
            put(progress::review_evidence),
        )
        .route(
            "/annotations",
            post(progress::create_annotation).get(progress::list_annotations),
        )
        .route(
            "/annotations/:annotation",
            delete(progress::delete_annotation),
        )
        .route("/progress", get(progress::progress_report));

    // Protected API routes
    let api_routes = Router::new()
        .route("/me", get(me::me))
        .route("/coaches/me/athletes", get(me::my_athletes))
        .nest("/athletes/:athlete", athlete_routes)
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes; every response carries an x-request-id
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
