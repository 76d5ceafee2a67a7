//! Administrative REST API over the sports-betting ledger.
//!
//! The binary in `main.rs` only wires configuration, logging and the pool;
//! everything reachable over HTTP is assembled by [`build_router`] so tests
//! can drive the same router in-process.

pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod repository;
pub mod state;

use axum::{
    http::Uri,
    routing::{delete, get, put, MethodRouter},
    Router,
};
use errors::AppError;
use handlers::resources;
use repository::{
    AuditRepository, BalanceChangeRepository, BetRepository, BookieRepository,
    CompetitionRepository, CreateRepository, CustomerRepository, CustomerStatsRepository,
    DeleteRepository, EventRepository, ResultRepository, SportRepository, TeamRepository,
    UpdateRepository,
};
use state::AppState;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// `GET` + `POST` on `/api/<plural>`
fn collection<R>() -> MethodRouter<AppState>
where
    R: CreateRepository + 'static,
{
    get(resources::list::<R>).post(resources::create::<R>)
}

/// `PUT` + `DELETE` on `/api/<plural>/:key`
fn member<R>() -> MethodRouter<AppState>
where
    R: UpdateRepository + DeleteRepository + 'static,
{
    put(resources::update::<R>).delete(resources::remove::<R>)
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/sports", collection::<SportRepository>())
        .route("/sports/:name", delete(resources::remove::<SportRepository>))
        .route("/teams", collection::<TeamRepository>())
        .route("/teams/:id", member::<TeamRepository>())
        .route("/competitions", collection::<CompetitionRepository>())
        .route("/competitions/:id", member::<CompetitionRepository>())
        .route("/events", collection::<EventRepository>())
        .route("/events/:id", member::<EventRepository>())
        .route("/results", collection::<ResultRepository>())
        .route("/results/:event_id", member::<ResultRepository>())
        .route("/customers", collection::<CustomerRepository>())
        .route("/customers/:id", member::<CustomerRepository>())
        .route("/bookies", collection::<BookieRepository>())
        .route("/bookies/:name", member::<BookieRepository>())
        .route("/bets", collection::<BetRepository>())
        .route("/bets/:id", member::<BetRepository>())
        .route("/balance_changes", collection::<BalanceChangeRepository>())
        .route("/audit", get(resources::list::<AuditRepository>))
        .route(
            "/customer_stats",
            get(resources::list::<CustomerStatsRepository>),
        )
        .fallback(unknown_route)
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::require_api_key,
        ))
}

/// Unmatched `/api/*` paths; mounted inside the gate so they need a key too.
async fn unknown_route(uri: Uri) -> AppError {
    AppError::not_found("Route", uri.path())
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Unauthenticated
        .route("/health", get(handlers::health::health_check))
        .route("/health/detailed", get(handlers::health::detailed_health))
        .route("/openapi.json", get(handlers::openapi::openapi))
        // Resources, behind the API key
        .nest("/api", api_routes(state.clone()))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}
