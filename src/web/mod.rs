pub mod error;
pub mod middleware;
pub mod params;
pub mod routes;

use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use sqlx::SqlitePool;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use routes::{activities, buildings, organizations};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<AppConfig>,
}

/// All API routes under `/api`, every one behind the key gate.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/organizations", get(organizations::organizations_handler))
        .route(
            "/organizations/geo/radius",
            get(organizations::geo_radius_handler),
        )
        .route(
            "/organizations/geo/bounds",
            get(organizations::geo_bounds_handler),
        )
        .route(
            "/organizations/:id",
            get(organizations::organization_detail_handler),
        )
        .route("/buildings", get(buildings::buildings_handler))
        .route("/buildings/:id", get(buildings::building_detail_handler))
        .route("/activities", get(activities::activities_handler))
        .route("/activities/tree", get(activities::activities_tree_handler))
        .route("/activities/:id", get(activities::activity_detail_handler))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::api_key::require_api_key,
        ));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
