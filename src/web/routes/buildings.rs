use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::services::buildings_service;
use crate::web::error::{ApiError, FieldErrors};
use crate::web::{params, AppState};

#[derive(Debug, Deserialize, Default)]
pub struct BuildingsQuery {
    address: Option<String>,
    page: Option<String>,
    per_page: Option<String>,
}

pub async fn buildings_handler(
    State(state): State<AppState>,
    Query(query): Query<BuildingsQuery>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = FieldErrors::default();
    let page_params = params::page_params(
        &mut errors,
        &state.config,
        query.page.as_ref(),
        query.per_page.as_ref(),
    );
    errors.into_result()?;

    let page =
        buildings_service::list_buildings(&state.pool, query.address.as_deref(), page_params)
            .await?;

    Ok(Json(json!({
        "success": true,
        "data": page.items,
        "meta": {
            "current_page": page.current_page,
            "per_page": page.per_page,
            "total": page.total,
            "last_page": page.last_page,
        },
    })))
}

pub async fn building_detail_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let Ok(id) = id.parse::<i64>() else {
        return Err(ApiError::building_not_found());
    };

    let building = buildings_service::load_building_detail(&state.pool, id).await?;
    Ok(Json(json!({
        "success": true,
        "data": building,
    })))
}
