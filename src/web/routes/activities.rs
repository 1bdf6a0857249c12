use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::services::activities_service::{self, ActivityFilters, MAX_LEVEL};
use crate::web::error::{ApiError, FieldErrors};
use crate::web::{params, AppState};

#[derive(Debug, Deserialize, Default)]
pub struct ActivitiesQuery {
    parent_id: Option<String>,
    level: Option<String>,
    name: Option<String>,
}

pub async fn activities_handler(
    State(state): State<AppState>,
    Query(query): Query<ActivitiesQuery>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = FieldErrors::default();
    let parent_id = params::opt_i64(&mut errors, "parent_id", query.parent_id.as_ref());
    let level = params::opt_i64(&mut errors, "level", query.level.as_ref());

    match parent_id {
        Some(id) if id < 0 => errors.push("parent_id", "must be at least 0"),
        Some(id) if id > 0 => {
            if !activities_service::activity_exists(&state.pool, id).await? {
                errors.push("parent_id", "does not exist");
            }
        }
        _ => {}
    }
    if let Some(level) = level {
        if !(0..=MAX_LEVEL).contains(&level) {
            errors.push("level", format!("must be between 0 and {MAX_LEVEL}"));
        }
    }
    errors.into_result()?;

    let filters = ActivityFilters {
        parent_id,
        level,
        name: query.name.clone(),
    };
    let activities = activities_service::list_activities(&state.pool, &filters).await?;
    let total = activities.len();

    Ok(Json(json!({
        "success": true,
        "data": activities,
        "meta": {
            "total": total,
            "max_level": MAX_LEVEL,
        },
    })))
}

#[derive(Debug, Deserialize, Default)]
pub struct ActivityTreeQuery {
    depth: Option<String>,
}

pub async fn activities_tree_handler(
    State(state): State<AppState>,
    Query(query): Query<ActivityTreeQuery>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = FieldErrors::default();
    let depth = params::opt_i64(&mut errors, "depth", query.depth.as_ref());
    if let Some(depth) = depth {
        if depth < 1 {
            errors.push("depth", "must be at least 1");
        }
    }
    errors.into_result()?;

    let tree = activities_service::activity_tree(&state.pool, depth).await?;
    let total = tree.len();

    Ok(Json(json!({
        "success": true,
        "data": tree,
        "meta": {
            "total": total,
            "max_level": MAX_LEVEL,
        },
    })))
}

pub async fn activity_detail_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let Ok(id) = id.parse::<i64>() else {
        return Err(ApiError::activity_not_found());
    };

    let detail = activities_service::load_activity_detail(&state.pool, id).await?;
    Ok(Json(json!({
        "success": true,
        "data": detail,
    })))
}
