use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::services::organizations_service::{
    self, BoundsQuery, OrganizationFilters, RadiusQuery,
};
use crate::services::{activities_service, buildings_service};
use crate::web::error::{ApiError, FieldErrors};
use crate::web::{params, AppState};

#[derive(Debug, Deserialize, Default)]
pub struct OrganizationsQuery {
    building_id: Option<String>,
    activity_id: Option<String>,
    name: Option<String>,
    page: Option<String>,
    per_page: Option<String>,
}

pub async fn organizations_handler(
    State(state): State<AppState>,
    Query(query): Query<OrganizationsQuery>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = FieldErrors::default();
    let building_id = params::opt_i64(&mut errors, "building_id", query.building_id.as_ref());
    let activity_id = params::opt_i64(&mut errors, "activity_id", query.activity_id.as_ref());
    let page_params = params::page_params(
        &mut errors,
        &state.config,
        query.page.as_ref(),
        query.per_page.as_ref(),
    );

    if let Some(id) = building_id {
        if !buildings_service::building_exists(&state.pool, id).await? {
            errors.push("building_id", "does not exist");
        }
    }
    if let Some(id) = activity_id {
        if !activities_service::activity_exists(&state.pool, id).await? {
            errors.push("activity_id", "does not exist");
        }
    }
    errors.into_result()?;

    let filters = OrganizationFilters {
        building_id,
        activity_id,
        name: query.name.clone(),
    };
    let page = organizations_service::list_organizations(&state.pool, &filters, page_params).await?;

    Ok(Json(json!({
        "success": true,
        "data": page.items,
        "meta": {
            "current_page": page.current_page,
            "per_page": page.per_page,
            "total": page.total,
            "last_page": page.last_page,
            "from": page.from,
            "to": page.to,
        },
    })))
}

pub async fn organization_detail_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let Ok(id) = id.parse::<i64>() else {
        return Err(ApiError::organization_not_found());
    };

    let detail = organizations_service::load_organization_detail(&state.pool, id).await?;
    Ok(Json(json!({
        "success": true,
        "data": detail,
    })))
}

#[derive(Debug, Deserialize, Default)]
pub struct GeoRadiusQuery {
    latitude: Option<String>,
    longitude: Option<String>,
    radius: Option<String>,
    activity_id: Option<String>,
    name: Option<String>,
    page: Option<String>,
    per_page: Option<String>,
}

pub async fn geo_radius_handler(
    State(state): State<AppState>,
    Query(query): Query<GeoRadiusQuery>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = FieldErrors::default();
    let latitude = params::req_range_f64(&mut errors, "latitude", query.latitude.as_ref(), -90.0, 90.0);
    let longitude =
        params::req_range_f64(&mut errors, "longitude", query.longitude.as_ref(), -180.0, 180.0);
    let radius = params::req_range_i64(&mut errors, "radius", query.radius.as_ref(), 100, 50_000);
    let activity_id = params::opt_i64(&mut errors, "activity_id", query.activity_id.as_ref());
    let page_params = params::page_params(
        &mut errors,
        &state.config,
        query.page.as_ref(),
        query.per_page.as_ref(),
    );

    if let Some(id) = activity_id {
        if !activities_service::activity_exists(&state.pool, id).await? {
            errors.push("activity_id", "does not exist");
        }
    }
    errors.into_result()?;

    let (Some(latitude), Some(longitude), Some(radius)) = (latitude, longitude, radius) else {
        return Err(ApiError::Internal);
    };

    let filters = OrganizationFilters {
        building_id: None,
        activity_id,
        name: query.name.clone(),
    };
    let radius_query = RadiusQuery {
        latitude,
        longitude,
        radius_m: radius as f64,
    };
    let page =
        organizations_service::radius_search(&state.pool, radius_query, &filters, page_params)
            .await?;

    Ok(Json(json!({
        "success": true,
        "data": page.items,
        "meta": {
            "current_page": page.current_page,
            "per_page": page.per_page,
            "total": page.total,
            "search_params": {
                "center": {
                    "latitude": latitude,
                    "longitude": longitude,
                },
                "radius_meters": radius,
            },
        },
    })))
}

#[derive(Debug, Deserialize, Default)]
pub struct GeoBoundsQuery {
    min_lat: Option<String>,
    max_lat: Option<String>,
    min_lon: Option<String>,
    max_lon: Option<String>,
    activity_id: Option<String>,
    name: Option<String>,
    page: Option<String>,
    per_page: Option<String>,
}

pub async fn geo_bounds_handler(
    State(state): State<AppState>,
    Query(query): Query<GeoBoundsQuery>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = FieldErrors::default();
    let min_lat = params::req_range_f64(&mut errors, "min_lat", query.min_lat.as_ref(), -90.0, 90.0);
    let max_lat = params::req_range_f64(&mut errors, "max_lat", query.max_lat.as_ref(), -90.0, 90.0);
    let min_lon =
        params::req_range_f64(&mut errors, "min_lon", query.min_lon.as_ref(), -180.0, 180.0);
    let max_lon =
        params::req_range_f64(&mut errors, "max_lon", query.max_lon.as_ref(), -180.0, 180.0);
    let activity_id = params::opt_i64(&mut errors, "activity_id", query.activity_id.as_ref());
    let page_params = params::page_params(
        &mut errors,
        &state.config,
        query.page.as_ref(),
        query.per_page.as_ref(),
    );

    if let Some(id) = activity_id {
        if !activities_service::activity_exists(&state.pool, id).await? {
            errors.push("activity_id", "does not exist");
        }
    }
    errors.into_result()?;

    let (Some(min_lat), Some(max_lat), Some(min_lon), Some(max_lon)) =
        (min_lat, max_lat, min_lon, max_lon)
    else {
        return Err(ApiError::Internal);
    };

    let filters = OrganizationFilters {
        building_id: None,
        activity_id,
        name: query.name.clone(),
    };
    let bounds = BoundsQuery {
        min_lat,
        max_lat,
        min_lon,
        max_lon,
    };
    let page = organizations_service::bounds_search(&state.pool, bounds, &filters, page_params)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": page.items,
        "meta": {
            "current_page": page.current_page,
            "per_page": page.per_page,
            "total": page.total,
            "search_params": {
                "bounds": {
                    "southwest": {
                        "latitude": min_lat,
                        "longitude": min_lon,
                    },
                    "northeast": {
                        "latitude": max_lat,
                        "longitude": max_lon,
                    },
                },
            },
        },
    })))
}
