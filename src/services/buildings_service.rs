use sqlx::SqlitePool;

use crate::database::buildings_repo;
use crate::error::CatalogError;
use crate::models::BuildingWithCountRow;
use crate::services::name_matches;
use crate::services::pagination::{paginate, Page, PageParams};

pub async fn list_buildings(
    pool: &SqlitePool,
    address: Option<&str>,
    params: PageParams,
) -> Result<Page<BuildingWithCountRow>, CatalogError> {
    let rows = buildings_repo::list_with_counts(pool).await?;
    let rows = match address.map(str::trim).filter(|s| !s.is_empty()) {
        Some(needle) => rows
            .into_iter()
            .filter(|row| name_matches(&row.address, needle))
            .collect(),
        None => rows,
    };
    Ok(paginate(rows, params))
}

pub async fn load_building_detail(
    pool: &SqlitePool,
    id: i64,
) -> Result<BuildingWithCountRow, CatalogError> {
    buildings_repo::load_with_counts(pool, id)
        .await?
        .ok_or(CatalogError::BuildingNotFound)
}

pub async fn building_exists(pool: &SqlitePool, id: i64) -> Result<bool, CatalogError> {
    Ok(buildings_repo::exists(pool, id).await?)
}
