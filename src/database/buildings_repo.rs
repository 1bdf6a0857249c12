use sqlx::SqlitePool;

use crate::models::{BuildingCoordRow, BuildingWithCountRow};

const SQL_LIST_WITH_COUNTS: &str = r#"
SELECT
  b.id,
  b.address,
  b.latitude,
  b.longitude,
  b.created_at,
  b.updated_at,
  (SELECT COUNT(*) FROM building_organization bo WHERE bo.building_id = b.id) AS organizations_count
FROM buildings b
ORDER BY b.id ASC
"#;

pub async fn list_with_counts(pool: &SqlitePool) -> sqlx::Result<Vec<BuildingWithCountRow>> {
    sqlx::query_as::<_, BuildingWithCountRow>(SQL_LIST_WITH_COUNTS)
        .fetch_all(pool)
        .await
}

const SQL_LOAD_WITH_COUNTS: &str = r#"
SELECT
  b.id,
  b.address,
  b.latitude,
  b.longitude,
  b.created_at,
  b.updated_at,
  (SELECT COUNT(*) FROM building_organization bo WHERE bo.building_id = b.id) AS organizations_count
FROM buildings b
WHERE b.id = ?
LIMIT 1
"#;

pub async fn load_with_counts(
    pool: &SqlitePool,
    id: i64,
) -> sqlx::Result<Option<BuildingWithCountRow>> {
    sqlx::query_as::<_, BuildingWithCountRow>(SQL_LOAD_WITH_COUNTS)
        .bind(id)
        .fetch_optional(pool)
        .await
}

const SQL_LIST_COORDS_IN_BOX: &str = r#"
SELECT
  id,
  latitude,
  longitude
FROM buildings
WHERE latitude BETWEEN ? AND ?
  AND longitude BETWEEN ? AND ?
ORDER BY id ASC
"#;

/// Candidate scan for the radius search; bounds are fixed-point coordinates.
pub async fn list_coords_in_box(
    pool: &SqlitePool,
    min_lat: i64,
    max_lat: i64,
    min_lon: i64,
    max_lon: i64,
) -> sqlx::Result<Vec<BuildingCoordRow>> {
    sqlx::query_as::<_, BuildingCoordRow>(SQL_LIST_COORDS_IN_BOX)
        .bind(min_lat)
        .bind(max_lat)
        .bind(min_lon)
        .bind(max_lon)
        .fetch_all(pool)
        .await
}

const SQL_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM buildings WHERE id = ?)";

pub async fn exists(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let found: i64 = sqlx::query_scalar(SQL_EXISTS)
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(found != 0)
}
