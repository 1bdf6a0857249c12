use sqlx::SqlitePool;

use crate::database::bind_placeholders;
use crate::models::OrganizationRow;

const SQL_LOAD_BY_ID: &str = r#"
SELECT
  id,
  name,
  created_at,
  updated_at
FROM organizations
WHERE id = ?
LIMIT 1
"#;

pub async fn load_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<OrganizationRow>> {
    sqlx::query_as::<_, OrganizationRow>(SQL_LOAD_BY_ID)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Listing query for the catalog. `activity_ids` is the already-expanded
/// descendant set; an organization matches when it is tagged with any of
/// them. Name matching happens in the service layer, not here.
pub async fn list_filtered(
    pool: &SqlitePool,
    building_id: Option<i64>,
    activity_ids: Option<&[i64]>,
) -> sqlx::Result<Vec<OrganizationRow>> {
    let mut sql = String::from(
        r#"
SELECT
  o.id,
  o.name,
  o.created_at,
  o.updated_at
FROM organizations o
WHERE (
    ? IS NULL
    OR EXISTS (
      SELECT 1 FROM building_organization bo
      WHERE bo.organization_id = o.id AND bo.building_id = ?
    )
  )
"#,
    );
    push_activity_predicate(&mut sql, activity_ids);
    sql.push_str("ORDER BY o.id ASC");

    let mut query = sqlx::query_as::<_, OrganizationRow>(&sql)
        .bind(building_id)
        .bind(building_id);
    if let Some(ids) = activity_ids {
        for id in ids {
            query = query.bind(id);
        }
    }
    query.fetch_all(pool).await
}

/// Organizations linked to at least one of the given buildings. Used by the
/// radius search after the exact distance test has picked the buildings.
pub async fn list_by_building_ids(
    pool: &SqlitePool,
    building_ids: &[i64],
    activity_ids: Option<&[i64]>,
) -> sqlx::Result<Vec<OrganizationRow>> {
    if building_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut sql = format!(
        r#"
SELECT DISTINCT
  o.id,
  o.name,
  o.created_at,
  o.updated_at
FROM organizations o
JOIN building_organization bo ON bo.organization_id = o.id
WHERE bo.building_id IN ({})
"#,
        bind_placeholders(building_ids.len())
    );
    push_activity_predicate(&mut sql, activity_ids);
    sql.push_str("ORDER BY o.id ASC");

    let mut query = sqlx::query_as::<_, OrganizationRow>(&sql);
    for id in building_ids {
        query = query.bind(id);
    }
    if let Some(ids) = activity_ids {
        for id in ids {
            query = query.bind(id);
        }
    }
    query.fetch_all(pool).await
}

/// Organizations with at least one building inside the fixed-point
/// bounding box, range-inclusive on both axes.
pub async fn list_in_bounds(
    pool: &SqlitePool,
    min_lat: i64,
    max_lat: i64,
    min_lon: i64,
    max_lon: i64,
    activity_ids: Option<&[i64]>,
) -> sqlx::Result<Vec<OrganizationRow>> {
    let mut sql = String::from(
        r#"
SELECT
  o.id,
  o.name,
  o.created_at,
  o.updated_at
FROM organizations o
WHERE EXISTS (
    SELECT 1
    FROM building_organization bo
    JOIN buildings b ON b.id = bo.building_id
    WHERE bo.organization_id = o.id
      AND b.latitude BETWEEN ? AND ?
      AND b.longitude BETWEEN ? AND ?
  )
"#,
    );
    push_activity_predicate(&mut sql, activity_ids);
    sql.push_str("ORDER BY o.id ASC");

    let mut query = sqlx::query_as::<_, OrganizationRow>(&sql)
        .bind(min_lat)
        .bind(max_lat)
        .bind(min_lon)
        .bind(max_lon);
    if let Some(ids) = activity_ids {
        for id in ids {
            query = query.bind(id);
        }
    }
    query.fetch_all(pool).await
}

fn push_activity_predicate(sql: &mut String, activity_ids: Option<&[i64]>) {
    match activity_ids {
        Some(ids) if !ids.is_empty() => {
            sql.push_str(&format!(
                r#"  AND EXISTS (
    SELECT 1 FROM activity_organization ao
    WHERE ao.organization_id = o.id AND ao.activity_id IN ({})
  )
"#,
                bind_placeholders(ids.len())
            ));
        }
        Some(_) => {
            sql.push_str("  AND 1 = 0\n");
        }
        None => {}
    }
}
