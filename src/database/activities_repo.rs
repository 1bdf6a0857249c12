use sqlx::SqlitePool;

use crate::database::bind_placeholders;
use crate::models::{ActivityLinkRow, ActivityRow, ActivityWithCountsRow};

const SQL_LIST_HIERARCHY: &str = r#"
SELECT
  id,
  name,
  parent_id,
  level
FROM activities
ORDER BY id ASC
"#;

/// The whole taxonomy in one fetch; traversals run in memory against this.
pub async fn list_hierarchy(pool: &SqlitePool) -> sqlx::Result<Vec<ActivityLinkRow>> {
    sqlx::query_as::<_, ActivityLinkRow>(SQL_LIST_HIERARCHY)
        .fetch_all(pool)
        .await
}

const SQL_LIST_WITH_COUNTS: &str = r#"
SELECT
  a.id,
  a.name,
  a.parent_id,
  a.level,
  a.created_at,
  a.updated_at,
  (SELECT COUNT(*) FROM activity_organization ao WHERE ao.activity_id = a.id) AS organizations_count,
  (SELECT COUNT(*) FROM activities c WHERE c.parent_id = a.id) AS children_count
FROM activities a
WHERE (
    ? IS NULL
    OR (CASE WHEN ? = 0 THEN a.parent_id IS NULL ELSE a.parent_id = ? END)
  )
  AND (? IS NULL OR a.level = ?)
ORDER BY a.id ASC
"#;

/// `parent_id = Some(0)` selects root activities (no parent).
pub async fn list_with_counts(
    pool: &SqlitePool,
    parent_id: Option<i64>,
    level: Option<i64>,
) -> sqlx::Result<Vec<ActivityWithCountsRow>> {
    sqlx::query_as::<_, ActivityWithCountsRow>(SQL_LIST_WITH_COUNTS)
        .bind(parent_id)
        .bind(parent_id)
        .bind(parent_id)
        .bind(level)
        .bind(level)
        .fetch_all(pool)
        .await
}

const SQL_LOAD_WITH_COUNTS: &str = r#"
SELECT
  a.id,
  a.name,
  a.parent_id,
  a.level,
  a.created_at,
  a.updated_at,
  (SELECT COUNT(*) FROM activity_organization ao WHERE ao.activity_id = a.id) AS organizations_count,
  (SELECT COUNT(*) FROM activities c WHERE c.parent_id = a.id) AS children_count
FROM activities a
WHERE a.id = ?
LIMIT 1
"#;

pub async fn load_with_counts(
    pool: &SqlitePool,
    id: i64,
) -> sqlx::Result<Option<ActivityWithCountsRow>> {
    sqlx::query_as::<_, ActivityWithCountsRow>(SQL_LOAD_WITH_COUNTS)
        .bind(id)
        .fetch_optional(pool)
        .await
}

const SQL_CHILDREN_OF: &str = r#"
SELECT
  id,
  name,
  parent_id,
  level,
  created_at,
  updated_at
FROM activities
WHERE parent_id = ?
ORDER BY id ASC
"#;

pub async fn children_of(pool: &SqlitePool, id: i64) -> sqlx::Result<Vec<ActivityRow>> {
    sqlx::query_as::<_, ActivityRow>(SQL_CHILDREN_OF)
        .bind(id)
        .fetch_all(pool)
        .await
}

pub async fn list_by_ids(pool: &SqlitePool, ids: &[i64]) -> sqlx::Result<Vec<ActivityRow>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        r#"
SELECT
  id,
  name,
  parent_id,
  level,
  created_at,
  updated_at
FROM activities
WHERE id IN ({})
ORDER BY id ASC
"#,
        bind_placeholders(ids.len())
    );

    let mut query = sqlx::query_as::<_, ActivityRow>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    query.fetch_all(pool).await
}

const SQL_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM activities WHERE id = ?)";

pub async fn exists(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let found: i64 = sqlx::query_scalar(SQL_EXISTS)
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(found != 0)
}
