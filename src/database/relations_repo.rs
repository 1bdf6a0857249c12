use sqlx::SqlitePool;

use crate::database::bind_placeholders;
use crate::models::OrganizationPhoneRow;

/// Building attached to an organization, keyed by the owning organization so
/// the service can group rows after one batch fetch.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrgBuildingRow {
    pub organization_id: i64,
    pub id: i64,
    pub address: String,
    pub latitude: i64,
    pub longitude: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrgActivityRow {
    pub organization_id: i64,
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub level: i64,
    pub created_at: String,
    pub updated_at: String,
}

pub async fn phones_for_organizations(
    pool: &SqlitePool,
    organization_ids: &[i64],
) -> sqlx::Result<Vec<OrganizationPhoneRow>> {
    if organization_ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        r#"
SELECT
  id,
  organization_id,
  phone_number,
  created_at,
  updated_at
FROM organization_phones
WHERE organization_id IN ({})
ORDER BY organization_id ASC, id ASC
"#,
        bind_placeholders(organization_ids.len())
    );

    let mut query = sqlx::query_as::<_, OrganizationPhoneRow>(&sql);
    for id in organization_ids {
        query = query.bind(id);
    }
    query.fetch_all(pool).await
}

pub async fn buildings_for_organizations(
    pool: &SqlitePool,
    organization_ids: &[i64],
) -> sqlx::Result<Vec<OrgBuildingRow>> {
    if organization_ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        r#"
SELECT
  bo.organization_id,
  b.id,
  b.address,
  b.latitude,
  b.longitude,
  b.created_at,
  b.updated_at
FROM building_organization bo
JOIN buildings b ON b.id = bo.building_id
WHERE bo.organization_id IN ({})
ORDER BY bo.organization_id ASC, b.id ASC
"#,
        bind_placeholders(organization_ids.len())
    );

    let mut query = sqlx::query_as::<_, OrgBuildingRow>(&sql);
    for id in organization_ids {
        query = query.bind(id);
    }
    query.fetch_all(pool).await
}

pub async fn activities_for_organizations(
    pool: &SqlitePool,
    organization_ids: &[i64],
) -> sqlx::Result<Vec<OrgActivityRow>> {
    if organization_ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        r#"
SELECT
  ao.organization_id,
  a.id,
  a.name,
  a.parent_id,
  a.level,
  a.created_at,
  a.updated_at
FROM activity_organization ao
JOIN activities a ON a.id = ao.activity_id
WHERE ao.organization_id IN ({})
ORDER BY ao.organization_id ASC, a.id ASC
"#,
        bind_placeholders(organization_ids.len())
    );

    let mut query = sqlx::query_as::<_, OrgActivityRow>(&sql);
    for id in organization_ids {
        query = query.bind(id);
    }
    query.fetch_all(pool).await
}
