use sqlx::SqlitePool;

const SCHEMA: &[&str] = &[
    "PRAGMA foreign_keys = ON",
    r#"
CREATE TABLE IF NOT EXISTS organizations (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL,
  created_at TEXT NOT NULL DEFAULT (datetime('now')),
  updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS buildings (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  address TEXT NOT NULL,
  latitude INTEGER NOT NULL,
  longitude INTEGER NOT NULL,
  created_at TEXT NOT NULL DEFAULT (datetime('now')),
  updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS activities (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL,
  parent_id INTEGER REFERENCES activities(id),
  level INTEGER NOT NULL,
  created_at TEXT NOT NULL DEFAULT (datetime('now')),
  updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS organization_phones (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  organization_id INTEGER NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
  phone_number TEXT NOT NULL,
  created_at TEXT NOT NULL DEFAULT (datetime('now')),
  updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS building_organization (
  building_id INTEGER NOT NULL REFERENCES buildings(id) ON DELETE CASCADE,
  organization_id INTEGER NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
  PRIMARY KEY (building_id, organization_id)
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS activity_organization (
  activity_id INTEGER NOT NULL REFERENCES activities(id) ON DELETE CASCADE,
  organization_id INTEGER NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
  PRIMARY KEY (activity_id, organization_id)
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_activities_parent_id ON activities(parent_id)",
    "CREATE INDEX IF NOT EXISTS idx_buildings_coords ON buildings(latitude, longitude)",
    "CREATE INDEX IF NOT EXISTS idx_organization_phones_org ON organization_phones(organization_id)",
    "CREATE INDEX IF NOT EXISTS idx_building_organization_org ON building_organization(organization_id)",
    "CREATE INDEX IF NOT EXISTS idx_activity_organization_org ON activity_organization(organization_id)",
];

/// Creates all tables and indexes. Safe to run on an existing database.
pub async fn create_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
