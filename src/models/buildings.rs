use serde::Serialize;

/// Coordinates are fixed-point integers: decimal degrees times 10_000_000.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BuildingRow {
    pub id: i64,
    pub address: String,
    pub latitude: i64,
    pub longitude: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BuildingWithCountRow {
    pub id: i64,
    pub address: String,
    pub latitude: i64,
    pub longitude: i64,
    pub created_at: String,
    pub updated_at: String,
    pub organizations_count: i64,
}

/// Narrow row for the radius-search candidate scan.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BuildingCoordRow {
    pub id: i64,
    pub latitude: i64,
    pub longitude: i64,
}
