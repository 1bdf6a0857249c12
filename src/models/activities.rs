use serde::Serialize;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ActivityRow {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub level: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ActivityWithCountsRow {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub level: i64,
    pub created_at: String,
    pub updated_at: String,
    pub organizations_count: i64,
    pub children_count: i64,
}

/// One bulk fetch of these rows backs every hierarchy traversal (descendant
/// expansion, ancestor paths, the tree endpoint).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActivityLinkRow {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub level: i64,
}
