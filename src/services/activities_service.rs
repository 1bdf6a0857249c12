use std::collections::HashMap;

use serde::Serialize;
use sqlx::SqlitePool;

use crate::database::activities_repo;
use crate::error::CatalogError;
use crate::models::{ActivityRow, ActivityWithCountsRow};
use crate::services::hierarchy::{self, PathNode};
use crate::services::name_matches;

/// Depth the seed data sticks to. A data convention, not a structural
/// limit; every traversal here works at arbitrary depth.
pub const MAX_LEVEL: i64 = 3;

#[derive(Debug, Default, Clone)]
pub struct ActivityFilters {
    /// `Some(0)` selects roots; a positive id selects direct children.
    pub parent_id: Option<i64>,
    pub level: Option<i64>,
    pub name: Option<String>,
}

pub async fn list_activities(
    pool: &SqlitePool,
    filters: &ActivityFilters,
) -> Result<Vec<ActivityWithCountsRow>, CatalogError> {
    let rows = activities_repo::list_with_counts(pool, filters.parent_id, filters.level).await?;
    let rows = match filters.name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(needle) => rows
            .into_iter()
            .filter(|row| name_matches(&row.name, needle))
            .collect(),
        None => rows,
    };
    Ok(rows)
}

#[derive(Debug, Serialize)]
pub struct ActivityTreeNode {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub level: i64,
    pub created_at: String,
    pub updated_at: String,
    pub organizations_count: i64,
    pub children_count: i64,
    pub children: Vec<ActivityTreeNode>,
}

/// Root activities with their subtrees attached, from one bulk fetch.
/// `depth` bounds how many child levels are attached; `None` means the
/// whole tree. Nodes are consumed as they are placed, so a cyclic
/// `parent_id` chain cannot recurse forever.
pub async fn activity_tree(
    pool: &SqlitePool,
    depth: Option<i64>,
) -> Result<Vec<ActivityTreeNode>, CatalogError> {
    let rows = activities_repo::list_with_counts(pool, None, None).await?;
    Ok(build_tree(rows, depth))
}

fn build_tree(rows: Vec<ActivityWithCountsRow>, depth: Option<i64>) -> Vec<ActivityTreeNode> {
    let mut children_of: HashMap<i64, Vec<i64>> = HashMap::new();
    let mut roots: Vec<i64> = Vec::new();
    for row in &rows {
        match row.parent_id {
            Some(parent_id) => children_of.entry(parent_id).or_default().push(row.id),
            None => roots.push(row.id),
        }
    }

    let mut nodes: HashMap<i64, ActivityWithCountsRow> =
        rows.into_iter().map(|row| (row.id, row)).collect();

    roots
        .into_iter()
        .filter_map(|id| assemble(id, &mut nodes, &children_of, depth))
        .collect()
}

fn assemble(
    id: i64,
    nodes: &mut HashMap<i64, ActivityWithCountsRow>,
    children_of: &HashMap<i64, Vec<i64>>,
    depth_left: Option<i64>,
) -> Option<ActivityTreeNode> {
    // Removing the node doubles as the visited set.
    let row = nodes.remove(&id)?;

    let children = if depth_left == Some(0) {
        Vec::new()
    } else {
        let next_depth = depth_left.map(|d| d - 1);
        children_of
            .get(&id)
            .map(|child_ids| {
                child_ids
                    .iter()
                    .filter_map(|child_id| assemble(*child_id, nodes, children_of, next_depth))
                    .collect()
            })
            .unwrap_or_default()
    };

    Some(ActivityTreeNode {
        id: row.id,
        name: row.name,
        parent_id: row.parent_id,
        level: row.level,
        created_at: row.created_at,
        updated_at: row.updated_at,
        organizations_count: row.organizations_count,
        children_count: row.children_count,
        children,
    })
}

#[derive(Debug, Serialize)]
pub struct ActivityDetailView {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub level: i64,
    pub created_at: String,
    pub updated_at: String,
    pub organizations_count: i64,
    pub children_count: i64,
    pub parent: Option<ActivityRow>,
    pub children: Vec<ActivityRow>,
    /// Root-first chain down to this activity, itself included.
    pub path: Vec<PathNode>,
}

pub async fn load_activity_detail(
    pool: &SqlitePool,
    id: i64,
) -> Result<ActivityDetailView, CatalogError> {
    let Some(row) = activities_repo::load_with_counts(pool, id).await? else {
        return Err(CatalogError::ActivityNotFound);
    };

    let parent = match row.parent_id {
        Some(parent_id) => activities_repo::list_by_ids(pool, &[parent_id])
            .await?
            .into_iter()
            .next(),
        None => None,
    };
    let children = activities_repo::children_of(pool, id).await?;

    let links = activities_repo::list_hierarchy(pool).await?;
    let path = hierarchy::ancestor_path(&links, id);

    Ok(ActivityDetailView {
        id: row.id,
        name: row.name,
        parent_id: row.parent_id,
        level: row.level,
        created_at: row.created_at,
        updated_at: row.updated_at,
        organizations_count: row.organizations_count,
        children_count: row.children_count,
        parent,
        children,
        path,
    })
}

pub async fn activity_exists(pool: &SqlitePool, id: i64) -> Result<bool, CatalogError> {
    Ok(activities_repo::exists(pool, id).await?)
}
