use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use sqlx::SqlitePool;

use crate::database::relations_repo::{OrgActivityRow, OrgBuildingRow};
use crate::database::{activities_repo, buildings_repo, organizations_repo, relations_repo};
use crate::error::CatalogError;
use crate::models::{ActivityRow, BuildingRow, OrganizationPhoneRow, OrganizationRow};
use crate::services::pagination::{paginate, Page, PageParams};
use crate::services::{geo, hierarchy, name_matches};

#[derive(Debug, Default, Clone)]
pub struct OrganizationFilters {
    pub building_id: Option<i64>,
    /// Expanded to the whole descendant set before querying.
    pub activity_id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct RadiusQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct BoundsQuery {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

#[derive(Debug, Serialize)]
pub struct ActivityRefView {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub level: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Listing item: the organization with its relations attached.
#[derive(Debug, Serialize)]
pub struct OrganizationView {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
    pub phones: Vec<OrganizationPhoneRow>,
    pub buildings: Vec<BuildingRow>,
    pub activities: Vec<ActivityRefView>,
}

/// Activity with its ancestor chain attached, two levels up at most.
#[derive(Debug, Serialize)]
pub struct ActivityAncestryView {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub level: i64,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<ActivityAncestryView>>,
}

#[derive(Debug, Serialize)]
pub struct OrganizationDetailView {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
    pub phones: Vec<OrganizationPhoneRow>,
    pub buildings: Vec<BuildingRow>,
    pub activities: Vec<ActivityAncestryView>,
}

pub async fn list_organizations(
    pool: &SqlitePool,
    filters: &OrganizationFilters,
    params: PageParams,
) -> Result<Page<OrganizationView>, CatalogError> {
    let activity_ids = expand_activity_filter(pool, filters.activity_id).await?;
    let rows =
        organizations_repo::list_filtered(pool, filters.building_id, activity_ids.as_deref())
            .await?;
    let rows = filter_by_name(rows, filters.name.as_deref());

    let page = paginate(rows, params);
    let views = build_views(pool, &page.items).await?;
    Ok(page.with_items(views))
}

/// Organizations with at least one building within `radius_m` meters of the
/// center. A degree-space box prefilters candidate buildings in SQL; the
/// exact great-circle test runs here. An organization reachable through
/// several qualifying buildings appears once.
pub async fn radius_search(
    pool: &SqlitePool,
    query: RadiusQuery,
    filters: &OrganizationFilters,
    params: PageParams,
) -> Result<Page<OrganizationView>, CatalogError> {
    let (min_lat, max_lat, min_lon, max_lon) =
        geo::radius_bounding_box(query.latitude, query.longitude, query.radius_m);
    let candidates = buildings_repo::list_coords_in_box(
        pool,
        geo::to_fixed(min_lat),
        geo::to_fixed(max_lat),
        geo::to_fixed(min_lon),
        geo::to_fixed(max_lon),
    )
    .await?;

    let building_ids: Vec<i64> = candidates
        .iter()
        .filter(|building| {
            geo::great_circle_distance_m(
                query.latitude,
                query.longitude,
                geo::to_decimal(building.latitude),
                geo::to_decimal(building.longitude),
            ) <= query.radius_m
        })
        .map(|building| building.id)
        .collect();

    let activity_ids = expand_activity_filter(pool, filters.activity_id).await?;
    let rows =
        organizations_repo::list_by_building_ids(pool, &building_ids, activity_ids.as_deref())
            .await?;
    let rows = filter_by_name(rows, filters.name.as_deref());

    let page = paginate(rows, params);
    let views = build_views(pool, &page.items).await?;
    Ok(page.with_items(views))
}

/// Organizations with at least one building inside the box, inclusive on
/// both axes. Containment is tested on the stored fixed-point values.
pub async fn bounds_search(
    pool: &SqlitePool,
    query: BoundsQuery,
    filters: &OrganizationFilters,
    params: PageParams,
) -> Result<Page<OrganizationView>, CatalogError> {
    let activity_ids = expand_activity_filter(pool, filters.activity_id).await?;
    let rows = organizations_repo::list_in_bounds(
        pool,
        geo::to_fixed(query.min_lat),
        geo::to_fixed(query.max_lat),
        geo::to_fixed(query.min_lon),
        geo::to_fixed(query.max_lon),
        activity_ids.as_deref(),
    )
    .await?;
    let rows = filter_by_name(rows, filters.name.as_deref());

    let page = paginate(rows, params);
    let views = build_views(pool, &page.items).await?;
    Ok(page.with_items(views))
}

pub async fn load_organization_detail(
    pool: &SqlitePool,
    id: i64,
) -> Result<OrganizationDetailView, CatalogError> {
    let Some(row) = organizations_repo::load_by_id(pool, id).await? else {
        return Err(CatalogError::OrganizationNotFound);
    };

    let ids = [row.id];
    let mut phones = group_phones(relations_repo::phones_for_organizations(pool, &ids).await?);
    let mut buildings =
        group_buildings(relations_repo::buildings_for_organizations(pool, &ids).await?);
    let activities = relations_repo::activities_for_organizations(pool, &ids).await?;

    // Ancestors are loaded one level per query, mirroring how deep the
    // listing contract goes: parent and parent-of-parent.
    let parent_ids: Vec<i64> = activities
        .iter()
        .filter_map(|activity| activity.parent_id)
        .collect::<BTreeSet<i64>>()
        .into_iter()
        .collect();
    let parents = activities_repo::list_by_ids(pool, &parent_ids).await?;
    let grandparent_ids: Vec<i64> = parents
        .iter()
        .filter_map(|parent| parent.parent_id)
        .collect::<BTreeSet<i64>>()
        .into_iter()
        .collect();
    let grandparents = activities_repo::list_by_ids(pool, &grandparent_ids).await?;

    let grandparents_by_id: HashMap<i64, &ActivityRow> =
        grandparents.iter().map(|row| (row.id, row)).collect();
    let parents_by_id: HashMap<i64, &ActivityRow> =
        parents.iter().map(|row| (row.id, row)).collect();

    let activity_views = activities
        .into_iter()
        .map(|activity| {
            let parent = activity.parent_id.and_then(|pid| {
                parents_by_id.get(&pid).map(|parent| {
                    let grandparent = parent
                        .parent_id
                        .and_then(|gid| grandparents_by_id.get(&gid))
                        .map(|gp| Box::new(ancestry_leaf(gp)));
                    Box::new(ActivityAncestryView {
                        id: parent.id,
                        name: parent.name.clone(),
                        parent_id: parent.parent_id,
                        level: parent.level,
                        created_at: parent.created_at.clone(),
                        updated_at: parent.updated_at.clone(),
                        parent: grandparent,
                    })
                })
            });
            ActivityAncestryView {
                id: activity.id,
                name: activity.name,
                parent_id: activity.parent_id,
                level: activity.level,
                created_at: activity.created_at,
                updated_at: activity.updated_at,
                parent,
            }
        })
        .collect();

    Ok(OrganizationDetailView {
        id: row.id,
        name: row.name,
        created_at: row.created_at,
        updated_at: row.updated_at,
        phones: phones.remove(&row.id).unwrap_or_default(),
        buildings: buildings.remove(&row.id).unwrap_or_default(),
        activities: activity_views,
    })
}

fn ancestry_leaf(row: &ActivityRow) -> ActivityAncestryView {
    ActivityAncestryView {
        id: row.id,
        name: row.name.clone(),
        parent_id: row.parent_id,
        level: row.level,
        created_at: row.created_at.clone(),
        updated_at: row.updated_at.clone(),
        parent: None,
    }
}

async fn expand_activity_filter(
    pool: &SqlitePool,
    activity_id: Option<i64>,
) -> Result<Option<Vec<i64>>, CatalogError> {
    let Some(id) = activity_id else {
        return Ok(None);
    };
    let links = activities_repo::list_hierarchy(pool).await?;
    Ok(Some(hierarchy::descendant_ids(&links, id)))
}

fn filter_by_name(rows: Vec<OrganizationRow>, name: Option<&str>) -> Vec<OrganizationRow> {
    let Some(needle) = name.map(str::trim).filter(|s| !s.is_empty()) else {
        return rows;
    };
    rows.into_iter()
        .filter(|row| name_matches(&row.name, needle))
        .collect()
}

/// One batch query per relation type for the page's organizations, grouped
/// in memory. Never one query per row.
async fn build_views(
    pool: &SqlitePool,
    rows: &[OrganizationRow],
) -> Result<Vec<OrganizationView>, CatalogError> {
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();

    let mut phones = group_phones(relations_repo::phones_for_organizations(pool, &ids).await?);
    let mut buildings =
        group_buildings(relations_repo::buildings_for_organizations(pool, &ids).await?);
    let mut activities =
        group_activities(relations_repo::activities_for_organizations(pool, &ids).await?);

    Ok(rows
        .iter()
        .map(|row| OrganizationView {
            id: row.id,
            name: row.name.clone(),
            created_at: row.created_at.clone(),
            updated_at: row.updated_at.clone(),
            phones: phones.remove(&row.id).unwrap_or_default(),
            buildings: buildings.remove(&row.id).unwrap_or_default(),
            activities: activities.remove(&row.id).unwrap_or_default(),
        })
        .collect())
}

fn group_phones(
    rows: Vec<OrganizationPhoneRow>,
) -> HashMap<i64, Vec<OrganizationPhoneRow>> {
    let mut grouped: HashMap<i64, Vec<OrganizationPhoneRow>> = HashMap::new();
    for row in rows {
        grouped.entry(row.organization_id).or_default().push(row);
    }
    grouped
}

fn group_buildings(rows: Vec<OrgBuildingRow>) -> HashMap<i64, Vec<BuildingRow>> {
    let mut grouped: HashMap<i64, Vec<BuildingRow>> = HashMap::new();
    for row in rows {
        grouped.entry(row.organization_id).or_default().push(BuildingRow {
            id: row.id,
            address: row.address,
            latitude: row.latitude,
            longitude: row.longitude,
            created_at: row.created_at,
            updated_at: row.updated_at,
        });
    }
    grouped
}

fn group_activities(rows: Vec<OrgActivityRow>) -> HashMap<i64, Vec<ActivityRefView>> {
    let mut grouped: HashMap<i64, Vec<ActivityRefView>> = HashMap::new();
    for row in rows {
        grouped.entry(row.organization_id).or_default().push(ActivityRefView {
            id: row.id,
            name: row.name,
            parent_id: row.parent_id,
            level: row.level,
            created_at: row.created_at,
            updated_at: row.updated_at,
        });
    }
    grouped
}
