use std::collections::HashSet;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::ServiceExt;

use organizations_catalog::config::AppConfig;
use organizations_catalog::database::{schema, seed};
use organizations_catalog::web::{build_router, AppState};

const KEY: &str = "test-key";

async fn empty_db() -> SqlitePool {
    // One connection keeps the in-memory database alive and shared.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    schema::create_schema(&pool).await.unwrap();
    pool
}

async fn seeded_db() -> SqlitePool {
    let pool = empty_db().await;
    seed::seed_catalog(&pool).await.unwrap();
    pool
}

fn app(pool: SqlitePool) -> Router {
    let config = AppConfig {
        api_key: KEY.to_string(),
        default_per_page: 15,
        max_per_page: 100,
    };
    build_router(AppState {
        pool,
        config: Arc::new(config),
    })
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

/// Percent-encodes a query value; `http::Uri` rejects raw Cyrillic.
fn pct(value: &str) -> String {
    let mut out = String::new();
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

fn data_ids(body: &Value) -> Vec<i64> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}

async fn insert_activity(pool: &SqlitePool, name: &str, parent_id: Option<i64>, level: i64) -> i64 {
    sqlx::query("INSERT INTO activities (name, parent_id, level) VALUES (?, ?, ?)")
        .bind(name)
        .bind(parent_id)
        .bind(level)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

async fn insert_building(pool: &SqlitePool, address: &str, latitude: i64, longitude: i64) -> i64 {
    sqlx::query("INSERT INTO buildings (address, latitude, longitude) VALUES (?, ?, ?)")
        .bind(address)
        .bind(latitude)
        .bind(longitude)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

async fn insert_organization(pool: &SqlitePool, name: &str) -> i64 {
    sqlx::query("INSERT INTO organizations (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

async fn link_building(pool: &SqlitePool, building_id: i64, organization_id: i64) {
    sqlx::query("INSERT INTO building_organization (building_id, organization_id) VALUES (?, ?)")
        .bind(building_id)
        .bind(organization_id)
        .execute(pool)
        .await
        .unwrap();
}

async fn link_activity(pool: &SqlitePool, activity_id: i64, organization_id: i64) {
    sqlx::query("INSERT INTO activity_organization (activity_id, organization_id) VALUES (?, ?)")
        .bind(activity_id)
        .bind(organization_id)
        .execute(pool)
        .await
        .unwrap();
}

async fn insert_phone(pool: &SqlitePool, organization_id: i64, number: &str) {
    sqlx::query("INSERT INTO organization_phones (organization_id, phone_number) VALUES (?, ?)")
        .bind(organization_id)
        .bind(number)
        .execute(pool)
        .await
        .unwrap();
}

// --- API key gate ---

#[tokio::test]
async fn missing_key_is_rejected() {
    let app = app(seeded_db().await);
    let (status, body) = get_json(&app, "/api/organizations").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "INVALID_API_KEY");
    assert_eq!(body["message"], "Invalid API key");
}

#[tokio::test]
async fn wrong_key_is_rejected_on_every_route() {
    let app = app(seeded_db().await);
    for uri in [
        "/api/organizations?key=nope",
        "/api/organizations/1?key=nope",
        "/api/organizations/geo/radius?key=nope",
        "/api/organizations/geo/bounds?key=nope",
        "/api/buildings?key=nope",
        "/api/buildings/1?key=nope",
        "/api/activities?key=nope",
        "/api/activities/tree?key=nope",
        "/api/activities/1?key=nope",
    ] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["error_code"], "INVALID_API_KEY", "{uri}");
    }
}

#[tokio::test]
async fn key_check_runs_before_validation() {
    let app = app(seeded_db().await);
    // Invalid radius parameters, but the bad key must win.
    let (status, body) =
        get_json(&app, "/api/organizations/geo/radius?key=nope&radius=1").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "INVALID_API_KEY");
}

// --- Organization listing ---

#[tokio::test]
async fn organizations_first_page_with_default_size() {
    let app = app(seeded_db().await);
    let (status, body) = get_json(&app, &format!("/api/organizations?key={KEY}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["meta"]["current_page"], 1);
    assert_eq!(body["meta"]["per_page"], 15);
    assert_eq!(body["meta"]["total"], 30);
    assert_eq!(body["meta"]["last_page"], 2);
    assert_eq!(body["meta"]["from"], 1);
    assert_eq!(body["meta"]["to"], 15);
    assert_eq!(body["data"].as_array().unwrap().len(), 15);

    let first = &body["data"][0];
    assert_eq!(first["id"], 1);
    assert_eq!(first["name"], "ООО \"Ромашка\"");
    assert!(!first["phones"].as_array().unwrap().is_empty());
    assert_eq!(first["buildings"].as_array().unwrap().len(), 1);
    assert!(!first["activities"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn organization_pages_concatenate_without_overlap() {
    let app = app(seeded_db().await);
    let mut seen: HashSet<i64> = HashSet::new();
    for page in 1..=3 {
        let (_, body) =
            get_json(&app, &format!("/api/organizations?key={KEY}&page={page}")).await;
        for id in data_ids(&body) {
            assert!(seen.insert(id), "organization {id} duplicated across pages");
        }
    }
    assert_eq!(seen.len(), 30);
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
    let app = app(seeded_db().await);
    let (status, body) = get_json(&app, &format!("/api/organizations?key={KEY}&page=9")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["meta"]["total"], 30);
    assert_eq!(body["meta"]["from"], Value::Null);
    assert_eq!(body["meta"]["to"], Value::Null);
}

#[tokio::test]
async fn name_filter_is_case_insensitive() {
    let app = app(seeded_db().await);
    let (_, body) = get_json(
        &app,
        &format!("/api/organizations?key={KEY}&name={}", pct("ромашка")),
    )
    .await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["name"], "ООО \"Ромашка\"");

    // A lowercase substring of every "ООО ..." name.
    let (_, body) = get_json(
        &app,
        &format!("/api/organizations?key={KEY}&name={}", pct("ооо")),
    )
    .await;
    assert_eq!(body["meta"]["total"], 15);
}

#[tokio::test]
async fn building_filter_limits_to_linked_organizations() {
    let app = app(seeded_db().await);
    let (_, body) = get_json(&app, &format!("/api/organizations?key={KEY}&building_id=1")).await;
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(data_ids(&body), vec![1, 21]);
}

#[tokio::test]
async fn unknown_building_filter_fails_validation() {
    let app = app(seeded_db().await);
    let (status, body) =
        get_json(&app, &format!("/api/organizations?key={KEY}&building_id=999")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], "VALIDATION_FAILED");
    assert!(body["errors"]["building_id"].is_string());
}

#[tokio::test]
async fn pagination_bounds_fail_validation() {
    let app = app(seeded_db().await);
    for uri in [
        format!("/api/organizations?key={KEY}&page=0"),
        format!("/api/organizations?key={KEY}&per_page=0"),
        format!("/api/organizations?key={KEY}&per_page=101"),
        format!("/api/organizations?key={KEY}&page=abc"),
    ] {
        let (status, body) = get_json(&app, &uri).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        assert_eq!(body["error_code"], "VALIDATION_FAILED", "{uri}");
    }
}

#[tokio::test]
async fn activity_filter_expands_to_descendants() {
    let pool = empty_db().await;
    let root = insert_activity(&pool, "Торговля", None, 0).await;
    let child_a = insert_activity(&pool, "Розничная торговля", Some(root), 1).await;
    let child_b = insert_activity(&pool, "Оптовая торговля", Some(root), 1).await;

    let tagged_child = insert_organization(&pool, "ООО \"Дочерняя\"").await;
    link_activity(&pool, child_b, tagged_child).await;
    let tagged_root = insert_organization(&pool, "ООО \"Корневая\"").await;
    link_activity(&pool, root, tagged_root).await;
    let untagged = insert_organization(&pool, "ООО \"Без деятельности\"").await;

    let app = app(pool);
    let (_, body) = get_json(
        &app,
        &format!("/api/organizations?key={KEY}&activity_id={root}"),
    )
    .await;
    let ids = data_ids(&body);
    assert!(ids.contains(&tagged_child));
    assert!(ids.contains(&tagged_root));
    assert!(!ids.contains(&untagged));

    // A leaf filter only matches its own tag.
    let (_, body) = get_json(
        &app,
        &format!("/api/organizations?key={KEY}&activity_id={child_a}"),
    )
    .await;
    assert!(data_ids(&body).is_empty());
}

// --- Organization detail ---

#[tokio::test]
async fn organization_detail_includes_ancestor_chain() {
    let pool = empty_db().await;
    let services = insert_activity(&pool, "Услуги", None, 0).await;
    let it = insert_activity(&pool, "IT-услуги", Some(services), 1).await;
    let dev = insert_activity(&pool, "Разработка ПО", Some(it), 2).await;
    let building = insert_building(&pool, "г. Москва, ул. Тверская, д. 1", 557558000, 376173000).await;
    let org = insert_organization(&pool, "ООО \"ИТ Решения\"").await;
    link_activity(&pool, dev, org).await;
    link_building(&pool, building, org).await;
    insert_phone(&pool, org, "+79001234567").await;

    let app = app(pool);
    let (status, body) = get_json(&app, &format!("/api/organizations/{org}?key={KEY}")).await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["id"], org);
    assert_eq!(data["phones"][0]["phone_number"], "+79001234567");
    assert_eq!(data["buildings"][0]["latitude"], 557558000);

    let activity = &data["activities"][0];
    assert_eq!(activity["id"], dev);
    assert_eq!(activity["parent"]["id"], it);
    assert_eq!(activity["parent"]["parent"]["id"], services);
}

#[tokio::test]
async fn organization_detail_unknown_id_is_404() {
    let app = app(seeded_db().await);
    for uri in [
        format!("/api/organizations/999?key={KEY}"),
        format!("/api/organizations/abc?key={KEY}"),
    ] {
        let (status, body) = get_json(&app, &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["success"], false);
        assert_eq!(body["error_code"], "ORGANIZATION_NOT_FOUND");
    }
}

// --- Geo radius search ---

#[tokio::test]
async fn radius_centered_on_building_matches_only_its_organizations() {
    let app = app(seeded_db().await);
    // Building 3's exact coordinates, minimal allowed radius.
    let (status, body) = get_json(
        &app,
        &format!(
            "/api/organizations/geo/radius?key={KEY}&latitude=55.7601&longitude=37.6520&radius=100"
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data_ids(&body), vec![3, 23]);
    assert_eq!(body["meta"]["search_params"]["center"]["latitude"], 55.7601);
    assert_eq!(body["meta"]["search_params"]["radius_meters"], 100);
}

#[tokio::test]
async fn radius_one_kilometer_around_city_center() {
    let app = app(seeded_db().await);
    let (_, body) = get_json(
        &app,
        &format!(
            "/api/organizations/geo/radius?key={KEY}&latitude=55.7558&longitude=37.6173&radius=1000"
        ),
    )
    .await;
    // Buildings 1, 9, 10 and 20 fall inside the kilometer.
    assert_eq!(body["meta"]["total"], 7);
    let ids = data_ids(&body);
    assert!(ids.contains(&1));
    assert!(ids.contains(&20));
}

#[tokio::test]
async fn organization_with_two_qualifying_buildings_appears_once() {
    let pool = empty_db().await;
    let near_a = insert_building(&pool, "адрес 1", 557558000, 376173000).await;
    let near_b = insert_building(&pool, "адрес 2", 557559000, 376174000).await;
    let org = insert_organization(&pool, "ООО \"Двойная\"").await;
    link_building(&pool, near_a, org).await;
    link_building(&pool, near_b, org).await;

    let app = app(pool);
    let (_, body) = get_json(
        &app,
        &format!(
            "/api/organizations/geo/radius?key={KEY}&latitude=55.7558&longitude=37.6173&radius=500"
        ),
    )
    .await;
    assert_eq!(data_ids(&body), vec![org]);
    assert_eq!(body["meta"]["total"], 1);
}

#[tokio::test]
async fn radius_validation_lists_every_violated_field() {
    let app = app(seeded_db().await);
    let (status, body) = get_json(&app, &format!("/api/organizations/geo/radius?key={KEY}")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["latitude"].is_string());
    assert!(body["errors"]["longitude"].is_string());
    assert!(body["errors"]["radius"].is_string());

    let (status, body) = get_json(
        &app,
        &format!(
            "/api/organizations/geo/radius?key={KEY}&latitude=95&longitude=37.6&radius=50"
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["latitude"].is_string());
    assert!(body["errors"]["radius"].is_string());
}

// --- Geo bounds search ---

#[tokio::test]
async fn bounds_box_around_city_center() {
    let app = app(seeded_db().await);
    let (status, body) = get_json(
        &app,
        &format!(
            "/api/organizations/geo/bounds?key={KEY}&min_lat=55.75&max_lat=55.77&min_lon=37.60&max_lon=37.65"
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 10);
    assert_eq!(
        body["meta"]["search_params"]["bounds"]["southwest"]["latitude"],
        55.75
    );
    assert_eq!(
        body["meta"]["search_params"]["bounds"]["northeast"]["longitude"],
        37.65
    );
}

#[tokio::test]
async fn bounds_are_inclusive_at_the_edge() {
    let pool = empty_db().await;
    let building = insert_building(&pool, "угловой дом", 550000000, 370000000).await;
    let org = insert_organization(&pool, "ООО \"Граница\"").await;
    link_building(&pool, building, org).await;

    let app = app(pool);
    let (_, body) = get_json(
        &app,
        &format!(
            "/api/organizations/geo/bounds?key={KEY}&min_lat=55.0&max_lat=56.0&min_lon=37.0&max_lon=38.0"
        ),
    )
    .await;
    assert_eq!(data_ids(&body), vec![org]);
}

#[tokio::test]
async fn bounds_requires_all_four_corners() {
    let app = app(seeded_db().await);
    let (status, body) = get_json(
        &app,
        &format!("/api/organizations/geo/bounds?key={KEY}&min_lat=55.0"),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["max_lat"].is_string());
    assert!(body["errors"]["min_lon"].is_string());
    assert!(body["errors"]["max_lon"].is_string());
}

// --- Buildings ---

#[tokio::test]
async fn buildings_list_with_counts_and_address_filter() {
    let app = app(seeded_db().await);
    let (_, body) = get_json(&app, &format!("/api/buildings?key={KEY}&per_page=100")).await;
    assert_eq!(body["meta"]["total"], 20);
    assert_eq!(body["data"][0]["organizations_count"], 2);

    let (_, body) = get_json(
        &app,
        &format!("/api/buildings?key={KEY}&address={}", pct("тверская")),
    )
    .await;
    assert_eq!(body["meta"]["total"], 2);
}

#[tokio::test]
async fn building_detail_and_404() {
    let app = app(seeded_db().await);
    let (status, body) = get_json(&app, &format!("/api/buildings/1?key={KEY}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["latitude"], 557558000);
    assert_eq!(body["data"]["organizations_count"], 2);

    let (status, body) = get_json(&app, &format!("/api/buildings/999?key={KEY}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "BUILDING_NOT_FOUND");
}

// --- Activities ---

#[tokio::test]
async fn activities_list_and_filters() {
    let app = app(seeded_db().await);
    let (_, body) = get_json(&app, &format!("/api/activities?key={KEY}")).await;
    assert_eq!(body["meta"]["total"], 20);
    assert_eq!(body["meta"]["max_level"], 3);

    let (_, body) = get_json(&app, &format!("/api/activities?key={KEY}&parent_id=0")).await;
    assert_eq!(body["meta"]["total"], 5);

    let (_, body) = get_json(&app, &format!("/api/activities?key={KEY}&parent_id=1")).await;
    assert_eq!(body["meta"]["total"], 3);

    let (_, body) = get_json(&app, &format!("/api/activities?key={KEY}&level=2")).await;
    assert_eq!(body["meta"]["total"], 2);

    let (_, body) = get_json(
        &app,
        &format!("/api/activities?key={KEY}&name={}", pct("услуги")),
    )
    .await;
    assert_eq!(body["meta"]["total"], 4);
}

#[tokio::test]
async fn activities_filter_validation() {
    let app = app(seeded_db().await);
    let (status, body) = get_json(&app, &format!("/api/activities?key={KEY}&parent_id=999")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["parent_id"].is_string());

    let (status, _) = get_json(&app, &format!("/api/activities?key={KEY}&level=7")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn activity_tree_attaches_children() {
    let app = app(seeded_db().await);
    let (status, body) = get_json(&app, &format!("/api/activities/tree?key={KEY}")).await;
    assert_eq!(status, StatusCode::OK);
    let roots = body["data"].as_array().unwrap();
    assert_eq!(roots.len(), 5);

    let services = roots.iter().find(|r| r["name"] == "Услуги").unwrap();
    assert_eq!(services["children"].as_array().unwrap().len(), 3);
    let it = services["children"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "IT-услуги")
        .unwrap();
    assert_eq!(it["children"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn activity_tree_depth_limits_levels() {
    let app = app(seeded_db().await);
    let (_, body) = get_json(&app, &format!("/api/activities/tree?key={KEY}&depth=1")).await;
    let roots = body["data"].as_array().unwrap();
    let services = roots.iter().find(|r| r["name"] == "Услуги").unwrap();
    let it = services["children"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "IT-услуги")
        .unwrap();
    assert!(it["children"].as_array().unwrap().is_empty());

    let (status, _) = get_json(&app, &format!("/api/activities/tree?key={KEY}&depth=0")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn activity_detail_has_root_first_path() {
    let app = app(seeded_db().await);
    // "Разработка ПО": third level of the services branch.
    let (status, body) = get_json(&app, &format!("/api/activities/11?key={KEY}")).await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["name"], "Разработка ПО");
    assert_eq!(data["parent"]["id"], 10);
    let path: Vec<i64> = data["path"]
        .as_array()
        .unwrap()
        .iter()
        .map(|node| node["id"].as_i64().unwrap())
        .collect();
    assert_eq!(path, vec![9, 10, 11]);
    assert_eq!(data["path"][0]["level"], 0);

    let (_, body) = get_json(&app, &format!("/api/activities/9?key={KEY}")).await;
    let children: Vec<i64> = body["data"]["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(children, vec![10, 13, 14]);
}

#[tokio::test]
async fn activity_detail_unknown_id_is_404() {
    let app = app(seeded_db().await);
    let (status, body) = get_json(&app, &format!("/api/activities/999?key={KEY}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "ACTIVITY_NOT_FOUND");
}

// --- Storage behavior ---

#[tokio::test]
async fn deleting_an_organization_cascades_to_owned_rows() {
    let pool = empty_db().await;
    let building = insert_building(&pool, "адрес", 550000000, 370000000).await;
    let activity = insert_activity(&pool, "Торговля", None, 0).await;
    let org = insert_organization(&pool, "ООО \"Временная\"").await;
    link_building(&pool, building, org).await;
    link_activity(&pool, activity, org).await;
    insert_phone(&pool, org, "+79000000000").await;

    sqlx::query("DELETE FROM organizations WHERE id = ?")
        .bind(org)
        .execute(&pool)
        .await
        .unwrap();

    let phones: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM organization_phones")
        .fetch_one(&pool)
        .await
        .unwrap();
    let building_links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM building_organization")
        .fetch_one(&pool)
        .await
        .unwrap();
    let activity_links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activity_organization")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!((phones, building_links, activity_links), (0, 0, 0));
}
