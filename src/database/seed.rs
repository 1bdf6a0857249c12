use sqlx::SqlitePool;
use tracing::info;

struct ActivitySeed {
    name: &'static str,
    children: &'static [ActivitySeed],
}

const ACTIVITY_TREE: &[ActivitySeed] = &[
    ActivitySeed {
        name: "Торговля",
        children: &[
            ActivitySeed { name: "Розничная торговля", children: &[] },
            ActivitySeed { name: "Оптовая торговля", children: &[] },
            ActivitySeed { name: "Электронная коммерция", children: &[] },
        ],
    },
    ActivitySeed {
        name: "Производство",
        children: &[
            ActivitySeed { name: "Пищевое производство", children: &[] },
            ActivitySeed { name: "Машиностроение", children: &[] },
            ActivitySeed { name: "Легкая промышленность", children: &[] },
        ],
    },
    ActivitySeed {
        name: "Услуги",
        children: &[
            ActivitySeed {
                name: "IT-услуги",
                children: &[
                    ActivitySeed { name: "Разработка ПО", children: &[] },
                    ActivitySeed { name: "Техническая поддержка", children: &[] },
                ],
            },
            ActivitySeed { name: "Консалтинг", children: &[] },
            ActivitySeed { name: "Образовательные услуги", children: &[] },
        ],
    },
    ActivitySeed {
        name: "Строительство",
        children: &[
            ActivitySeed { name: "Жилищное строительство", children: &[] },
            ActivitySeed { name: "Промышленное строительство", children: &[] },
        ],
    },
    ActivitySeed {
        name: "Транспорт и логистика",
        children: &[
            ActivitySeed { name: "Грузоперевозки", children: &[] },
            ActivitySeed { name: "Складские услуги", children: &[] },
        ],
    },
];

const BUILDINGS: &[(&str, i64, i64)] = &[
    ("г. Москва, ул. Тверская, д. 1", 557558000, 376173000),
    ("г. Москва, ул. Арбат, д. 10", 557507000, 375906000),
    ("г. Москва, пр-т Ленина, д. 45", 557601000, 376520000),
    ("г. Москва, ул. Невский, д. 22", 559366000, 303564000),
    ("г. Москва, ул. Ломоносова, д. 5", 559407000, 303106000),
    ("г. Москва, ул. Пушкинская, д. 12", 559441000, 303562000),
    ("г. Москва, пр-т Мира, д. 100", 558296000, 377847000),
    ("г. Москва, ул. Большая Морская, д. 30", 559368000, 303100000),
    ("г. Москва, ул. Красная площадь, д. 3", 557536000, 376173000),
    ("г. Москва, ул. Садовая, д. 25", 557502000, 376192000),
    ("г. Москва, пр-т Кутузовский, д. 15", 557415000, 373485000),
    ("г. Москва, ул. Тверская, д. 50", 557645000, 376122000),
    ("г. Москва, ул. Лубянка, д. 7", 557592000, 376406000),
    ("г. Москва, пр-т Вернадского, д. 86", 556770000, 375690000),
    ("г. Москва, ул. Чайковского, д. 40", 559377000, 303675000),
    ("г. Москва, пр-т Мира, д. 150", 558596000, 377847000),
    ("г. Москва, ул. Маяковского, д. 8", 557655000, 376150000),
    ("г. Москва, ул. Гороховая, д. 14", 559372000, 303214000),
    ("г. Москва, пр-т Ленинский, д. 72", 555924000, 377132000),
    ("г. Москва, ул. Петровка, д. 17", 557626000, 376202000),
];

const ORGANIZATIONS: &[&str] = &[
    "ООО \"Ромашка\"",
    "ЗАО \"Солнышко\"",
    "ООО \"Гранит\"",
    "ПАО \"Северсталь\"",
    "ООО \"Вектор\"",
    "ЗАО \"Прогресс\"",
    "ООО \"Альфа\"",
    "ПАО \"Омега\"",
    "ООО \"Стройтех\"",
    "ЗАО \"Мегаполис\"",
    "ООО \"ИТ Решения\"",
    "ПАО \"Консалтинг Плюс\"",
    "ООО \"Логистика 24\"",
    "ЗАО \"Транспорт\"",
    "ООО \"Пищепром\"",
    "ПАО \"Машзавод\"",
    "ООО \"Рост\"",
    "ЗАО \"Развитие\"",
    "ООО \"Техносервис\"",
    "ПАО \"Будущее\"",
    "ООО \"Инновации\"",
    "ЗАО \"Технологии\"",
    "ООО \"Бизнес Групп\"",
    "ПАО \"Корпорация\"",
    "ООО \"Светлый путь\"",
    "ЗАО \"Новый мир\"",
    "ООО \"Глобал\"",
    "ПАО \"Универсал\"",
    "ООО \"Премиум\"",
    "ЗАО \"Стандарт\"",
];

/// Loads the reference catalog. Link and phone assignment is derived from
/// each organization's position in the list, so repeated runs against a
/// fresh database produce byte-identical data.
pub async fn seed_catalog(pool: &SqlitePool) -> sqlx::Result<()> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM organizations")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        info!(organizations = existing, "catalog already seeded, skipping");
        return Ok(());
    }

    let activity_count = seed_activities(pool).await?;
    let building_count = seed_buildings(pool).await?;
    let organization_count = seed_organizations(pool, activity_count, building_count).await?;

    info!(
        activities = activity_count,
        buildings = building_count,
        organizations = organization_count,
        "catalog seeded"
    );
    Ok(())
}

async fn seed_activities(pool: &SqlitePool) -> sqlx::Result<i64> {
    // Depth-first so parents are inserted before their children, matching
    // the id order the rest of the seed data assumes.
    let mut flat: Vec<(&'static str, Option<usize>, i64)> = Vec::new();
    let mut stack: Vec<(&ActivitySeed, Option<usize>, i64)> = Vec::new();
    for seed in ACTIVITY_TREE.iter().rev() {
        stack.push((seed, None, 0));
    }
    while let Some((seed, parent_slot, level)) = stack.pop() {
        let slot = flat.len();
        flat.push((seed.name, parent_slot, level));
        for child in seed.children.iter().rev() {
            stack.push((child, Some(slot), level + 1));
        }
    }

    let mut ids: Vec<i64> = Vec::with_capacity(flat.len());
    for (name, parent_slot, level) in &flat {
        let parent_id = parent_slot.map(|slot| ids[slot]);
        let result = sqlx::query("INSERT INTO activities (name, parent_id, level) VALUES (?, ?, ?)")
            .bind(name)
            .bind(parent_id)
            .bind(level)
            .execute(pool)
            .await?;
        ids.push(result.last_insert_rowid());
    }
    Ok(ids.len() as i64)
}

async fn seed_buildings(pool: &SqlitePool) -> sqlx::Result<i64> {
    for (address, latitude, longitude) in BUILDINGS {
        sqlx::query("INSERT INTO buildings (address, latitude, longitude) VALUES (?, ?, ?)")
            .bind(address)
            .bind(latitude)
            .bind(longitude)
            .execute(pool)
            .await?;
    }
    Ok(BUILDINGS.len() as i64)
}

async fn seed_organizations(
    pool: &SqlitePool,
    activity_count: i64,
    building_count: i64,
) -> sqlx::Result<i64> {
    for (index, name) in ORGANIZATIONS.iter().enumerate() {
        let result = sqlx::query("INSERT INTO organizations (name) VALUES (?)")
            .bind(name)
            .execute(pool)
            .await?;
        let organization_id = result.last_insert_rowid();
        let i = index as i64;

        let phone_count = i % 3 + 1;
        for k in 0..phone_count {
            let phone_number = format!("+7{}", 9_000_000_000i64 + i * 33_333 + k * 7);
            sqlx::query(
                "INSERT INTO organization_phones (organization_id, phone_number) VALUES (?, ?)",
            )
            .bind(organization_id)
            .bind(&phone_number)
            .execute(pool)
            .await?;
        }

        let building_id = i % building_count + 1;
        sqlx::query(
            "INSERT INTO building_organization (building_id, organization_id) VALUES (?, ?)",
        )
        .bind(building_id)
        .bind(organization_id)
        .execute(pool)
        .await?;

        let mut activity_ids: Vec<i64> = Vec::new();
        let wanted = (i % 3 + 1) as usize;
        let mut step = 0;
        while activity_ids.len() < wanted {
            let candidate = (i * 7 + step * 5) % activity_count + 1;
            if !activity_ids.contains(&candidate) {
                activity_ids.push(candidate);
            }
            step += 1;
        }
        for activity_id in activity_ids {
            sqlx::query(
                "INSERT INTO activity_organization (activity_id, organization_id) VALUES (?, ?)",
            )
            .bind(activity_id)
            .bind(organization_id)
            .execute(pool)
            .await?;
        }
    }
    Ok(ORGANIZATIONS.len() as i64)
}
