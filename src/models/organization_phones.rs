use serde::Serialize;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrganizationPhoneRow {
    pub id: i64,
    pub organization_id: i64,
    pub phone_number: String,
    pub created_at: String,
    pub updated_at: String,
}
