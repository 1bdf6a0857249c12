use thiserror::Error;

/// Failures surfaced by the service layer. The web layer maps these onto the
/// response envelope; storage errors stay opaque to clients.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Organization not found")]
    OrganizationNotFound,
    #[error("Building not found")]
    BuildingNotFound,
    #[error("Activity not found")]
    ActivityNotFound,
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

impl CatalogError {
    /// Machine-readable code for the not-found variants.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            CatalogError::OrganizationNotFound => Some("ORGANIZATION_NOT_FOUND"),
            CatalogError::BuildingNotFound => Some("BUILDING_NOT_FOUND"),
            CatalogError::ActivityNotFound => Some("ACTIVITY_NOT_FOUND"),
            CatalogError::Db(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),
    #[error("invalid value for environment variable {0}")]
    InvalidEnv(&'static str),
}
