pub mod activities;
pub mod buildings;
pub mod organization_phones;
pub mod organizations;

pub use activities::{ActivityLinkRow, ActivityRow, ActivityWithCountsRow};
pub use buildings::{BuildingCoordRow, BuildingRow, BuildingWithCountRow};
pub use organization_phones::OrganizationPhoneRow;
pub use organizations::OrganizationRow;
