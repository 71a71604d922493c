/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Page size requested from the Logto Management API when listing users
pub const LOGTO_USERS_PAGE_SIZE: u32 = 100;

// =============================================================================
// ROLE CONSTANTS (JWT roles)
// =============================================================================

/// Global admin, bypasses every operator check
pub const ROLE_SUPER_ADMIN: &str = "super_admin";

/// Municipal authority operator
pub const ROLE_LOCAL_OPERATOR: &str = "local_operator";

/// Regional authority operator
pub const ROLE_REGIONAL_OPERATOR: &str = "regional_operator";

/// National authority operator - can change authority levels and bulk-clean identities
pub const ROLE_NATIONAL_OPERATOR: &str = "national_operator";
