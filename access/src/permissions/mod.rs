//! Permission system.
//!
//! - Catalog: every exact `(resource, action)` atom the dashboard gates on
//! - Roles: the fixed, leveled role set seeded from the catalog
//! - Resolver: pure allow/deny decisions and hierarchy rules

pub mod catalog;
pub mod resolver;
pub mod roles;

pub use catalog::{resources, CatalogPermission};
pub use resolver::{
    can_grant_role, can_manage_member, has_permission, require_permission, PermissionError,
};
pub use roles::{role_ids, RoleRegistry};
