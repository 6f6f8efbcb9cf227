pub mod grant;
pub mod permission;

pub use grant::{GrantedKey, UserGrant};
pub use permission::{PageFilter, Permission, PermissionType, STATUS_ACTIVE};
