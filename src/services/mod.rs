pub mod grouping;
pub mod resolver;
pub mod routes;
pub mod stats;

pub use resolver::{PermissionResolver, ResolverError};
