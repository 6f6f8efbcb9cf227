use serde::Serialize;

use crate::database::models::Permission;

/// Bucket a page button lands in on the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionGroup {
    Actions,
    Navigation,
    Operations,
}

impl PermissionGroup {
    fn from_category(category: &str) -> Option<Self> {
        match category.trim().to_ascii_lowercase().as_str() {
            "action" | "actions" => Some(Self::Actions),
            "navigation" | "nav" => Some(Self::Navigation),
            "operation" | "operations" => Some(Self::Operations),
            _ => None,
        }
    }
}

/// Decide the bucket for one row. An explicit `category` wins; unknown
/// category values fall through to the naming rules.
pub fn classify(permission: &Permission) -> Option<PermissionGroup> {
    if let Some(group) = permission
        .category
        .as_deref()
        .and_then(PermissionGroup::from_category)
    {
        return Some(group);
    }

    match (permission.permission.as_deref(), permission.path.as_deref()) {
        (Some(code), _) if is_action_code(code) => Some(PermissionGroup::Actions),
        (Some(_), _) => Some(PermissionGroup::Operations),
        (None, Some(_)) => Some(PermissionGroup::Navigation),
        (None, None) => None,
    }
}

fn is_action_code(code: &str) -> bool {
    ["_VIEW", "_EDIT", "_DELETE"].iter().any(|s| code.contains(s))
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupedPermissions {
    pub actions: Vec<Permission>,
    pub navigation: Vec<Permission>,
    pub operations: Vec<Permission>,
}

impl GroupedPermissions {
    pub fn len(&self) -> usize {
        self.actions.len() + self.navigation.len() + self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split rows into buckets, keeping input order inside each bucket.
pub fn group(permissions: &[Permission]) -> GroupedPermissions {
    let mut grouped = GroupedPermissions::default();
    for permission in permissions {
        let bucket = match classify(permission) {
            Some(PermissionGroup::Actions) => &mut grouped.actions,
            Some(PermissionGroup::Navigation) => &mut grouped.navigation,
            Some(PermissionGroup::Operations) => &mut grouped.operations,
            None => continue,
        };
        bucket.push(permission.clone());
    }
    grouped
}
