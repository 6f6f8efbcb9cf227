//! A small kindergarten permission tree.
//!
//! Activity Center (1) > Activities page (5) > buttons 51..58
//! Enrollment (2) > Enrollment Plans page (6) > buttons 61..63

use crate::database::models::Permission;

/// Row of the `roles` table; only the joins see it outside tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: i64,
    pub status: i32,
}

pub const ADMIN_ID: i64 = 1;
pub const TEACHER_ID: i64 = 7;
/// Logged in, holds no roles
pub const PARENT_ID: i64 = 9;

pub const ACTIVITY_PAGE_ID: i64 = 5;
pub const ACTIVITY_VIEW_ID: i64 = 51;
pub const ARCHIVED_ROLE_BUTTON_ID: i64 = 57;

#[allow(clippy::too_many_arguments)]
fn row(
    id: i64,
    name: &str,
    kind: &str,
    parent_id: Option<i64>,
    code: Option<&str>,
    permission: Option<&str>,
    path: Option<&str>,
    component: Option<&str>,
    sort: i32,
) -> Permission {
    Permission {
        id,
        name: name.to_string(),
        code: code.map(str::to_string),
        permission: permission.map(str::to_string),
        path: path.map(str::to_string),
        component: component.map(str::to_string),
        icon: None,
        kind: kind.to_string(),
        parent_id,
        category: None,
        status: 1,
        sort,
    }
}

pub fn permissions() -> Vec<Permission> {
    let mut inactive = row(56, "Legacy print", "button", Some(5), Some("ACTIVITY_PRINT"), Some("ACTIVITY_PRINT"), None, None, 6);
    inactive.status = 0;

    // Explicit category overrides the `_VIEW` naming heuristic
    let mut publish = row(58, "Publish", "button", Some(5), Some("ACTIVITY_PUBLISH_VIEW"), Some("ACTIVITY_PUBLISH_VIEW"), None, None, 8);
    publish.category = Some("operation".to_string());

    vec![
        row(1, "Activity Center", "category", None, Some("ACTIVITY_CENTER"), None, Some("/centers/activity"), None, 1),
        row(2, "Enrollment", "category", None, Some("ENROLLMENT_CENTER"), None, Some("/centers/enrollment"), None, 2),
        row(5, "Activities", "menu", Some(1), Some("ACTIVITY_PAGE"), Some("ACTIVITY_PAGE"), Some("/centers/activity/list"), Some("ActivityList"), 1),
        row(6, "Enrollment Plans", "menu", Some(2), Some("ENROLLMENT_PAGE"), Some("ENROLLMENT_PAGE"), Some("/centers/enrollment/plans"), Some("EnrollmentPlans"), 1),
        row(51, "View", "button", Some(5), Some("ACTIVITY_VIEW"), Some("ACTIVITY_VIEW"), None, None, 1),
        row(52, "Edit", "button", Some(5), Some("ACTIVITY_EDIT"), Some("ACTIVITY_EDIT"), None, None, 2),
        row(53, "Delete", "button", Some(5), Some("ACTIVITY_DELETE"), Some("ACTIVITY_DELETE"), None, None, 3),
        row(54, "Export", "button", Some(5), Some("ACTIVITY_EXPORT"), Some("ACTIVITY_EXPORT"), None, None, 4),
        row(55, "Detail", "button", Some(5), Some("ACTIVITY_DETAIL"), None, Some("/centers/activity/detail"), Some("ActivityDetail"), 5),
        inactive,
        row(57, "Archive", "button", Some(5), Some("ACTIVITY_ARCHIVE"), Some("ACTIVITY_ARCHIVE"), None, None, 7),
        publish,
        row(61, "View plans", "button", Some(6), Some("ENROLLMENT_VIEW"), Some("ENROLLMENT_VIEW"), Some("/centers/enrollment/plans/view"), Some("PlanView"), 1),
        row(62, "A edit", "button", Some(6), Some("A_EDIT"), Some("A_EDIT"), None, None, 2),
        row(63, "B view", "button", Some(6), Some("B_VIEW"), Some("B_VIEW"), None, None, 3),
    ]
}

fn role(id: i64, status: i32) -> Role {
    Role { id, status }
}

/// Roles with the permission ids granted to each
pub fn roles() -> Vec<(Role, Vec<i64>)> {
    vec![
        // admin
        (role(1, 1), vec![1, 2, 5, 6]),
        // teacher
        (role(2, 1), vec![1, 5, 51, 52, 54, 55, 56, 62]),
        // archived, inactive
        (role(3, 0), vec![57]),
    ]
}

/// `(user_id, role_id)` pairs
pub fn user_roles() -> Vec<(i64, i64)> {
    vec![(ADMIN_ID, 1), (TEACHER_ID, 2), (TEACHER_ID, 3)]
}

/// Grants as the SQL store would report them
pub fn grants() -> Vec<crate::database::models::UserGrant> {
    use crate::database::models::UserGrant;

    let roles = roles();
    user_roles()
        .into_iter()
        .flat_map(|(user_id, role_id)| {
            roles
                .iter()
                .filter(|(r, _)| r.id == role_id && r.status == 1)
                .flat_map(|(_, ids)| ids.clone())
                .map(move |permission_id| UserGrant { user_id, permission_id })
                .collect::<Vec<_>>()
        })
        .collect()
}
