use serde::Serialize;

use crate::database::models::{Permission, PermissionType};

/// Menu entry under a top-level section
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuRoute {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
    pub path: Option<String>,
    pub component: Option<String>,
    pub permission: Option<String>,
    pub icon: Option<String>,
    pub sort: i32,
}

impl From<&Permission> for MenuRoute {
    fn from(p: &Permission) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            code: p.code.clone(),
            path: p.path.clone(),
            component: p.component.clone(),
            permission: p.permission.clone(),
            icon: p.icon.clone(),
            sort: p.sort,
        }
    }
}

/// Top-level `category` or `menu` row with its child menus
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSection {
    #[serde(flatten)]
    pub route: MenuRoute,
    #[serde(rename = "type")]
    pub kind: String,
    pub children: Vec<MenuRoute>,
}

/// Build the navigation tree from a user's permissions.
pub fn build_route_tree(permissions: &[Permission]) -> Vec<RouteSection> {
    let mut sections: Vec<RouteSection> = permissions
        .iter()
        .filter(|p| p.parent_id.is_none())
        .filter(|p| matches!(p.permission_type(), PermissionType::Category | PermissionType::Menu))
        .map(|p| RouteSection {
            route: MenuRoute::from(p),
            kind: p.kind.clone(),
            children: Vec::new(),
        })
        .collect();
    sections.sort_by_key(|s| s.route.sort);

    for section in &mut sections {
        let mut children: Vec<MenuRoute> = permissions
            .iter()
            .filter(|p| p.parent_id == Some(section.route.id) && p.permission_type() == PermissionType::Menu)
            .map(MenuRoute::from)
            .collect();
        children.sort_by_key(|c| c.sort);
        section.children = children;
    }

    sections
}

/// Front-end route entry with its guard metadata
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    pub id: i64,
    pub name: String,
    pub path: String,
    pub component: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub meta: RouteMeta,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMeta {
    pub title: String,
    pub requires_auth: bool,
    pub permission: Option<String>,
}

/// Active `menu`/`button` rows that carry both a path and a component.
pub fn route_entries<'a>(permissions: impl IntoIterator<Item = &'a Permission>) -> Vec<RouteEntry> {
    permissions
        .into_iter()
        .filter(|p| p.is_active())
        .filter(|p| matches!(p.permission_type(), PermissionType::Menu | PermissionType::Button))
        .filter_map(|p| {
            let path = p.path.as_deref().filter(|s| !s.is_empty())?;
            let component = p.component.as_deref().filter(|s| !s.is_empty())?;
            Some(RouteEntry {
                id: p.id,
                name: p.name.clone(),
                path: path.to_string(),
                component: component.to_string(),
                kind: p.kind.clone(),
                meta: RouteMeta {
                    title: p.name.clone(),
                    requires_auth: true,
                    permission: p.code.clone(),
                },
            })
        })
        .collect()
}
