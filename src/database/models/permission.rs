use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// `status` value of an active permission or role row.
pub const STATUS_ACTIVE: i32 = 1;

/// A named capability: a navigable page (category/menu/page) or a
/// button nested under a page via `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
    /// Action code checked by the frontend, e.g. `ACTIVITY_VIEW`.
    pub permission: Option<String>,
    pub path: Option<String>,
    pub component: Option<String>,
    pub icon: Option<String>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub parent_id: Option<i64>,
    /// Explicit grouping for page actions; see `services::grouping`.
    pub category: Option<String>,
    pub status: i32,
    pub sort: i32,
}

impl Permission {
    pub fn permission_type(&self) -> PermissionType {
        PermissionType::from(self.kind.as_str())
    }

    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }

    pub fn is_button(&self) -> bool {
        self.permission_type() == PermissionType::Button
    }

    /// Non-empty permission code, if any
    pub fn code_str(&self) -> Option<&str> {
        self.code.as_deref().filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionType {
    Category,
    Menu,
    Page,
    Button,
    Other,
}

impl From<&str> for PermissionType {
    fn from(value: &str) -> Self {
        match value {
            "category" => PermissionType::Category,
            "menu" => PermissionType::Menu,
            "page" => PermissionType::Page,
            "button" => PermissionType::Button,
            _ => PermissionType::Other,
        }
    }
}

/// Which page is being asked about. Both parts absent means no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFilter {
    pub page_id: Option<i64>,
    pub page_path: Option<String>,
}

impl PageFilter {
    pub fn new(page_id: Option<i64>, page_path: Option<String>) -> Self {
        Self {
            page_id,
            page_path: page_path.filter(|p| !p.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.page_id.is_none() && self.page_path.is_none()
    }

    /// `parent_id == page_id` or `path` contains `page_path`
    pub fn matches(&self, permission: &Permission) -> bool {
        if self.is_empty() {
            return true;
        }
        let by_id = matches!((self.page_id, permission.parent_id), (Some(a), Some(b)) if a == b);
        let by_path = match (&self.page_path, &permission.path) {
            (Some(needle), Some(path)) => path.contains(needle.as_str()),
            _ => false,
        };
        by_id || by_path
    }
}
