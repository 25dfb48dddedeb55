use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::SortDirection;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserForm {
    pub username: String,
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub sn: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub ou: String,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Partial update relayed upstream; absent fields are left untouched.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserForm {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ou: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UpdateUserForm {
    pub fn password_reset(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            given_name: None,
            sn: None,
            display_name: None,
            ou: None,
            groups: None,
            password: Some(password.to_string()),
        }
    }
}

/// Filter update; absent fields keep their current value.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterForm {
    #[serde(default)]
    pub filter_text: Option<String>,
    #[serde(default)]
    pub selected_carreras: Option<Vec<String>>,
    #[serde(default)]
    pub selected_groups: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SortForm {
    /// Column key to sort by; omit to clear the sort.
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub direction: Option<SortDirection>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageForm {
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColumnsForm {
    pub visible_columns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchForm {
    /// "delete" or "resetPassword".
    pub operation: String,
    #[serde(default)]
    pub password: Option<String>,
}
