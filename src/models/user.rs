use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

/// One directory entry as relayed from the upstream gateway. Records are
/// replaced wholesale on every gateway read and never edited in place.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
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
    #[serde(default)]
    pub logon_count: u64,
    #[serde(default)]
    pub last_logon: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// String form of a column value, used by the text filter and string sorts.
    pub fn field_text(&self, key: &str) -> String {
        match key {
            "username" => self.username.clone(),
            "givenName" => self.given_name.clone(),
            "sn" => self.sn.clone(),
            "displayName" => self.display_name.clone(),
            "ou" => self.ou.clone(),
            "groups" => self.groups.join(", "),
            "logonCount" => self.logon_count.to_string(),
            "lastLogon" => self
                .last_logon
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// JSON form of a column value, used when rendering visible columns.
    pub fn field_json(&self, key: &str) -> Value {
        match key {
            "username" => json!(self.username),
            "givenName" => json!(self.given_name),
            "sn" => json!(self.sn),
            "displayName" => json!(self.display_name),
            "ou" => json!(self.ou),
            "groups" => json!(self.groups),
            "logonCount" => json!(self.logon_count),
            "lastLogon" => self.last_logon.map(|dt| json!(dt)).unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Table column metadata, fixed at configuration time.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub fixed: bool,
    pub sortable: bool,
}

const COLUMNS: &[ColumnDescriptor] = &[
    ColumnDescriptor { key: "username", label: "Usuario", fixed: true, sortable: true },
    ColumnDescriptor { key: "givenName", label: "Nombre", fixed: false, sortable: true },
    ColumnDescriptor { key: "sn", label: "Apellido", fixed: false, sortable: true },
    ColumnDescriptor { key: "displayName", label: "Nombre completo", fixed: false, sortable: true },
    ColumnDescriptor { key: "ou", label: "Carrera", fixed: false, sortable: true },
    // Group membership is a set; there is no meaningful order to sort by.
    ColumnDescriptor { key: "groups", label: "Grupos", fixed: false, sortable: false },
    ColumnDescriptor { key: "logonCount", label: "Inicios de sesión", fixed: false, sortable: true },
    ColumnDescriptor { key: "lastLogon", label: "Último acceso", fixed: false, sortable: true },
];

pub fn column_catalog() -> &'static [ColumnDescriptor] {
    COLUMNS
}

pub fn column(key: &str) -> Option<&'static ColumnDescriptor> {
    COLUMNS.iter().find(|c| c.key == key)
}
