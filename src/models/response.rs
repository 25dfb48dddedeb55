use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::user::SortDirection;

// Common response types
#[derive(Serialize, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

/// The rendered slice of the record set plus the view state that produced
/// it, echoed back so the caller never has to track state on its own.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub success: bool,
    /// One object per visible row, carrying only the visible columns.
    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<Value>,
    pub total_count: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
    pub filter_text: String,
    pub selected_carreras: Vec<String>,
    pub selected_groups: Vec<String>,
    pub sort_column: Option<String>,
    pub sort_direction: SortDirection,
    pub visible_columns: Vec<String>,
    pub selected_rows: Vec<String>,
}

// Batch operation responses
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    pub username: String,
    pub reason: String,
}

/// Per-record accounting for one batch run. Every attempted username ends
/// up in exactly one of `succeeded`/`failed`.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub attempted: usize,
    pub succeeded: Vec<String>,
    pub failed: Vec<BatchFailure>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub success: bool,
    pub attempted: usize,
    pub succeeded: Vec<String>,
    pub failed: Vec<BatchFailure>,
}

impl From<BatchReport> for BatchResponse {
    fn from(report: BatchReport) -> Self {
        Self {
            success: report.failed.is_empty(),
            attempted: report.attempted,
            succeeded: report.succeeded,
            failed: report.failed,
        }
    }
}

// Bulk import responses
#[derive(Serialize, ToSchema)]
pub struct ImportResponse {
    pub message: String,
    pub output: String,
}
