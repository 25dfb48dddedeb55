use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::services::{BatchRunner, RecordStore};

#[utoipa::path(
    get,
    path = "/status",
    tag = "status",
    responses(
        (status = 200, description = "Console status")
    )
)]
pub async fn get_status(
    store: web::Data<RecordStore>,
    runner: web::Data<BatchRunner>,
) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "records": store.record_count().await,
        "batchInFlight": runner.is_in_flight(),
        "lastRefreshSecs": store.last_refresh_age().await.map(|age| age.as_secs())
    }))
}
