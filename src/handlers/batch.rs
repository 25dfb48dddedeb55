use actix_web::{web, HttpResponse};

use crate::models::{BatchForm, BatchResponse, ServiceError};
use crate::services::{BatchOperation, BatchRunner, RecordStore};

#[utoipa::path(
    post,
    path = "/batch",
    tag = "batch",
    request_body = BatchForm,
    responses(
        (status = 200, description = "Per-record outcome of the batch", body = BatchResponse),
        (status = 400, description = "Invalid operation, empty selection or policy violation"),
        (status = 409, description = "Another batch is still running")
    )
)]
pub async fn run_batch(
    store: web::Data<RecordStore>,
    runner: web::Data<BatchRunner>,
    form: web::Json<BatchForm>,
) -> Result<HttpResponse, ServiceError> {
    let form = form.into_inner();
    let operation = BatchOperation::parse(&form.operation, form.password)?;
    let usernames = store.selected_ids().await;

    let report = runner.run(operation, &usernames).await?;

    Ok(HttpResponse::Ok().json(BatchResponse::from(report)))
}
