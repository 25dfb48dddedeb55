use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::MultipartForm;
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::models::{ImportResponse, ServiceError};
use crate::services::ImportPipeline;

#[derive(MultipartForm)]
pub struct CsvUploadForm {
    #[multipart(rename = "csv")]
    pub csv: TempFile,
}

#[utoipa::path(
    post,
    path = "/uploadCsv",
    tag = "import",
    responses(
        (status = 200, description = "Interpreter exited 0; body carries its stdout", body = ImportResponse),
        (status = 500, description = "Interpreter exited non-zero; body carries its stderr")
    )
)]
pub async fn upload_csv(
    pipeline: web::Data<ImportPipeline>,
    MultipartForm(form): MultipartForm<CsvUploadForm>,
) -> Result<HttpResponse, ServiceError> {
    let file_name = form
        .csv
        .file_name
        .clone()
        .unwrap_or_else(|| "upload.csv".to_string());
    tracing::info!(file = %file_name, size = form.csv.size, "bulk import upload received");

    // `form` keeps the temporary file alive for the whole interpreter run
    // and removes it afterwards, on every exit path.
    let outcome = pipeline.run(form.csv.file.path()).await?;

    if outcome.succeeded() {
        Ok(HttpResponse::Ok().json(ImportResponse {
            message: "Import completed".to_string(),
            output: outcome.stdout,
        }))
    } else {
        tracing::warn!(exit_code = outcome.exit_code, "bulk import interpreter failed");
        Ok(HttpResponse::InternalServerError().json(json!({
            "message": "Import failed",
            "errorOutput": outcome.stderr
        })))
    }
}
