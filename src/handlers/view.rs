use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::models::{
    column_catalog, ColumnsForm, FilterForm, PageForm, ServiceError, SortForm, ViewSnapshot,
};
use crate::services::RecordStore;

#[utoipa::path(
    get,
    path = "/view",
    tag = "view",
    responses(
        (status = 200, description = "Current table projection", body = ViewSnapshot),
        (status = 502, description = "Directory gateway unreachable")
    )
)]
pub async fn get_view(store: web::Data<RecordStore>) -> Result<HttpResponse, ServiceError> {
    // Deduplicated inside the refresh window; concurrent callers share one fetch.
    store.refresh(false).await?;
    Ok(HttpResponse::Ok().json(store.snapshot().await))
}

#[utoipa::path(
    post,
    path = "/view/filter",
    tag = "view",
    request_body = FilterForm,
    responses(
        (status = 200, description = "Projection after the filter change", body = ViewSnapshot)
    )
)]
pub async fn set_filter(
    store: web::Data<RecordStore>,
    form: web::Json<FilterForm>,
) -> Result<HttpResponse, ServiceError> {
    let form = form.into_inner();
    let snapshot = store
        .apply_filter(form.filter_text, form.selected_carreras, form.selected_groups)
        .await;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[utoipa::path(
    post,
    path = "/view/sort",
    tag = "view",
    request_body = SortForm,
    responses(
        (status = 200, description = "Projection after the sort change", body = ViewSnapshot),
        (status = 400, description = "Unknown or unsortable column")
    )
)]
pub async fn set_sort(
    store: web::Data<RecordStore>,
    form: web::Json<SortForm>,
) -> Result<HttpResponse, ServiceError> {
    let form = form.into_inner();
    let snapshot = store.apply_sort(form.column, form.direction).await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[utoipa::path(
    post,
    path = "/view/page",
    tag = "view",
    request_body = PageForm,
    responses(
        (status = 200, description = "Projection after the page change", body = ViewSnapshot)
    )
)]
pub async fn set_page(
    store: web::Data<RecordStore>,
    form: web::Json<PageForm>,
) -> Result<HttpResponse, ServiceError> {
    let form = form.into_inner();
    let snapshot = store.apply_page(form.page, form.page_size).await;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[utoipa::path(
    post,
    path = "/view/columns",
    tag = "view",
    request_body = ColumnsForm,
    responses(
        (status = 200, description = "Projection after the visibility change", body = ViewSnapshot),
        (status = 400, description = "Unknown column key")
    )
)]
pub async fn set_columns(
    store: web::Data<RecordStore>,
    form: web::Json<ColumnsForm>,
) -> Result<HttpResponse, ServiceError> {
    let snapshot = store.apply_columns(form.into_inner().visible_columns).await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[utoipa::path(
    post,
    path = "/view/select/{username}",
    tag = "view",
    params(
        ("username" = String, Path, description = "Record identifier")
    ),
    responses(
        (status = 200, description = "Projection after toggling the row", body = ViewSnapshot)
    )
)]
pub async fn toggle_row(
    store: web::Data<RecordStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let snapshot = store.toggle_row(&path.into_inner()).await;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[utoipa::path(
    post,
    path = "/view/select-page",
    tag = "view",
    responses(
        (status = 200, description = "Projection after toggling the visible slice", body = ViewSnapshot)
    )
)]
pub async fn toggle_page(store: web::Data<RecordStore>) -> Result<HttpResponse, ServiceError> {
    let snapshot = store.toggle_visible_page().await;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[utoipa::path(
    get,
    path = "/view/export",
    tag = "view",
    responses(
        (status = 200, description = "CSV of the filtered, sorted set", body = String, content_type = "text/csv")
    )
)]
pub async fn export_view(store: web::Data<RecordStore>) -> Result<HttpResponse, ServiceError> {
    store.refresh(false).await?;
    let csv = store.export_csv().await;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .body(csv))
}

#[utoipa::path(
    get,
    path = "/columns",
    tag = "view",
    responses(
        (status = 200, description = "Column catalog")
    )
)]
pub async fn list_columns() -> HttpResponse {
    let columns: Vec<_> = column_catalog()
        .iter()
        .map(|c| {
            json!({
                "key": c.key,
                "label": c.label,
                "fixed": c.fixed,
                "sortable": c.sortable
            })
        })
        .collect();
    HttpResponse::Ok().json(columns)
}
