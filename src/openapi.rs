use utoipa::OpenApi;

use crate::models::{
    ApiResponse, BatchFailure, BatchForm, BatchResponse, ColumnsForm, CreateUserForm, FilterForm,
    ImportResponse, PageForm, SortDirection, SortForm, UpdateUserForm, UserRecord, ViewSnapshot,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::users::list_users,
        crate::handlers::users::create_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::catalog::list_ous,
        crate::handlers::catalog::list_groups,
        crate::handlers::view::get_view,
        crate::handlers::view::set_filter,
        crate::handlers::view::set_sort,
        crate::handlers::view::set_page,
        crate::handlers::view::set_columns,
        crate::handlers::view::toggle_row,
        crate::handlers::view::toggle_page,
        crate::handlers::view::export_view,
        crate::handlers::view::list_columns,
        crate::handlers::batch::run_batch,
        crate::handlers::import::upload_csv,
        crate::handlers::status::get_status,
    ),
    components(schemas(
        UserRecord,
        CreateUserForm,
        UpdateUserForm,
        FilterForm,
        SortForm,
        PageForm,
        ColumnsForm,
        BatchForm,
        ViewSnapshot,
        BatchResponse,
        BatchFailure,
        ImportResponse,
        ApiResponse,
        SortDirection,
    )),
    tags(
        (name = "users", description = "Directory user records"),
        (name = "view", description = "Tabular view state"),
        (name = "batch", description = "Batch operations over the selection"),
        (name = "import", description = "Bulk import through the external interpreter"),
        (name = "status", description = "Console status")
    )
)]
pub struct ApiDoc;
