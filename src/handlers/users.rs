use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::models::{CreateUserForm, ServiceError, UpdateUserForm, UserRecord};
use crate::services::UserService;

#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "Full user record set", body = [UserRecord]),
        (status = 502, description = "Directory gateway unreachable")
    )
)]
pub async fn list_users(
    user_service: web::Data<UserService>,
) -> Result<HttpResponse, ServiceError> {
    let users = user_service.list().await?;
    Ok(HttpResponse::Ok().json(users))
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserForm,
    responses(
        (status = 201, description = "User created", body = UserRecord),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn create_user(
    user_service: web::Data<UserService>,
    form: web::Json<CreateUserForm>,
) -> Result<HttpResponse, ServiceError> {
    let created = user_service.create(form.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    put,
    path = "/users",
    tag = "users",
    request_body = UpdateUserForm,
    responses(
        (status = 200, description = "User updated", body = UserRecord),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    user_service: web::Data<UserService>,
    form: web::Json<UpdateUserForm>,
) -> Result<HttpResponse, ServiceError> {
    let updated = user_service.update(form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[utoipa::path(
    delete,
    path = "/users/{username}",
    tag = "users",
    params(
        ("username" = String, Path, description = "Record identifier")
    ),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    user_service: web::Data<UserService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let username = path.into_inner();
    let message = user_service.delete(&username).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": message
    })))
}
