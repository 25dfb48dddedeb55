use actix_web::{web, HttpResponse};

use crate::models::ServiceError;
use crate::services::UserService;

#[utoipa::path(
    get,
    path = "/ous",
    tag = "users",
    responses(
        (status = 200, description = "Organizational unit labels", body = [String])
    )
)]
pub async fn list_ous(user_service: web::Data<UserService>) -> Result<HttpResponse, ServiceError> {
    let ous = user_service.ous().await?;
    Ok(HttpResponse::Ok().json(ous))
}

#[utoipa::path(
    get,
    path = "/groups",
    tag = "users",
    responses(
        (status = 200, description = "Group labels", body = [String])
    )
)]
pub async fn list_groups(
    user_service: web::Data<UserService>,
) -> Result<HttpResponse, ServiceError> {
    let groups = user_service.groups().await?;
    Ok(HttpResponse::Ok().json(groups))
}
