use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;

use directorio_ui_rust::config::AppConfig;
use directorio_ui_rust::gateway::{DirectoryGateway, HttpDirectoryGateway};
use directorio_ui_rust::handlers;
use directorio_ui_rust::openapi::ApiDoc;
use directorio_ui_rust::services::{BatchRunner, ImportPipeline, RecordStore, UserService};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();

    let gateway: Arc<dyn DirectoryGateway> = Arc::new(HttpDirectoryGateway::new(
        &config.gateway_base_url,
        config.gateway_timeout,
    )?);

    // Dependency injection: one store shared by every service.
    let store = Arc::new(RecordStore::new(gateway.clone(), config.refresh_window));
    let user_service = web::Data::new(UserService::new(gateway.clone(), store.clone()));
    let batch_runner = web::Data::new(BatchRunner::new(gateway.clone(), store.clone()));
    let import_pipeline = web::Data::new(ImportPipeline::new(&config.import_command)?);
    let store_data = web::Data::from(store);

    tracing::info!(gateway = %config.gateway_base_url, "Directory console listening on http://{}", config.bind_address);
    tracing::info!("API documentation: http://{}/swagger-ui/", config.bind_address);

    let openapi_spec = ApiDoc::openapi();

    HttpServer::new(move || {
        App::new()
            .app_data(store_data.clone())
            .app_data(user_service.clone())
            .app_data(batch_runner.clone())
            .app_data(import_pipeline.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .wrap(Logger::default())
            // Swagger UI for API documentation
            .service(
                utoipa_swagger_ui::SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi_spec.clone()),
            )
            // Proxy boundary to the upstream directory service
            .route("/users", web::get().to(handlers::users::list_users))
            .route("/users", web::post().to(handlers::users::create_user))
            .route("/users", web::put().to(handlers::users::update_user))
            .route(
                "/users/{username}",
                web::delete().to(handlers::users::delete_user),
            )
            .route("/ous", web::get().to(handlers::catalog::list_ous))
            .route("/groups", web::get().to(handlers::catalog::list_groups))
            .route("/uploadCsv", web::post().to(handlers::import::upload_csv))
            // Console endpoints: view state, selection, batches
            .route("/columns", web::get().to(handlers::view::list_columns))
            .route("/view", web::get().to(handlers::view::get_view))
            .route("/view/filter", web::post().to(handlers::view::set_filter))
            .route("/view/sort", web::post().to(handlers::view::set_sort))
            .route("/view/page", web::post().to(handlers::view::set_page))
            .route("/view/columns", web::post().to(handlers::view::set_columns))
            .route(
                "/view/select/{username}",
                web::post().to(handlers::view::toggle_row),
            )
            .route(
                "/view/select-page",
                web::post().to(handlers::view::toggle_page),
            )
            .route("/view/export", web::get().to(handlers::view::export_view))
            .route("/batch", web::post().to(handlers::batch::run_batch))
            .route("/status", web::get().to(handlers::status::get_status))
    })
    .bind(config.bind_address)?
    .run()
    .await?;

    Ok(())
}
