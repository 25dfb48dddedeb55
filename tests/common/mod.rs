use std::collections::HashSet;
use std::sync::atomic::AtomicUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::{web, App};
use async_trait::async_trait;

use directorio_ui_rust::gateway::{DirectoryGateway, GatewayError};
use directorio_ui_rust::handlers;
use directorio_ui_rust::models::{CreateUserForm, UpdateUserForm, UserRecord};
use directorio_ui_rust::services::{BatchRunner, ImportPipeline, RecordStore, UserService};

/// In-memory stand-in for the upstream directory service, with per-username
/// failure injection and call counting.
pub struct MockGateway {
    pub users: Mutex<Vec<UserRecord>>,
    pub ous: Vec<String>,
    pub groups: Vec<String>,
    pub fetch_calls: AtomicUsize,
    pub write_calls: AtomicUsize,
    pub fail_usernames: Mutex<HashSet<String>>,
}

impl MockGateway {
    pub fn new(users: Vec<UserRecord>) -> Arc<Self> {
        Arc::new(Self {
            users: Mutex::new(users),
            ous: vec!["CC".to_string(), "MAT".to_string()],
            groups: vec!["G1".to_string(), "G2".to_string()],
            fetch_calls: AtomicUsize::new(0),
            write_calls: AtomicUsize::new(0),
            fail_usernames: Mutex::new(HashSet::new()),
        })
    }

    pub fn fail_on(&self, username: &str) {
        self.fail_usernames
            .lock()
            .unwrap()
            .insert(username.to_string());
    }

    fn check_injected_failure(&self, username: &str) -> Result<(), GatewayError> {
        if self.fail_usernames.lock().unwrap().contains(username) {
            return Err(GatewayError::Upstream {
                status: 500,
                message: "directory write rejected".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DirectoryGateway for MockGateway {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, GatewayError> {
        self.fetch_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(self.users.lock().unwrap().clone())
    }

    async fn create_user(&self, form: &CreateUserForm) -> Result<UserRecord, GatewayError> {
        self.write_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == form.username) {
            return Err(GatewayError::Upstream {
                status: 409,
                message: format!("User {} already exists", form.username),
            });
        }

        let record = UserRecord {
            username: form.username.clone(),
            given_name: form.given_name.clone(),
            sn: form.sn.clone(),
            display_name: form.display_name.clone(),
            ou: form.ou.clone(),
            groups: form.groups.clone(),
            logon_count: 0,
            last_logon: None,
        };
        users.push(record.clone());
        Ok(record)
    }

    async fn update_user(&self, form: &UpdateUserForm) -> Result<UserRecord, GatewayError> {
        self.write_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.check_injected_failure(&form.username)?;

        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.username == form.username)
            .ok_or_else(|| GatewayError::Upstream {
                status: 404,
                message: format!("User {} not found", form.username),
            })?;

        if let Some(value) = &form.given_name {
            user.given_name = value.clone();
        }
        if let Some(value) = &form.sn {
            user.sn = value.clone();
        }
        if let Some(value) = &form.display_name {
            user.display_name = value.clone();
        }
        if let Some(value) = &form.ou {
            user.ou = value.clone();
        }
        if let Some(value) = &form.groups {
            user.groups = value.clone();
        }
        // Password resets leave the visible record untouched.
        Ok(user.clone())
    }

    async fn delete_user(&self, username: &str) -> Result<(), GatewayError> {
        self.write_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.check_injected_failure(username)?;

        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.username != username);
        if users.len() == before {
            return Err(GatewayError::Upstream {
                status: 404,
                message: format!("User {} not found", username),
            });
        }
        Ok(())
    }

    async fn fetch_ous(&self) -> Result<Vec<String>, GatewayError> {
        Ok(self.ous.clone())
    }

    async fn fetch_groups(&self) -> Result<Vec<String>, GatewayError> {
        Ok(self.groups.clone())
    }
}

pub struct TestApp {
    pub gateway: Arc<MockGateway>,
    pub store: Arc<RecordStore>,
    user_service: web::Data<UserService>,
    batch_runner: web::Data<BatchRunner>,
    import_pipeline: web::Data<ImportPipeline>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_users(seed_users())
    }

    pub fn with_users(users: Vec<UserRecord>) -> Self {
        Self::build(users, "sh -c true")
    }

    pub fn with_import_command(command: &str) -> Self {
        Self::build(seed_users(), command)
    }

    fn build(users: Vec<UserRecord>, import_command: &str) -> Self {
        let gateway = MockGateway::new(users);
        let dyn_gateway: Arc<dyn DirectoryGateway> = gateway.clone();

        let store = Arc::new(RecordStore::new(dyn_gateway.clone(), Duration::from_secs(60)));
        let user_service = web::Data::new(UserService::new(dyn_gateway.clone(), store.clone()));
        let batch_runner = web::Data::new(BatchRunner::new(dyn_gateway, store.clone()));
        let import_pipeline =
            web::Data::new(ImportPipeline::new(import_command).expect("import command"));

        Self {
            gateway,
            store,
            user_service,
            batch_runner,
            import_pipeline,
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::from(self.store.clone()))
            .app_data(self.user_service.clone())
            .app_data(self.batch_runner.clone())
            .app_data(self.import_pipeline.clone())
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
    }
}

pub fn seed_users() -> Vec<UserRecord> {
    vec![
        user("ana", "Ana", "García", "CC", &["G1"], 12),
        user("bob", "Roberto", "Núñez", "MAT", &["G2"], 3),
        user("carla", "Carla", "Soto", "CC", &["G1", "G2"], 47),
    ]
}

pub fn user(
    username: &str,
    given_name: &str,
    sn: &str,
    ou: &str,
    groups: &[&str],
    logon_count: u64,
) -> UserRecord {
    UserRecord {
        username: username.to_string(),
        given_name: given_name.to_string(),
        sn: sn.to_string(),
        display_name: format!("{} {}", given_name, sn),
        ou: ou.to_string(),
        groups: groups.iter().map(|g| g.to_string()).collect(),
        logon_count,
        last_logon: None,
    }
}
