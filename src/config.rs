use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: SocketAddr,
    pub gateway_base_url: String,
    pub gateway_timeout: Duration,
    pub import_command: String,
    pub refresh_window: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .unwrap_or(5000);

        let bind_address = format!("{}:{}", host, port)
            .parse()
            .expect("Invalid bind address");

        // The reference deployment talks to a directory service on the
        // local network; the base is always overridable.
        let gateway_base_url = std::env::var("GATEWAY_BASE_URL")
            .unwrap_or_else(|_| "http://192.168.0.245:8888".to_string());

        let import_command = std::env::var("IMPORT_COMMAND")
            .unwrap_or_else(|_| "python3 import_users.py".to_string());

        Self {
            bind_address,
            gateway_base_url,
            gateway_timeout: Duration::from_secs(env_u64("GATEWAY_TIMEOUT_SECS", 10)),
            import_command,
            refresh_window: Duration::from_secs(env_u64("REFRESH_WINDOW_SECS", 20)),
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
