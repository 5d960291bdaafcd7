use std::env;
use std::path::PathBuf;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    pub base_path: PathBuf,
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let port = env::var("SPECIALSITS_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(8000);

        let cors_origin = env::var("SPECIALSITS_CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let base_path = env::var("SPECIALSITS_BASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        Self { port, cors_origin, base_path }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
