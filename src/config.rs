use std::env;

/// Runtime configuration, read once at startup from the environment
/// (a `.env` file is honored when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Public base URL embedded in join links and QR codes.
    pub public_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> AppConfig {
        AppConfig {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string()),
        }
    }

    /// Join URL participants open (or scan) to reach a session's ballot.
    pub fn join_url(&self, code: &str) -> String {
        format!("{}/vote/{code}", self.public_base_url.trim_end_matches('/'))
    }

    /// Public URL of a pre-registration form.
    pub fn register_url(&self, kind: &str) -> String {
        format!("{}/register/{kind}", self.public_base_url.trim_end_matches('/'))
    }
}
