use std::env;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    Postgrest,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub seed_sample_data: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            port: env::var("PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or_else(|| {
                    warn!("PORT not set or invalid, using 3000");
                    3000
                }),
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_SERVICE_KEY not set, using empty value");
                    String::new()
                }),
            seed_sample_data: env::var("SEED_SAMPLE_DATA")
                .map(|value| !matches!(value.to_ascii_lowercase().as_str(), "0" | "false" | "no"))
                .unwrap_or(true),
        };

        if !config.is_database_configured() {
            warn!("Database not configured - falling back to in-memory storage");
        }

        config
    }

    /// Config for tests and embedded use: in-memory storage, no seeding.
    pub fn in_memory() -> Self {
        Self {
            port: 3000,
            supabase_url: String::new(),
            supabase_service_key: String::new(),
            seed_sample_data: false,
        }
    }

    pub fn is_database_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_service_key.is_empty()
    }

    pub fn storage_backend(&self) -> StorageBackend {
        if self.is_database_configured() {
            StorageBackend::Postgrest
        } else {
            StorageBackend::Memory
        }
    }
}
