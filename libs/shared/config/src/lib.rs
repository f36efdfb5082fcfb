use std::env;
use std::str::FromStr;
use tracing::warn;

/// How the dashboard picks its "latest appointments" slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LatestOrder {
    /// First five rows in storage order, reversed.
    #[default]
    Storage,
    /// Five most recent rows by creation timestamp.
    CreatedDesc,
}

impl FromStr for LatestOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "storage" => Ok(LatestOrder::Storage),
            "created_desc" => Ok(LatestOrder::CreatedDesc),
            other => Err(format!("unknown dashboard ordering: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub admin_email: String,
    pub admin_password: String,
    pub jwt_secret: String,
    pub admin_token_ttl_hours: i64,
    pub cloudinary_cloud_name: String,
    pub cloudinary_api_key: String,
    pub cloudinary_api_secret: String,
    pub cloudinary_base_url: String,
    pub dashboard_latest_order: LatestOrder,
    pub max_upload_bytes: usize,
    pub port: u16,
}

pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_PORT: u16 = 4000;

fn required(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| {
        warn!("{} not set, using empty value", name);
        String::new()
    })
}

fn parsed_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has an invalid value ({}), using default", name, raw);
            default
        }),
        Err(_) => default,
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: required("SUPABASE_URL"),
            supabase_service_key: required("SUPABASE_SERVICE_ROLE_KEY"),
            admin_email: required("ADMIN_EMAIL"),
            admin_password: required("ADMIN_PASSWORD"),
            jwt_secret: required("JWT_SECRET"),
            admin_token_ttl_hours: parsed_or("ADMIN_TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS),
            cloudinary_cloud_name: required("CLOUDINARY_CLOUD_NAME"),
            cloudinary_api_key: required("CLOUDINARY_API_KEY"),
            cloudinary_api_secret: required("CLOUDINARY_API_SECRET"),
            cloudinary_base_url: env::var("CLOUDINARY_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("CLOUDINARY_BASE_URL not set, using default");
                    "https://api.cloudinary.com".to_string()
                }),
            dashboard_latest_order: parsed_or("DASHBOARD_LATEST_ORDER", LatestOrder::Storage),
            max_upload_bytes: parsed_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            port: parsed_or("PORT", DEFAULT_PORT),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        if !config.is_asset_store_configured() {
            warn!("Cloudinary credentials missing - doctor image uploads will fail");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_service_key.is_empty()
            && !self.admin_email.is_empty()
            && !self.admin_password.is_empty()
            && !self.jwt_secret.is_empty()
    }

    pub fn is_asset_store_configured(&self) -> bool {
        !self.cloudinary_cloud_name.is_empty()
            && !self.cloudinary_api_key.is_empty()
            && !self.cloudinary_api_secret.is_empty()
            && !self.cloudinary_base_url.is_empty()
    }
}
