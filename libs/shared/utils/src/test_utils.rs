use std::sync::Arc;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use shared_config::{AppConfig, LatestOrder};
use shared_models::auth::AdminClaims;

use crate::jwt::create_token;

pub const TEST_ADMIN_EMAIL: &str = "admin@clinic.test";
pub const TEST_ADMIN_PASSWORD: &str = "correct-horse-battery";

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub admin_email: String,
    pub admin_password: String,
    pub cloudinary_base_url: String,
    pub dashboard_latest_order: LatestOrder,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
            admin_email: TEST_ADMIN_EMAIL.to_string(),
            admin_password: TEST_ADMIN_PASSWORD.to_string(),
            cloudinary_base_url: "http://localhost:54322".to_string(),
            dashboard_latest_order: LatestOrder::Storage,
        }
    }
}

impl TestConfig {
    /// Point both the record store and the asset store at one mock server.
    pub fn with_mock_uri(uri: &str) -> Self {
        Self {
            supabase_url: uri.to_string(),
            cloudinary_base_url: uri.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            admin_email: self.admin_email.clone(),
            admin_password: self.admin_password.clone(),
            jwt_secret: self.jwt_secret.clone(),
            admin_token_ttl_hours: 24,
            cloudinary_cloud_name: "test-cloud".to_string(),
            cloudinary_api_key: "test-api-key".to_string(),
            cloudinary_api_secret: "test-api-secret".to_string(),
            cloudinary_base_url: self.cloudinary_base_url.clone(),
            dashboard_latest_order: self.dashboard_latest_order,
            max_upload_bytes: 1024 * 1024,
            port: 0,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(email: &str, secret: &str, exp_hours: Option<i64>) -> String {
        let claims = AdminClaims::new(
            email,
            Utc::now().timestamp(),
            exp_hours.unwrap_or(24) * 3600,
        );

        create_token(&claims, secret).expect("test secret is never empty")
    }

    pub fn admin_token(config: &AppConfig) -> String {
        Self::create_test_token(&config.admin_email, &config.jwt_secret, Some(24))
    }

    pub fn create_expired_token(email: &str, secret: &str) -> String {
        Self::create_test_token(email, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(email: &str) -> String {
        Self::create_test_token(email, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn doctor_row(doctor_id: &str, email: &str) -> serde_json::Value {
        json!({
            "id": doctor_id,
            "name": "Dr. Richard James",
            "email": email,
            "image": "https://res.cloudinary.com/test-cloud/image/upload/doc.png",
            "speciality": "General physician",
            "degree": "MBBS",
            "experience": "4 Years",
            "about": "Dr. James has a strong commitment to delivering comprehensive care.",
            "available": true,
            "fees": 50.0,
            "address": { "line1": "17th Cross, Richmond", "line2": "Circle, Ring Road" },
            "date": 1_704_067_200_000_i64,
            "slots_booked": {}
        })
    }

    pub fn doctor_slots_row(doctor_id: &str, slots: serde_json::Value) -> serde_json::Value {
        json!({
            "id": doctor_id,
            "slots_booked": slots
        })
    }

    pub fn appointment_row(
        appointment_id: &str,
        doctor_id: &str,
        slot_date: &str,
        slot_time: &str,
        cancelled: bool,
    ) -> serde_json::Value {
        json!({
            "id": appointment_id,
            "user_id": Uuid::new_v4(),
            "doc_id": doctor_id,
            "slot_date": slot_date,
            "slot_time": slot_time,
            "user_data": { "name": "Test Patient" },
            "doc_data": { "name": "Dr. Richard James" },
            "amount": 50.0,
            "date": 1_704_067_200_000_i64,
            "cancelled": cancelled,
            "payment": false,
            "is_completed": false,
            "status": if cancelled { "cancelled" } else { "booked" }
        })
    }

    /// `Content-Range` value for a count request over `total` rows.
    pub fn content_range(total: u64) -> String {
        if total == 0 {
            "*/0".to_string()
        } else {
            format!("0-{}/{}", total - 1, total)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::verify_admin_token;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::default();
        let app_config = config.to_app_config();

        assert_eq!(app_config.supabase_url, "http://localhost:54321");
        assert_eq!(app_config.admin_email, TEST_ADMIN_EMAIL);
        assert!(app_config.is_configured());
        assert!(app_config.is_asset_store_configured());
    }

    #[test]
    fn test_admin_token_is_accepted() {
        let config = TestConfig::default().to_app_config();
        let token = JwtTestUtils::admin_token(&config);

        let claims = verify_admin_token(&token, &config).unwrap();
        assert_eq!(claims.email, TEST_ADMIN_EMAIL);
    }

    #[test]
    fn test_foreign_email_token_is_rejected() {
        let config = TestConfig::default().to_app_config();
        let token = JwtTestUtils::create_test_token("intruder@x.com", &config.jwt_secret, None);

        assert!(verify_admin_token(&token, &config).is_err());
    }
}
