use chrono::Utc;
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_models::auth::AdminClaims;
use shared_models::error::AppError;
use shared_utils::jwt::create_token;

/// Checks admin credentials against configuration and mints session tokens.
pub struct CredentialGate {
    admin_email: String,
    admin_password: String,
    jwt_secret: String,
    ttl_seconds: i64,
}

impl CredentialGate {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            admin_email: config.admin_email.clone(),
            admin_password: config.admin_password.clone(),
            jwt_secret: config.jwt_secret.clone(),
            ttl_seconds: config.admin_token_ttl_hours * 3600,
        }
    }

    pub fn login(&self, email: Option<&str>, password: Option<&str>) -> Result<String, AppError> {
        let (email, password) = match (email, password) {
            (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
            _ => {
                return Err(AppError::MissingInput(
                    "Email and password are required".to_string(),
                ))
            }
        };

        debug!("Admin login attempt for: {}", email);

        if self.admin_email.is_empty() || self.admin_password.is_empty() {
            warn!("Admin credentials are not configured; rejecting login");
            return Err(AppError::InvalidCredentials);
        }

        if email != self.admin_email || password != self.admin_password {
            warn!("Admin login failed for: {}", email);
            return Err(AppError::InvalidCredentials);
        }

        let claims = AdminClaims::new(email, Utc::now().timestamp(), self.ttl_seconds);
        let token = create_token(&claims, &self.jwt_secret).map_err(AppError::Internal)?;

        info!("Admin login successful for: {}", email);
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_utils::jwt::validate_token;
    use shared_utils::test_utils::TestConfig;

    fn gate_with(email: &str, password: &str) -> CredentialGate {
        let mut config = TestConfig::default().to_app_config();
        config.admin_email = email.to_string();
        config.admin_password = password.to_string();
        CredentialGate::new(&config)
    }

    #[test]
    fn matching_credentials_yield_a_day_long_token() {
        let config = TestConfig::default().to_app_config();
        let gate = CredentialGate::new(&config);

        let token = gate
            .login(Some(&config.admin_email), Some(&config.admin_password))
            .unwrap();
        let claims = validate_token(&token, &config.jwt_secret).unwrap();

        assert_eq!(claims.email, config.admin_email);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn wrong_password_is_rejected() {
        let gate = gate_with("admin@x.com", "right");

        assert_matches!(
            gate.login(Some("admin@x.com"), Some("wrong")),
            Err(AppError::InvalidCredentials)
        );
    }

    #[test]
    fn comparison_is_exact() {
        let gate = gate_with("admin@x.com", "right");

        assert_matches!(
            gate.login(Some("Admin@x.com"), Some("right")),
            Err(AppError::InvalidCredentials)
        );
    }

    #[test]
    fn missing_fields_are_reported() {
        let gate = gate_with("admin@x.com", "right");

        assert_matches!(gate.login(None, Some("right")), Err(AppError::MissingInput(_)));
        assert_matches!(gate.login(Some("admin@x.com"), Some("")), Err(AppError::MissingInput(_)));
    }

    #[test]
    fn unconfigured_admin_never_matches() {
        let gate = gate_with("", "");

        assert_matches!(gate.login(Some("a@b.com"), Some("x")), Err(AppError::InvalidCredentials));
    }
}
