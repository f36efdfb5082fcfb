use serde::{Deserialize, Serialize};

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

/// Claims carried by an admin session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminClaims {
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl AdminClaims {
    pub fn new(email: &str, issued_at: i64, ttl_seconds: i64) -> Self {
        Self {
            email: email.to_string(),
            role: ADMIN_ROLE.to_string(),
            iat: issued_at,
            exp: issued_at + ttl_seconds,
        }
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp < now
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}
