use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use tracing::debug;

use shared_models::auth::AdminClaims;

type HmacSha256 = Hmac<Sha256>;

fn sign(signing_input: &str, jwt_secret: &str) -> Result<Vec<u8>, String> {
    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(signing_input.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Mint an HS256 token for the given claims.
pub fn create_token(claims: &AdminClaims, jwt_secret: &str) -> Result<String, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let header = json!({
        "alg": "HS256",
        "typ": "JWT"
    });
    let payload = serde_json::to_string(claims)
        .map_err(|e| format!("Failed to encode claims: {}", e))?;

    let header_b64 = URL_SAFE_NO_PAD.encode(header.to_string());
    let claims_b64 = URL_SAFE_NO_PAD.encode(payload);
    let signing_input = format!("{}.{}", header_b64, claims_b64);

    let signature = sign(&signing_input, jwt_secret)?;

    Ok(format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature)))
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<AdminClaims, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = match URL_SAFE_NO_PAD.decode(signature_b64) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("Failed to decode signature: {}", e);
            return Err("Invalid signature encoding".to_string());
        }
    };

    let signature_string = format!("{}.{}", header_b64, claims_b64);

    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(signature_string.as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err("Invalid token signature".to_string());
    }

    let claims_json = URL_SAFE_NO_PAD
        .decode(claims_b64)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(|| "Invalid claims encoding".to_string())?;

    let claims: AdminClaims = match serde_json::from_str(&claims_json) {
        Ok(c) => c,
        Err(e) => {
            debug!("Failed to parse claims: {}", e);
            return Err("Invalid claims format".to_string());
        }
    };

    let now = chrono::Utc::now().timestamp();
    if claims.is_expired_at(now) {
        debug!("Token expired at {} (now: {})", claims.exp, now);
        return Err("Token expired".to_string());
    }

    debug!("Token validated successfully for: {}", claims.email);
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn signed_token_validates() {
        let claims = AdminClaims::new("admin@x.com", Utc::now().timestamp(), 3600);
        let token = create_token(&claims, SECRET).unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(validate_token(&token, SECRET).unwrap(), claims);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let claims = AdminClaims::new("admin@x.com", Utc::now().timestamp(), 3600);
        let token = create_token(&claims, SECRET).unwrap();

        assert_eq!(
            validate_token(&token, "other-secret").unwrap_err(),
            "Invalid token signature"
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = AdminClaims::new("admin@x.com", Utc::now().timestamp() - 7200, 3600);
        let token = create_token(&claims, SECRET).unwrap();

        assert_eq!(validate_token(&token, SECRET).unwrap_err(), "Token expired");
    }

    #[test]
    fn empty_secret_refuses_to_sign() {
        let claims = AdminClaims::new("admin@x.com", 0, 60);
        assert!(create_token(&claims, "").is_err());
    }

    #[test]
    fn malformed_token_is_rejected() {
        assert_eq!(
            validate_token("not-a-token", SECRET).unwrap_err(),
            "Invalid token format"
        );
    }
}
